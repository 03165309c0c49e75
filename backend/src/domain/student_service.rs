use std::sync::Arc;

use tracing::info;

use shared::{CreateStudentRequest, Student, StudentProfile, UpdateStudentRequest};

use crate::domain::models::{NewStudent, StudentUpdate};
use crate::domain::{balance, DEFAULT_TOTAL_FEE};
use crate::error::LedgerError;
use crate::storage::{FeeStore, StudentStore};

/// Admissions and student records.
#[derive(Clone)]
pub struct StudentService {
    students: Arc<dyn StudentStore>,
    fees: Arc<dyn FeeStore>,
}

impl StudentService {
    pub fn new(students: Arc<dyn StudentStore>, fees: Arc<dyn FeeStore>) -> Self {
        Self { students, fees }
    }

    pub async fn create_student(
        &self,
        request: &CreateStudentRequest,
    ) -> Result<Student, LedgerError> {
        let name = request.name.trim();
        let roll_no = request.roll_no.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("name must not be empty".to_string()));
        }
        if roll_no.is_empty() {
            return Err(LedgerError::Validation(
                "roll number must not be empty".to_string(),
            ));
        }

        let total_fee = match request.total_fee {
            Some(fee) if !fee.is_finite() || fee < 0.0 => {
                return Err(LedgerError::Validation(
                    "total fee must not be negative".to_string(),
                ));
            }
            Some(fee) => fee,
            None => DEFAULT_TOTAL_FEE,
        };

        let created = self
            .students
            .insert_student(&NewStudent {
                name: name.to_string(),
                roll_no: roll_no.to_string(),
                course: request.course.clone(),
                year: request.year.clone(),
                email: request.email.clone(),
                phone: request.phone.clone(),
                total_fee,
                photo: request.photo.clone(),
            })
            .await?;

        info!(
            "admitted student {} (roll {}) with total fee {}",
            created.id, created.roll_no, created.total_fee
        );
        Ok(created)
    }

    pub async fn update_student(
        &self,
        id: i64,
        request: &UpdateStudentRequest,
    ) -> Result<Student, LedgerError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("name must not be empty".to_string()));
        }

        let current = self
            .students
            .get_student(id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("student {}", id)))?;

        let total_fee = match request.total_fee {
            Some(fee) if !fee.is_finite() || fee < 0.0 => {
                return Err(LedgerError::Validation(
                    "total fee must not be negative".to_string(),
                ));
            }
            Some(fee) => fee,
            None => current.total_fee,
        };

        self.students
            .update_student(
                id,
                &StudentUpdate {
                    name: name.to_string(),
                    course: request.course.clone(),
                    year: request.year.clone(),
                    email: request.email.clone(),
                    phone: request.phone.clone(),
                    total_fee,
                    photo: request.photo.clone(),
                },
            )
            .await
    }

    pub async fn delete_student(&self, id: i64) -> Result<(), LedgerError> {
        self.students.delete_student(id).await?;
        info!("removed student {} and their fee history", id);
        Ok(())
    }

    pub async fn list_students(&self, filter: Option<&str>) -> Result<Vec<Student>, LedgerError> {
        let filter = filter.map(str::trim).filter(|q| !q.is_empty());
        self.students.list_students(filter).await
    }

    pub async fn get_student(&self, id: i64) -> Result<Student, LedgerError> {
        self.students
            .get_student(id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("student {}", id)))
    }

    /// A student with their full fee history and derived balance.
    pub async fn profile(&self, id: i64) -> Result<StudentProfile, LedgerError> {
        let student = self.get_student(id).await?;
        self.profile_of(student).await
    }

    /// Find one student by exact roll number first, falling back to the
    /// first substring match on roll or name.
    pub async fn search(&self, query: &str) -> Result<Option<StudentProfile>, LedgerError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let found = match self.students.get_student_by_roll(query).await? {
            Some(student) => Some(student),
            None => self
                .students
                .list_students(Some(query))
                .await?
                .into_iter()
                .next(),
        };

        match found {
            Some(student) => Ok(Some(self.profile_of(student).await?)),
            None => Ok(None),
        }
    }

    async fn profile_of(&self, student: Student) -> Result<StudentProfile, LedgerError> {
        let fees = self.fees.list_entries(Some(student.id)).await?;
        let paid = balance::paid(self.fees.as_ref(), student.id).await?;
        let due = balance::due(student.total_fee, paid);
        Ok(StudentProfile {
            student,
            fees,
            paid,
            due,
        })
    }
}
