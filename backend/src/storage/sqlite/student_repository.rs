use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use shared::Student;

use super::DbConnection;
use crate::domain::models::{NewStudent, StudentUpdate};
use crate::error::LedgerError;
use crate::storage::StudentStore;

/// Repository for student records.
#[derive(Clone)]
pub struct SqliteStudentRepository {
    db: DbConnection,
}

impl SqliteStudentRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

fn row_to_student(row: &SqliteRow) -> Student {
    Student {
        id: row.get("id"),
        name: row.get("name"),
        roll_no: row.get("roll_no"),
        course: row.get("course"),
        year: row.get("year"),
        email: row.get("email"),
        phone: row.get("phone"),
        total_fee: row.get("total_fee"),
        photo: row.get("photo"),
    }
}

const STUDENT_COLUMNS: &str = "id, name, roll_no, course, year, email, phone, total_fee, photo";

#[async_trait]
impl StudentStore for SqliteStudentRepository {
    async fn insert_student(&self, new: &NewStudent) -> Result<Student, LedgerError> {
        let result = sqlx::query(
            r#"
            INSERT INTO students (name, roll_no, course, year, email, phone, total_fee, photo)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.name)
        .bind(&new.roll_no)
        .bind(&new.course)
        .bind(&new.year)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(new.total_fee)
        .bind(&new.photo)
        .execute(self.db.pool())
        .await;

        let done = match result {
            Ok(done) => done,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(LedgerError::DuplicateKey(format!(
                    "roll number {}",
                    new.roll_no
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let id = done.last_insert_rowid();
        self.get_student(id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("student {}", id)))
    }

    async fn get_student(&self, id: i64) -> Result<Option<Student>, LedgerError> {
        let row = sqlx::query(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(row_to_student))
    }

    async fn get_student_by_roll(&self, roll_no: &str) -> Result<Option<Student>, LedgerError> {
        let row = sqlx::query(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE roll_no = ?"
        ))
        .bind(roll_no)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(row_to_student))
    }

    async fn list_students(&self, filter: Option<&str>) -> Result<Vec<Student>, LedgerError> {
        let rows = match filter {
            Some(q) => {
                // SQLite LIKE is case-insensitive for ASCII, matching the
                // search semantics of the register's UI.
                let pattern = format!("%{}%", q);
                sqlx::query(&format!(
                    r#"
                    SELECT {STUDENT_COLUMNS} FROM students
                    WHERE roll_no LIKE ? OR name LIKE ?
                    ORDER BY id DESC
                    "#
                ))
                .bind(&pattern)
                .bind(&pattern)
                .fetch_all(self.db.pool())
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {STUDENT_COLUMNS} FROM students ORDER BY id DESC"
                ))
                .fetch_all(self.db.pool())
                .await?
            }
        };

        Ok(rows.iter().map(row_to_student).collect())
    }

    async fn list_students_chronological(&self) -> Result<Vec<Student>, LedgerError> {
        let rows = sqlx::query(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students ORDER BY id ASC"
        ))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(row_to_student).collect())
    }

    async fn update_student(&self, id: i64, fields: &StudentUpdate) -> Result<Student, LedgerError> {
        let done = sqlx::query(
            r#"
            UPDATE students
            SET name = ?, course = ?, year = ?, email = ?, phone = ?, total_fee = ?, photo = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.course)
        .bind(&fields.year)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(fields.total_fee)
        .bind(&fields.photo)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if done.rows_affected() == 0 {
            return Err(LedgerError::NotFound(format!("student {}", id)));
        }

        self.get_student(id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("student {}", id)))
    }

    async fn delete_student(&self, id: i64) -> Result<(), LedgerError> {
        // Fee entries go first, inside the same transaction, so an append on
        // this student can never be left orphaned.
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("DELETE FROM fees WHERE student_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let done = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if done.rows_affected() == 0 {
            return Err(LedgerError::NotFound(format!("student {}", id)));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn count_students(&self) -> Result<i64, LedgerError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM students")
            .fetch_one(self.db.pool())
            .await?;

        Ok(row.get("total"))
    }
}
