use std::sync::Arc;

use tracing::info;

use shared::{CreateStudentRequest, FeeRow, PaymentResponse, RecordPaymentRequest, Student};

use crate::domain::ledger_timestamp;
use crate::domain::models::NewFeeEntry;
use crate::domain::student_service::StudentService;
use crate::error::LedgerError;
use crate::notify::NotificationDispatcher;
use crate::storage::{FeeStore, StudentStore};

/// Records payments and admissions, then hands the event to the
/// notification dispatcher in a detached task. The ledger commit decides the
/// outcome; notification delivery is strictly best effort.
#[derive(Clone)]
pub struct PaymentService {
    student_service: StudentService,
    students: Arc<dyn StudentStore>,
    fees: Arc<dyn FeeStore>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl PaymentService {
    pub fn new(
        student_service: StudentService,
        students: Arc<dyn StudentStore>,
        fees: Arc<dyn FeeStore>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            student_service,
            students,
            fees,
            dispatcher,
        }
    }

    pub async fn record_payment(
        &self,
        request: &RecordPaymentRequest,
    ) -> Result<PaymentResponse, LedgerError> {
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(LedgerError::Validation(
                "payment amount must be a positive number".to_string(),
            ));
        }

        let roll_no = request.roll_no.trim();
        let student = self
            .students
            .get_student_by_roll(roll_no)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("student with roll {}", roll_no)))?;

        let fee_entry_id = self
            .fees
            .append_entry(&NewFeeEntry {
                student_id: student.id,
                amount: request.amount,
                date: ledger_timestamp(),
                mode: request.mode.clone(),
                remark: request.remark.clone(),
            })
            .await?;

        info!(
            "recorded payment {} of {} for roll {}",
            fee_entry_id, request.amount, student.roll_no
        );

        let dispatcher = self.dispatcher.clone();
        let notified = student.clone();
        let amount = request.amount;
        tokio::spawn(async move {
            dispatcher.payment_received(&notified, amount).await;
        });

        Ok(PaymentResponse {
            fee_entry_id,
            student,
        })
    }

    /// Every ledger entry joined with its student, newest first.
    pub async fn list_fees(&self) -> Result<Vec<FeeRow>, LedgerError> {
        self.fees.list_rows().await
    }

    /// Admission plus its welcome notification.
    pub async fn record_admission(
        &self,
        request: &CreateStudentRequest,
    ) -> Result<Student, LedgerError> {
        let student = self.student_service.create_student(request).await?;

        let dispatcher = self.dispatcher.clone();
        let notified = student.clone();
        tokio::spawn(async move {
            dispatcher.admission_confirmed(&notified).await;
        });

        Ok(student)
    }
}
