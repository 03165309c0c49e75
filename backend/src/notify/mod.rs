//! Best-effort notifications. Delivery runs after the ledger commit and can
//! never fail a payment or an admission: failures are logged and dropped.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use shared::Student;

use crate::error::DeliveryError;

pub mod email;
pub mod sms;

#[async_trait]
pub trait SmsChannel: Send + Sync {
    async fn send_sms(&self, phone: &str, text: &str) -> Result<(), DeliveryError>;
}

#[async_trait]
pub trait EmailChannel: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, body: &str)
        -> Result<(), DeliveryError>;
}

/// Fans a ledger event out to whichever channels are configured. A student
/// with no phone or no email is silently skipped on that channel.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sms: Option<Arc<dyn SmsChannel>>,
    email: Option<Arc<dyn EmailChannel>>,
}

impl NotificationDispatcher {
    pub fn new(sms: Option<Arc<dyn SmsChannel>>, email: Option<Arc<dyn EmailChannel>>) -> Self {
        Self { sms, email }
    }

    /// A dispatcher with no channels at all. Every event becomes a no-op.
    pub fn disabled() -> Self {
        Self {
            sms: None,
            email: None,
        }
    }

    pub async fn payment_received(&self, student: &Student, amount: f64) {
        let text = format!(
            "Hi {}! Rs.{:.2} fees received successfully.",
            student.name, amount
        );
        self.deliver(student, "Fees Receipt", &text).await;
    }

    pub async fn admission_confirmed(&self, student: &Student) {
        let sms_text = format!("Welcome {}! Your admission is completed.", student.name);
        let email_body = format!("Dear {}, your admission is confirmed.", student.name);

        if let (Some(channel), Some(phone)) = (&self.sms, &student.phone) {
            if let Err(e) = channel.send_sms(phone, &sms_text).await {
                warn!("admission SMS to student {} failed: {}", student.id, e);
            }
        }
        if let (Some(channel), Some(email)) = (&self.email, &student.email) {
            if let Err(e) = channel
                .send_email(email, "Admission Successful", &email_body)
                .await
            {
                warn!("admission email to student {} failed: {}", student.id, e);
            }
        }
    }

    async fn deliver(&self, student: &Student, subject: &str, text: &str) {
        match (&self.sms, &student.phone) {
            (Some(channel), Some(phone)) => {
                if let Err(e) = channel.send_sms(phone, text).await {
                    warn!("SMS to student {} failed: {}", student.id, e);
                }
            }
            (Some(_), None) => info!("student {} has no phone, skipping SMS", student.id),
            (None, _) => {}
        }

        match (&self.email, &student.email) {
            (Some(channel), Some(email)) => {
                if let Err(e) = channel.send_email(email, subject, text).await {
                    warn!("email to student {} failed: {}", student.id, e);
                }
            }
            (Some(_), None) => info!("student {} has no email, skipping email", student.id),
            (None, _) => {}
        }
    }
}

#[cfg(test)]
pub(crate) mod test_channels {
    use std::sync::Mutex;

    use super::*;

    /// Records every SMS it is asked to send.
    #[derive(Default)]
    pub struct RecordingSms {
        pub sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl SmsChannel for RecordingSms {
        async fn send_sms(&self, phone: &str, text: &str) -> Result<(), DeliveryError> {
            self.sent
                .lock()
                .unwrap()
                .push((phone.to_string(), text.to_string()));
            Ok(())
        }
    }

    /// Records every email as (to, subject, body).
    #[derive(Default)]
    pub struct RecordingEmail {
        pub sent: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl EmailChannel for RecordingEmail {
        async fn send_email(
            &self,
            to: &str,
            subject: &str,
            body: &str,
        ) -> Result<(), DeliveryError> {
            self.sent.lock().unwrap().push((
                to.to_string(),
                subject.to_string(),
                body.to_string(),
            ));
            Ok(())
        }
    }

    /// Always fails, for verifying that delivery errors never escape.
    pub struct FailingSms;

    #[async_trait]
    impl SmsChannel for FailingSms {
        async fn send_sms(&self, _phone: &str, _text: &str) -> Result<(), DeliveryError> {
            Err(DeliveryError::Sms("gateway unreachable".to_string()))
        }
    }

    pub struct FailingEmail;

    #[async_trait]
    impl EmailChannel for FailingEmail {
        async fn send_email(
            &self,
            _to: &str,
            _subject: &str,
            _body: &str,
        ) -> Result<(), DeliveryError> {
            Err(DeliveryError::Email("relay rejected".to_string()))
        }
    }
}
