use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use crate::config::SmtpConfig;
use crate::error::DeliveryError;
use crate::notify::EmailChannel;

/// Sends receipts and admission notices over an authenticated SMTP relay.
pub struct SmtpRelay {
    transport: SmtpTransport,
    from_email: String,
}

impl SmtpRelay {
    pub fn new(config: &SmtpConfig, timeout: Duration) -> Result<Self> {
        info!(
            "connecting SMTP relay {}:{}",
            config.server, config.port
        );

        let tls_params = TlsParameters::new(config.server.clone())
            .context("failed to create TLS parameters")?;

        let transport = SmtpTransport::relay(&config.server)
            .context("failed to create SMTP relay")?
            .port(config.port)
            .tls(Tls::Required(tls_params))
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(timeout))
            .build();

        Ok(Self {
            transport,
            from_email: config.from_email.clone(),
        })
    }
}

#[async_trait]
impl EmailChannel for SmtpRelay {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), DeliveryError> {
        let from = self
            .from_email
            .parse::<Mailbox>()
            .map_err(|e| DeliveryError::Email(format!("bad from address: {}", e)))?;
        let to = to
            .parse::<Mailbox>()
            .map_err(|e| DeliveryError::Email(format!("bad recipient address: {}", e)))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| DeliveryError::Email(format!("failed to build message: {}", e)))?;

        // SmtpTransport::send blocks on the socket, so it runs off the
        // async executor.
        let transport = self.transport.clone();
        let sent = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| DeliveryError::Email(format!("send task failed: {}", e)))?;

        sent.map_err(|e| DeliveryError::Email(e.to_string()))?;
        Ok(())
    }
}
