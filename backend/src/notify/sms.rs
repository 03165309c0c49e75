use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::config::SmsConfig;
use crate::error::DeliveryError;
use crate::notify::SmsChannel;

/// Sends texts through a bulk-SMS HTTP gateway. Each request carries the
/// configured timeout so a wedged gateway cannot hold a dispatch task.
pub struct SmsGateway {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl SmsGateway {
    pub fn new(config: &SmsConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build SMS HTTP client")?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl SmsChannel for SmsGateway {
    async fn send_sms(&self, phone: &str, text: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("authorization", &self.api_key)
            .form(&[("route", "q"), ("message", text), ("numbers", phone)])
            .send()
            .await
            .map_err(|e| DeliveryError::Sms(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DeliveryError::Sms(format!(
                "gateway returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
