//! Twilio SMS delivery channel

use crate::config::TwilioConfig;
use crate::notification::channel::SmsSink;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

const SMS_TIMEOUT_SECS: u64 = 10;

/// Sends SMS through the Twilio REST API
#[derive(Debug)]
pub struct TwilioSms {
    client: Client,
    account_id: String,
    auth_token: String,
    phone_number: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

impl TwilioSms {
    pub fn new(config: &TwilioConfig) -> Result<Self> {
        if config.account_id.is_empty() || config.auth_token.is_empty() {
            bail!("Twilio account_id and auth_token are required");
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(SMS_TIMEOUT_SECS))
            .build()
            .context("Failed to create Twilio HTTP client")?;
        Ok(Self {
            client,
            account_id: config.account_id.clone(),
            auth_token: config.auth_token.clone(),
            phone_number: config.phone_number.clone(),
        })
    }
}

#[async_trait]
impl SmsSink for TwilioSms {
    async fn send(&self, recipient: &str, body: &str) -> Result<String> {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_id
        );
        let params = [
            ("To", recipient),
            ("From", self.phone_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_id, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .context("Twilio request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("Twilio returned {}: {}", status, detail);
        }

        let message: MessageResponse = response
            .json()
            .await
            .context("Failed to parse Twilio response")?;
        info!(recipient, sid = %message.sid, "SMS notification sent");
        Ok(message.sid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_credentials() {
        let config = TwilioConfig {
            account_id: String::new(),
            auth_token: String::new(),
            phone_number: "+15550009999".to_string(),
        };
        let result = TwilioSms::new(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("required"));
    }

    #[test]
    fn test_builds_with_credentials() {
        let config = TwilioConfig {
            account_id: "AC123".to_string(),
            auth_token: "secret".to_string(),
            phone_number: "+15550009999".to_string(),
        };
        assert!(TwilioSms::new(&config).is_ok());
    }
}
