//! Transactional email client.
//!
//! Talks to a SendGrid-style send endpoint: `POST` with a bearer key and a
//! JSON body carrying recipient, subject and both body variants. A missing
//! key is a legal degraded mode; the code is logged so the flow stays
//! testable without a provisioned email account.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info, warn};

use ax_core::otp::OtpCode;
use ax_core::ports::OtpDeliveryPort;

use super::template;

const SENDGRID_SEND_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, Clone)]
pub struct EmailSender {
    pub email: String,
    pub name: String,
}

pub struct SendGridMailer {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
    sender: EmailSender,
}

impl SendGridMailer {
    pub fn new(api_key: Option<String>, sender: EmailSender) -> Self {
        Self {
            http: Client::new(),
            endpoint: SENDGRID_SEND_ENDPOINT.to_owned(),
            api_key,
            sender,
        }
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl OtpDeliveryPort for SendGridMailer {
    async fn deliver(&self, email: &str, code: &OtpCode) -> anyhow::Result<bool> {
        let Some(api_key) = &self.api_key else {
            warn!("email api key not configured; delivery skipped");
            // Deliberate degraded mode: the operator reads the code from the
            // logs instead of a mailbox.
            info!(email, code = %code, "verification code (degraded delivery)");
            return Ok(false);
        };

        let message = template::otp_email(code);
        let payload = json!({
            "personalizations": [
                { "to": [{ "email": email }], "subject": message.subject }
            ],
            "from": { "email": self.sender.email, "name": self.sender.name },
            "content": [
                { "type": "text/plain", "value": message.text },
                { "type": "text/html", "value": message.html },
            ],
        });

        let response = self
            .http
            .post(self.endpoint.as_str())
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(email, "verification email accepted by the provider");
            Ok(true)
        } else {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("email api returned {status}: {body}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> EmailSender {
        EmailSender {
            email: "noreply@axys-banking.com".into(),
            name: "Axys Banking".into(),
        }
    }

    #[tokio::test]
    async fn missing_key_is_degraded_mode_not_failure() {
        let mailer = SendGridMailer::new(None, sender());
        let delivered = mailer
            .deliver("a@x.com", &OtpCode::from_stored("123456"))
            .await
            .unwrap();
        assert!(!delivered);
    }

    #[tokio::test]
    async fn accepted_send_reports_delivery() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("authorization", "Bearer sg-key")
            .with_status(202)
            .create_async()
            .await;

        let mailer =
            SendGridMailer::new(Some("sg-key".into()), sender()).with_endpoint(server.url());
        let delivered = mailer
            .deliver("a@x.com", &OtpCode::from_stored("123456"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(delivered);
    }

    #[tokio::test]
    async fn provider_rejection_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(401)
            .with_body(r#"{"errors":[{"message":"bad key"}]}"#)
            .create_async()
            .await;

        let mailer =
            SendGridMailer::new(Some("bad".into()), sender()).with_endpoint(server.url());
        let err = mailer
            .deliver("a@x.com", &OtpCode::from_stored("123456"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("401"));
    }
}
