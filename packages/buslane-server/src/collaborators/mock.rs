//! Test doubles for the collaborator interfaces.
//!
//! `MockGateway` also serves as the development gateway when no payment
//! secret is configured, so the full booking pipeline can run locally.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::distr::Alphanumeric;
use rand::Rng as _;

use super::mail::{Attachment, Mailer};
use super::payment::{PaymentGateway, PaymentIntent};

/// Payment gateway that mints deterministic-shaped intents in process.
pub struct MockGateway {
    decline: AtomicBool,
    calls: Mutex<Vec<(i64, String)>>,
}

impl MockGateway {
    /// Creates a gateway that accepts every intent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            decline: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Makes subsequent `create_intent` calls fail, simulating a declined
    /// or unreachable payment service.
    pub fn set_decline(&self, decline: bool) {
        self.decline.store(decline, Ordering::Relaxed);
    }

    /// The `(amount_minor, currency)` arguments seen so far.
    #[must_use]
    pub fn calls(&self) -> Vec<(i64, String)> {
        self.calls.lock().clone()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> anyhow::Result<PaymentIntent> {
        self.calls.lock().push((amount_minor, currency.to_string()));
        if self.decline.load(Ordering::Relaxed) {
            anyhow::bail!("payment declined");
        }
        let token: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(24)
            .map(char::from)
            .collect();
        Ok(PaymentIntent {
            client_secret: format!("pi_mock_secret_{token}"),
        })
    }
}

/// A sent message captured by [`RecordingMailer`].
#[derive(Debug, Clone)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
    pub attachment_names: Vec<String>,
}

/// Mailer that records every send for assertions.
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    /// Makes subsequent sends fail.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::Relaxed);
    }

    /// Everything sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().clone()
    }
}

impl Default for RecordingMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        attachments: Vec<Attachment>,
    ) -> anyhow::Result<()> {
        if self.fail.load(Ordering::Relaxed) {
            anyhow::bail!("mail service unavailable");
        }
        self.sent.lock().push(SentMail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
            attachment_names: attachments.into_iter().map(|a| a.name).collect(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_gateway_records_amounts_and_mints_secrets() {
        let gateway = MockGateway::new();
        let intent = gateway.create_intent(1250, "usd").await.unwrap();

        assert!(intent.client_secret.starts_with("pi_mock_secret_"));
        assert_eq!(gateway.calls(), vec![(1250, "usd".to_string())]);
    }

    #[tokio::test]
    async fn mock_gateway_can_decline() {
        let gateway = MockGateway::new();
        gateway.set_decline(true);
        assert!(gateway.create_intent(1000, "usd").await.is_err());

        gateway.set_decline(false);
        assert!(gateway.create_intent(1000, "usd").await.is_ok());
    }

    #[tokio::test]
    async fn recording_mailer_captures_sends() {
        let mailer = RecordingMailer::new();
        mailer
            .send(
                "rider@example.com",
                "confirmation",
                "<p>done</p>",
                vec![Attachment::pdf("ticket.pdf", vec![1, 2, 3])],
            )
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "rider@example.com");
        assert_eq!(sent[0].attachment_names, vec!["ticket.pdf"]);
    }
}
