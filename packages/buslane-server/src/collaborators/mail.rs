//! Outbound mail interface.
//!
//! Call sites treat mail as fire-and-forget: a send failure is logged and
//! never propagated into booking state.

use async_trait::async_trait;
use base64::Engine as _;

/// A file attached to an outbound message.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// A PDF attachment.
    #[must_use]
    pub fn pdf(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: "application/pdf".to_string(),
            bytes,
        }
    }

    /// The content base64-encoded, as HTTP mail APIs expect binary parts.
    #[must_use]
    pub fn base64_content(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

/// Abstraction over mail delivery services.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send an HTML message with optional attachments.
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        attachments: Vec<Attachment>,
    ) -> anyhow::Result<()>;
}

/// Development mailer that logs instead of delivering.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        attachments: Vec<Attachment>,
    ) -> anyhow::Result<()> {
        tracing::info!(
            recipient,
            subject,
            body_len = html_body.len(),
            attachments = attachments.len(),
            "mail send (log-only)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_base64_encodes_content() {
        let attachment = Attachment::pdf("ticket.pdf", b"%PDF-1.4 stub".to_vec());
        assert_eq!(attachment.content_type, "application/pdf");
        assert_eq!(attachment.base64_content(), "JVBERi0xLjQgc3R1Yg==");
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let mailer = LogMailer;
        mailer
            .send("rider@example.com", "hello", "<p>hi</p>", vec![])
            .await
            .unwrap();
    }
}
