//! Phone OTP verification interface.
//!
//! Delivery itself is out of scope; the platform only consumes the
//! start/check pair.

use async_trait::async_trait;
use dashmap::DashMap;
use rand::Rng as _;

/// Abstraction over OTP verification providers.
#[async_trait]
pub trait OtpService: Send + Sync {
    /// Begin a verification for a phone number. Returns a request id the
    /// client echoes back together with the received code.
    async fn start_verification(&self, phone: &str) -> anyhow::Result<String>;

    /// Check a code against a pending verification.
    async fn check_verification(
        &self,
        request_id: &str,
        code: &str,
    ) -> anyhow::Result<bool>;
}

/// In-process OTP service for development and tests.
///
/// Generates a 4-digit code per request and logs it instead of sending an
/// SMS. A successful check consumes the pending verification.
pub struct MockOtpService {
    pending: DashMap<String, String>,
}

impl MockOtpService {
    /// Creates an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: DashMap::new(),
        }
    }
}

impl Default for MockOtpService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OtpService for MockOtpService {
    async fn start_verification(&self, phone: &str) -> anyhow::Result<String> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let code = format!("{:04}", rand::rng().random_range(0..10_000));
        tracing::info!(phone, request_id, code, "otp verification started (mock)");
        self.pending.insert(request_id.clone(), code);
        Ok(request_id)
    }

    async fn check_verification(
        &self,
        request_id: &str,
        code: &str,
    ) -> anyhow::Result<bool> {
        let matched = self
            .pending
            .get(request_id)
            .is_some_and(|expected| expected.value() == code);
        if matched {
            self.pending.remove(request_id);
        }
        Ok(matched)
    }
}
