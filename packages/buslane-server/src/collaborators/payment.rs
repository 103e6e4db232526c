//! Payment gateway interface and the Stripe-backed implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A created payment intent. The client secret is forwarded to the client
/// unmodified so it can confirm the payment out of band.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub client_secret: String,
}

/// Abstraction over payment processors.
///
/// Amounts are integral minor currency units (a fare of 12.5 is 1250).
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for `amount_minor` units of `currency`.
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> anyhow::Result<PaymentIntent>;
}

/// Stripe payment gateway: form-encoded POST to `/v1/payment_intents`.
pub struct StripeGateway {
    secret_key: String,
    endpoint: String,
    http: reqwest::Client,
}

impl StripeGateway {
    /// Creates a gateway against the production Stripe API.
    #[must_use]
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self::with_endpoint(secret_key, "https://api.stripe.com")
    }

    /// Creates a gateway against a custom endpoint (stripe-mock, proxies).
    #[must_use]
    pub fn with_endpoint(
        secret_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            secret_key: secret_key.into(),
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> anyhow::Result<PaymentIntent> {
        #[derive(Deserialize)]
        struct IntentResponse {
            client_secret: String,
        }

        let params = [
            ("amount", amount_minor.to_string()),
            ("currency", currency.to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let response = self
            .http
            .post(format!("{}/v1/payment_intents", self.endpoint))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("payment intent creation failed ({status}): {body}");
        }

        let intent: IntentResponse = response.json().await?;
        tracing::info!(amount_minor, currency, "payment intent created");
        Ok(PaymentIntent {
            client_secret: intent.client_secret,
        })
    }
}
