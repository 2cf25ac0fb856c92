//! Paystack API client
//!
//! Thin wrapper over the Paystack REST API for transaction initialize and
//! verify calls. Trust-sensitive work (fraud checks, settlement,
//! idempotency of charges) stays on the gateway side; this client only
//! forwards requests and parses responses.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Paystack envelope: every response carries `status` (request-level
/// success) and a `data` payload.
#[derive(Debug, Deserialize)]
struct PaystackEnvelope<T> {
    status: bool,
    message: String,
    data: Option<T>,
}

/// Request body for `POST /transaction/initialize`
#[derive(Debug, Serialize)]
pub struct InitializeTransactionRequest {
    pub email: String,
    /// Amount in minor currency units
    pub amount: i64,
    pub reference: String,
    pub callback_url: String,
}

/// Payload returned by `POST /transaction/initialize`
#[derive(Debug, Deserialize)]
pub struct PaystackAuthorization {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

/// Payload returned by `GET /transaction/verify/{reference}`
#[derive(Debug, Deserialize)]
pub struct PaystackTransaction {
    /// Gateway status string; exactly `"success"` means settled
    pub status: String,
    pub reference: String,
    pub amount: i64,
    pub channel: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Paystack REST client
#[derive(Clone)]
pub struct PaystackClient {
    client: Client,
    base_url: String,
    secret_key: String,
}

impl PaystackClient {
    /// Create a new client against the given API base URL
    pub fn new(base_url: String, secret_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url,
            secret_key,
        }
    }

    /// Initialize a transaction, returning the hosted checkout authorization
    pub async fn initialize_transaction(
        &self,
        request: &InitializeTransactionRequest,
    ) -> Result<PaystackAuthorization> {
        let url = format!("{}/transaction/initialize", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .json(request)
            .send()
            .await
            .context("Failed to reach Paystack initialize endpoint")?;

        let envelope: PaystackEnvelope<PaystackAuthorization> = response
            .json()
            .await
            .context("Failed to parse Paystack initialize response")?;

        if !envelope.status {
            return Err(anyhow!("Paystack initialize rejected: {}", envelope.message));
        }

        envelope
            .data
            .ok_or_else(|| anyhow!("Paystack initialize response missing data"))
    }

    /// Verify a transaction by reference
    pub async fn verify_transaction(&self, reference: &str) -> Result<PaystackTransaction> {
        let url = format!("{}/transaction/verify/{}", self.base_url, reference);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .context("Failed to reach Paystack verify endpoint")?;

        let envelope: PaystackEnvelope<PaystackTransaction> = response
            .json()
            .await
            .context("Failed to parse Paystack verify response")?;

        if !envelope.status {
            return Err(anyhow!("Paystack verify rejected: {}", envelope.message));
        }

        envelope
            .data
            .ok_or_else(|| anyhow!("Paystack verify response missing data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_parsing() {
        let body = r#"{
            "status": true,
            "message": "Verification successful",
            "data": {
                "status": "success",
                "reference": "TWB-ABC123",
                "amount": 500,
                "channel": "mobile_money",
                "paid_at": "2025-03-10T12:00:00Z"
            }
        }"#;

        let envelope: PaystackEnvelope<PaystackTransaction> = serde_json::from_str(body).unwrap();
        assert!(envelope.status);
        let tx = envelope.data.unwrap();
        assert_eq!(tx.status, "success");
        assert_eq!(tx.amount, 500);
        assert_eq!(tx.channel.as_deref(), Some("mobile_money"));
    }

    #[test]
    fn test_envelope_without_data() {
        let body = r#"{"status": false, "message": "Transaction reference not found"}"#;

        let envelope: PaystackEnvelope<PaystackTransaction> = serde_json::from_str(body).unwrap();
        assert!(!envelope.status);
        assert!(envelope.data.is_none());
    }
}
