//! Payment service layer - gateway glue and local status transitions
//!
//! The gateway's verify response is the source of truth: exactly the status
//! string `"success"` promotes the local payment and vote records.

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::PgPool;

use crate::error::{ApiError, ApiResult};
use crate::models::{Payment, PaymentStatus, Vote, VoteStatus};
use crate::payment::model::VerifyPaymentResponse;
use crate::payment::paystack::{
    InitializeTransactionRequest, PaystackAuthorization, PaystackClient,
};

/// Generate a payment reference: `TWB-` plus 12 random uppercase characters
pub fn generate_reference() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(|c| (c as char).to_ascii_uppercase())
        .collect();

    format!("TWB-{}", suffix)
}

/// Payment service for gateway interaction and payment records
#[derive(Clone)]
pub struct PaymentService {
    db_pool: PgPool,
    paystack: PaystackClient,
    base_url: String,
}

impl PaymentService {
    /// Create new payment service instance
    pub fn new(db_pool: PgPool, paystack: PaystackClient, base_url: String) -> Self {
        Self {
            db_pool,
            paystack,
            base_url,
        }
    }

    /// Initialize a gateway transaction for a pending vote, returning the
    /// hosted checkout authorization
    pub async fn initialize_for_vote(
        &self,
        vote: &Vote,
        email: &str,
    ) -> ApiResult<PaystackAuthorization> {
        let request = InitializeTransactionRequest {
            email: email.to_string(),
            amount: vote.amount,
            reference: vote.payment_reference.clone(),
            callback_url: format!(
                "{}/payments/callback?reference={}",
                self.base_url, vote.payment_reference
            ),
        };

        let authorization = self
            .paystack
            .initialize_transaction(&request)
            .await
            .map_err(|e| ApiError::GatewayError(e.to_string()))?;

        Ok(authorization)
    }

    /// Get a payment by its gateway reference
    pub async fn get_payment_by_reference(&self, reference: &str) -> ApiResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE reference = $1")
            .bind(reference)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(payment)
    }

    /// Verify a reference against the gateway and apply the local status
    /// transition.
    ///
    /// Re-verifying an already settled reference is a no-op. Gateway or
    /// network failures surface as errors without touching local state.
    pub async fn verify_reference(&self, reference: &str) -> ApiResult<VerifyPaymentResponse> {
        let payment = self
            .get_payment_by_reference(reference)
            .await?
            .ok_or_else(|| ApiError::NotFound("Payment not found".to_string()))?;

        let vote = sqlx::query_as::<_, Vote>("SELECT * FROM votes WHERE id = $1")
            .bind(payment.vote_id)
            .fetch_one(&self.db_pool)
            .await?;

        // Already settled: nothing to do
        if payment.status == PaymentStatus::Success {
            return Ok(VerifyPaymentResponse {
                reference: payment.reference,
                payment_status: payment.status,
                vote_status: vote.status,
                vote_id: vote.id,
                updated: false,
            });
        }

        let gateway_tx = self
            .paystack
            .verify_transaction(reference)
            .await
            .map_err(|e| ApiError::GatewayError(e.to_string()))?;

        if gateway_tx.amount != payment.amount {
            tracing::warn!(
                reference = %reference,
                local_amount = payment.amount,
                gateway_amount = gateway_tx.amount,
                "Amount mismatch between local payment and gateway record"
            );
        }

        match gateway_tx.status.as_str() {
            "success" => {
                self.settle(&payment, &gateway_tx.channel, gateway_tx.paid_at)
                    .await?;

                tracing::info!(reference = %reference, vote_id = %vote.id, "Payment verified");

                Ok(VerifyPaymentResponse {
                    reference: payment.reference,
                    payment_status: PaymentStatus::Success,
                    vote_status: VoteStatus::Success,
                    vote_id: vote.id,
                    updated: true,
                })
            }
            "failed" | "abandoned" | "reversed" => {
                self.mark_failed(&payment).await?;

                Ok(VerifyPaymentResponse {
                    reference: payment.reference,
                    payment_status: PaymentStatus::Failed,
                    vote_status: VoteStatus::Failed,
                    vote_id: vote.id,
                    updated: true,
                })
            }
            other => {
                // Still in flight on the gateway side; leave local state alone
                tracing::debug!(reference = %reference, gateway_status = %other, "Payment not settled yet");

                Ok(VerifyPaymentResponse {
                    reference: payment.reference,
                    payment_status: payment.status,
                    vote_status: vote.status,
                    vote_id: vote.id,
                    updated: false,
                })
            }
        }
    }

    /// Promote payment and vote to success in one transaction
    async fn settle(
        &self,
        payment: &Payment,
        channel: &Option<String>,
        paid_at: Option<chrono::DateTime<Utc>>,
    ) -> ApiResult<()> {
        let now = Utc::now();
        let mut tx = self.db_pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE payments
            SET status = 'success', channel = $2, paid_at = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(payment.id)
        .bind(channel)
        .bind(paid_at.unwrap_or(now))
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE votes SET status = 'success', updated_at = $2 WHERE id = $1")
            .bind(payment.vote_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Mark payment and vote failed in one transaction
    async fn mark_failed(&self, payment: &Payment) -> ApiResult<()> {
        let now = Utc::now();
        let mut tx = self.db_pool.begin().await?;

        sqlx::query("UPDATE payments SET status = 'failed', updated_at = $2 WHERE id = $1")
            .bind(payment.id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE votes SET status = 'failed', updated_at = $2 WHERE id = $1")
            .bind(payment.vote_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_reference_format() {
        let reference = generate_reference();
        assert!(reference.starts_with("TWB-"));
        assert_eq!(reference.len(), 16);
        assert!(reference[4..]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_reference_unique() {
        let a = generate_reference();
        let b = generate_reference();
        assert_ne!(a, b);
    }
}
