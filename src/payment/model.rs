//! Payment request/response types

use serde::Serialize;
use uuid::Uuid;

use crate::models::{PaymentStatus, VoteStatus};

/// Response for `GET /api/payments/verify/:reference`
#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub reference: String,
    pub payment_status: PaymentStatus,
    pub vote_status: VoteStatus,
    pub vote_id: Uuid,
    /// Whether this call changed local state (false for re-verification of
    /// an already settled reference)
    pub updated: bool,
}
