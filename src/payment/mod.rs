//! Payment domain: gateway client, payment records, verification flow

mod model;
mod paystack;
mod service;

pub use model::VerifyPaymentResponse;
pub use paystack::{InitializeTransactionRequest, PaystackAuthorization, PaystackClient};
pub use service::{generate_reference, PaymentService};
