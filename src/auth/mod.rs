//! Authentication primitives
//!
//! Verification of provider-issued JWTs and the claims they carry. The
//! request-side extractors live in [`crate::middleware::auth`].

mod jwt;

pub use jwt::{get_user_id_from_claims, verify_token, Claims, JwtError};
