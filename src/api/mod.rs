//! REST API pipeline for the payments backend.
//!
//! This module provides the `ApiClient`: every outbound request carries
//! the stored bearer token, and every 401 response clears the session
//! and broadcasts a `SessionInvalidated` event. Payments submitted
//! without connectivity land in the offline queue and are replayed
//! through the same pipeline.

pub mod client;
pub mod error;

pub use client::{ApiClient, PaymentSubmission, SessionInvalidated};
pub use error::ApiError;
