//! Data models persisted by the client.
//!
//! - `User`: the authenticated user record stored with the session
//! - `PendingPayment`: an offline-queued payment submission

pub mod payment;
pub mod user;

pub use payment::PendingPayment;
pub use user::User;
