//! paykeep - client-side session and offline payment queue.
//!
//! This crate is the core of a mobile payments client: it attaches the
//! stored credential to every outbound request, detects session expiry,
//! persists session and user state across restarts, and buffers payment
//! submissions made while offline so they can be replayed later.
//!
//! Typical wiring:
//!
//! ```no_run
//! use std::sync::Arc;
//! use paykeep::api::ApiClient;
//! use paykeep::config::Config;
//! use paykeep::store::{FileStore, OfflineQueue, SessionStore};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let store = Arc::new(FileStore::new(config.data_dir()?)?);
//! let client = ApiClient::new(
//!     config.api_base_url.clone(),
//!     SessionStore::new(store.clone()),
//!     OfflineQueue::new(store),
//! )?;
//! let mut invalidations = client.subscribe_invalidations();
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod models;
pub mod store;

pub use api::{ApiClient, ApiError, PaymentSubmission, SessionInvalidated};
pub use config::Config;
pub use models::{PendingPayment, User};
pub use store::{
    AppSettings, FileStore, KeyValueStore, MemoryStore, OfflineQueue, SearchHistory, SessionStore,
    StoreError,
};
