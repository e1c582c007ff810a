//! Durable local storage for all client state.
//!
//! This module provides:
//! - `KeyValueStore`: the persistent string-keyed storage abstraction,
//!   with `FileStore` (disk) and `MemoryStore` (tests) implementations
//! - `SessionStore`: auth token + user record, cleared together
//! - `OfflineQueue`: payments deferred while offline, awaiting replay
//! - `SearchHistory`: bounded most-recent-first search terms
//! - `AppSettings`: opaque settings blob
//!
//! All accessors are stateless facades that serialize on every call, so
//! reads always reflect the latest persisted write.

pub mod history;
pub mod kv;
pub mod queue;
pub mod session;
pub mod settings;

pub use history::SearchHistory;
pub use kv::{keys, FileStore, KeyValueStore, MemoryStore, StoreError};
pub use queue::OfflineQueue;
pub use session::SessionStore;
pub use settings::AppSettings;
