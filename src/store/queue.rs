use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::models::PendingPayment;
use crate::store::kv::{keys, KeyValueStore, StoreError};

/// Typed accessor for the offline payment queue: payment submissions
/// deferred for lack of connectivity, held until replayed and cleared.
///
/// The backing store only supports whole-value get/set, so every enqueue
/// reads and rewrites the full queue. That also means two overlapping
/// enqueues race on read-modify-write and the last write wins; callers
/// needing strict ordering must serialize their own calls. Acceptable
/// for interactive payment entry, which is what this queue holds.
#[derive(Clone)]
pub struct OfflineQueue {
    store: Arc<dyn KeyValueStore>,
}

impl OfflineQueue {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Append a payment to the queue, assigning a locally unique id and
    /// enqueue timestamp. Returns the assigned id.
    ///
    /// The payload must be a JSON object: its fields are persisted at the
    /// top level of the entry, next to `id` and `created_at`. A non-object
    /// payload fails with `StoreError::Malformed`.
    pub fn enqueue(&self, payload: serde_json::Value) -> Result<i64, StoreError> {
        let mut entries = self.list()?;

        let mut id = Utc::now().timestamp_millis();
        if let Some(last) = entries.last() {
            if id <= last.id {
                id = last.id + 1;
            }
        }

        entries.push(PendingPayment {
            id,
            created_at: Utc::now(),
            payload,
        });

        let json = serde_json::to_string(&entries)
            .map_err(|e| StoreError::malformed(keys::OFFLINE_PAYMENTS, e))?;
        self.store.set(keys::OFFLINE_PAYMENTS, &json)?;

        debug!(id, pending = entries.len(), "queued offline payment");
        Ok(id)
    }

    /// Pending payments, oldest first. Empty when nothing is queued.
    ///
    /// A malformed stored queue is a hard error, not a silent reset:
    /// queued payments must not vanish quietly.
    pub fn list(&self) -> Result<Vec<PendingPayment>, StoreError> {
        let Some(json) = self.store.get(keys::OFFLINE_PAYMENTS)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&json).map_err(|e| StoreError::malformed(keys::OFFLINE_PAYMENTS, e))
    }

    /// Discard the entire queue. Used after a successful bulk replay or
    /// an explicit user-initiated discard.
    pub fn clear_all(&self) -> Result<(), StoreError> {
        debug!("clearing offline payment queue");
        self.store.remove(keys::OFFLINE_PAYMENTS)
    }
}

// ============================================================================
// Tests
// ============================================================================
