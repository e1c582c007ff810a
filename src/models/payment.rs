use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A payment submission held in the offline queue awaiting replay.
///
/// `id` and `created_at` are assigned locally at enqueue time; the
/// caller-supplied payment fields are flattened alongside them, so the
/// persisted entry looks exactly like the original payment object with
/// the two bookkeeping fields added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingPayment {
    /// Locally unique id: Unix milliseconds at enqueue time, bumped past
    /// the previous tail entry on collision.
    pub id: i64,

    /// Enqueue timestamp, distinct from any server-side timestamp.
    pub created_at: DateTime<Utc>,

    /// Caller-supplied payment data, passed to the backend verbatim on
    /// replay. Must be a JSON object, since its fields are flattened into
    /// the entry.
    #[serde(flatten)]
    pub payload: serde_json::Value,
}
