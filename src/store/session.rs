use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::User;
use crate::store::kv::{keys, KeyValueStore, StoreError};

/// Typed accessor for the persisted session: the auth token and the
/// user record it belongs to.
///
/// Stateless facade over the durable store; every read hits the store,
/// so a token written here is picked up by the next outbound request
/// immediately. Clone is cheap.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist the auth token, overwriting any prior value.
    pub fn set_token(&self, token: &str) -> Result<(), StoreError> {
        self.store.set(keys::AUTH_TOKEN, token)
    }

    /// Current auth token. Absence is the normal logged-out state.
    pub fn token(&self) -> Result<Option<String>, StoreError> {
        self.store.get(keys::AUTH_TOKEN)
    }

    pub fn set_user(&self, user: &User) -> Result<(), StoreError> {
        let json = serde_json::to_string(user)
            .map_err(|e| StoreError::malformed(keys::USER_DATA, e))?;
        self.store.set(keys::USER_DATA, &json)
    }

    /// Stored user record.
    ///
    /// A record that fails to parse is treated as absent: corrupted local
    /// storage degrades to a re-login prompt, not an application fault.
    pub fn user(&self) -> Result<Option<User>, StoreError> {
        let Some(json) = self.store.get(keys::USER_DATA)? else {
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(error = %e, "stored user record is malformed, treating as logged out");
                Ok(None)
            }
        }
    }

    /// Remove both token and user record. Safe to call with no session.
    pub fn clear(&self) -> Result<(), StoreError> {
        debug!("clearing session");
        self.store.remove_many(&[keys::AUTH_TOKEN, keys::USER_DATA])
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::kv::MemoryStore;

    fn session() -> (Arc<MemoryStore>, SessionStore) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), SessionStore::new(store))
    }

    fn test_user() -> User {
        User {
            id: 7,
            name: "Ada Mensah".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            created_at: None,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let (_, session) = session();
        assert_eq!(session.token().unwrap(), None);
        session.set_token("tok-123").unwrap();
        assert_eq!(session.token().unwrap().as_deref(), Some("tok-123"));
    }

    #[test]
    fn test_user_round_trip() {
        let (_, session) = session();
        session.set_user(&test_user()).unwrap();
        assert_eq!(session.user().unwrap(), Some(test_user()));
    }

    #[test]
    fn test_clear_removes_token_and_user() {
        let (_, session) = session();
        session.set_token("tok-123").unwrap();
        session.set_user(&test_user()).unwrap();
        session.clear().unwrap();
        assert_eq!(session.token().unwrap(), None);
        assert_eq!(session.user().unwrap(), None);
    }

    #[test]
    fn test_clear_with_no_session_is_noop() {
        let (_, session) = session();
        session.clear().unwrap();
        session.clear().unwrap();
    }

    #[test]
    fn test_malformed_user_reads_as_absent() {
        let (store, session) = session();
        store.set(keys::USER_DATA, "{not json").unwrap();
        assert_eq!(session.user().unwrap(), None);
    }
}
