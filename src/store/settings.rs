use std::sync::Arc;

use tracing::warn;

use crate::store::kv::{keys, KeyValueStore, StoreError};

/// Typed accessor for the opaque app-settings blob, read and written
/// wholesale. No internal structure is enforced at this layer.
#[derive(Clone)]
pub struct AppSettings {
    store: Arc<dyn KeyValueStore>,
}

impl AppSettings {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn set(&self, settings: &serde_json::Value) -> Result<(), StoreError> {
        let json = serde_json::to_string(settings)
            .map_err(|e| StoreError::malformed(keys::APP_SETTINGS, e))?;
        self.store.set(keys::APP_SETTINGS, &json)
    }

    /// Stored settings, or an empty object when absent or malformed.
    pub fn get(&self) -> Result<serde_json::Value, StoreError> {
        let Some(json) = self.store.get(keys::APP_SETTINGS)? else {
            return Ok(serde_json::json!({}));
        };
        match serde_json::from_str(&json) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!(error = %e, "stored app settings are malformed, using defaults");
                Ok(serde_json::json!({}))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::kv::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_defaults_to_empty_object() {
        let settings = AppSettings::new(Arc::new(MemoryStore::new()));
        assert_eq!(settings.get().unwrap(), json!({}));
    }

    #[test]
    fn test_round_trip() {
        let settings = AppSettings::new(Arc::new(MemoryStore::new()));
        let value = json!({"theme": "dark", "notifications": true});
        settings.set(&value).unwrap();
        assert_eq!(settings.get().unwrap(), value);
    }

    #[test]
    fn test_malformed_settings_degrade_to_defaults() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::APP_SETTINGS, "][").unwrap();
        let settings = AppSettings::new(store);
        assert_eq!(settings.get().unwrap(), json!({}));
    }
}
