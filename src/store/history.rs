use std::sync::Arc;

use tracing::warn;

use crate::store::kv::{keys, KeyValueStore, StoreError};

/// Maximum number of search terms retained.
const HISTORY_LIMIT: usize = 10;

/// Typed accessor for the search history: a bounded, deduplicated,
/// most-recent-first list of past search terms.
#[derive(Clone)]
pub struct SearchHistory {
    store: Arc<dyn KeyValueStore>,
}

impl SearchHistory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Record a search term at the front of the history.
    ///
    /// Any prior occurrence of the term is removed first, and the list is
    /// truncated to the limit. Blank terms are ignored.
    pub fn add(&self, term: &str) -> Result<(), StoreError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(());
        }

        let mut history = self.list()?;
        history.retain(|t| t != term);
        history.insert(0, term.to_string());
        history.truncate(HISTORY_LIMIT);

        let json = serde_json::to_string(&history)
            .map_err(|e| StoreError::malformed(keys::SEARCH_HISTORY, e))?;
        self.store.set(keys::SEARCH_HISTORY, &json)
    }

    /// Past search terms, most recent first.
    ///
    /// Malformed stored history degrades to empty; it is a UI convenience,
    /// not data worth failing over.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let Some(json) = self.store.get(keys::SEARCH_HISTORY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&json) {
            Ok(history) => Ok(history),
            Err(e) => {
                warn!(error = %e, "stored search history is malformed, resetting");
                Ok(Vec::new())
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

    fn history() -> (Arc<MemoryStore>, SearchHistory) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), SearchHistory::new(store))
    }

    #[test]
    fn test_list_empty_when_absent() {
        let (_, history) = history();
        assert!(history.list().unwrap().is_empty());
    }

    #[test]
    fn test_dedup_moves_term_to_front() {
        let (_, history) = history();
        history.add("a").unwrap();
        history.add("b").unwrap();
        history.add("a").unwrap();
        assert_eq!(history.list().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_repeated_term_stays_single() {
        let (_, history) = history();
        for _ in 0..5 {
            history.add("rent").unwrap();
        }
        assert_eq!(history.list().unwrap(), vec!["rent"]);
    }

    #[test]
    fn test_bounded_at_ten_most_recent() {
        let (_, history) = history();
        for i in 1..=15 {
            history.add(&format!("term-{}", i)).unwrap();
        }
        let terms = history.list().unwrap();
        assert_eq!(terms.len(), 10);
        assert_eq!(terms[0], "term-15");
        assert_eq!(terms[9], "term-6");
    }

    #[test]
    fn test_blank_term_ignored() {
        let (_, history) = history();
        history.add("   ").unwrap();
        history.add("").unwrap();
        assert!(history.list().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_history_degrades_to_empty() {
        let (store, history) = history();
        store.set(keys::SEARCH_HISTORY, "not an array").unwrap();
        assert!(history.list().unwrap().is_empty());
        // And writes recover from there
        history.add("fresh").unwrap();
        assert_eq!(history.list().unwrap(), vec!["fresh"]);
    }
}
