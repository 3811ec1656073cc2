//! The favorite-words set: a deduplicated, order-preserving list of
//! normalized words kept under one fixed key.
//!
//! Updates are read → merge → write with no locking. Two concurrent adds can
//! lose one update; a single writer is assumed.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::store::KeyValueStore;

/// Storage key of the favorites list.
pub const FAVORITES_KEY: &str = "my-favorite-words";

/// Lowercase and trim; the form favorites are compared and stored in.
pub fn normalize_word(word: &str) -> String {
    word.to_lowercase().trim().to_string()
}

/// Append `incoming` to `existing`, keeping the first occurrence of each
/// string. Comparison is exact on the strings as given.
pub fn merge_words(existing: Vec<String>, incoming: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    existing
        .into_iter()
        .chain(incoming)
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

/// Result of one `add` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddReport {
    /// Words submitted in this batch, before dedup.
    pub submitted: usize,
    /// Words that were not already stored.
    pub added: usize,
    /// Size of the stored set afterwards.
    pub total: usize,
}

pub struct FavoritesBook {
    store: Arc<dyn KeyValueStore>,
}

impl FavoritesBook {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current favorites. A corrupt stored value is logged and read as empty.
    pub async fn load(&self) -> Result<Vec<String>> {
        let Some(raw) = self.store.get(FAVORITES_KEY).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(words) => Ok(words),
            Err(e) => {
                error!(error = %e, "Failed to parse stored favorites; starting from empty");
                Ok(Vec::new())
            }
        }
    }

    /// Normalize `words`, merge them into the stored set, and persist.
    pub async fn add<I, S>(&self, words: I) -> Result<AddReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let incoming: Vec<String> = words.into_iter().map(|w| normalize_word(w.as_ref())).collect();
        let submitted = incoming.len();

        let existing = self.load().await?;
        let before = existing.len();
        let merged = merge_words(existing, incoming);

        let json = serde_json::to_string(&merged).context("Failed to serialize favorites")?;
        self.store.set(FAVORITES_KEY, &json).await?;

        let report = AddReport {
            submitted,
            added: merged.len().saturating_sub(before),
            total: merged.len(),
        };
        info!(submitted, added = report.added, total = report.total, "Updated favorites");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn merge_keeps_first_seen_order() {
        let merged = merge_words(strings(&["cat", "dog"]), strings(&["dog", "bird"]));
        assert_eq!(merged, strings(&["cat", "dog", "bird"]));
    }

    #[test]
    fn merge_dedups_within_batch() {
        let merged = merge_words(vec![], strings(&["a", "b", "a"]));
        assert_eq!(merged, strings(&["a", "b"]));
    }

    #[tokio::test]
    async fn add_normalizes_before_comparing() {
        let store = Arc::new(InMemoryStore::new());
        store.set(FAVORITES_KEY, r#"["cat","dog"]"#).await.unwrap();
        let book = FavoritesBook::new(store.clone());

        let report = book.add(["  Dog ", "BIRD"]).await.unwrap();
        assert_eq!(report, AddReport { submitted: 2, added: 1, total: 3 });
        assert_eq!(book.load().await.unwrap(), strings(&["cat", "dog", "bird"]));
        assert_eq!(
            store.get(FAVORITES_KEY).await.unwrap().as_deref(),
            Some(r#"["cat","dog","bird"]"#)
        );
    }

    #[tokio::test]
    async fn corrupt_value_is_replaced() {
        let store = Arc::new(InMemoryStore::new());
        store.set(FAVORITES_KEY, "not json").await.unwrap();
        let book = FavoritesBook::new(store);

        assert!(book.load().await.unwrap().is_empty());
        book.add(["apple"]).await.unwrap();
        assert_eq!(book.load().await.unwrap(), strings(&["apple"]));
    }
}
