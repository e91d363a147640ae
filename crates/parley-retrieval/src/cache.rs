// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded, time-limited cache of model-derived source selections.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use parley_core::KnowledgeSource;
use sha2::{Digest, Sha256};

struct Entry {
    inserted: Instant,
    ids: Vec<String>,
}

/// Caches `question + candidate sources + limit -> selected ids`.
///
/// The key covers every source's id, name and full content, so editing the
/// knowledge base invalidates affected entries naturally.
pub struct SelectionCache {
    capacity: usize,
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl SelectionCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Stable digest of a selection request.
    pub fn key(question: &str, sources: &[KnowledgeSource], limit: usize) -> String {
        let mut hasher = Sha256::new();
        hasher.update(limit.to_le_bytes());
        hasher.update(question.as_bytes());
        for source in sources {
            for field in [&source.id, &source.name, &source.content] {
                hasher.update((field.len() as u64).to_le_bytes());
                hasher.update(field.as_bytes());
            }
        }
        hex::encode(hasher.finalize())
    }

    pub fn get(&self, key: &str) -> Option<Vec<String>> {
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        match entries.get(key) {
            Some(entry) if entry.inserted.elapsed() < self.ttl => Some(entry.ids.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: String, ids: Vec<String>) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            let ttl = self.ttl;
            entries.retain(|_, e| e.inserted.elapsed() < ttl);
            if entries.len() >= self.capacity
                && let Some(oldest) = entries
                    .iter()
                    .min_by_key(|(_, e)| e.inserted)
                    .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest);
            }
        }
        entries.insert(
            key,
            Entry {
                inserted: Instant::now(),
                ids,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::SourceKind;

    fn source(id: &str, content: &str) -> KnowledgeSource {
        KnowledgeSource {
            id: id.to_string(),
            kind: SourceKind::File,
            name: format!("{id}.pdf"),
            content: content.to_string(),
            additional_data: None,
        }
    }

    #[test]
    fn key_changes_with_content() {
        let a = SelectionCache::key("q", &[source("a", "one")], 2);
        let b = SelectionCache::key("q", &[source("a", "two")], 2);
        assert_ne!(a, b);
        assert_eq!(a, SelectionCache::key("q", &[source("a", "one")], 2));
    }

    #[test]
    fn key_changes_with_limit() {
        let sources = [source("a", "x")];
        assert_ne!(
            SelectionCache::key("q", &sources, 2),
            SelectionCache::key("q", &sources, 3)
        );
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let cache = SelectionCache::new(2, Duration::from_secs(60));
        cache.insert("a".into(), vec!["1".into()]);
        cache.insert("b".into(), vec!["2".into()]);
        cache.insert("c".into(), vec!["3".into()]);
        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert_eq!(cache.get("c"), Some(vec!["3".to_string()]));
    }

    #[test]
    fn expired_entries_are_misses() {
        let cache = SelectionCache::new(4, Duration::ZERO);
        cache.insert("a".into(), vec!["1".into()]);
        assert!(cache.get("a").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_capacity_never_stores() {
        let cache = SelectionCache::new(0, Duration::from_secs(60));
        cache.insert("a".into(), vec!["1".into()]);
        assert!(cache.is_empty());
    }
}
