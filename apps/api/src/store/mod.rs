//! Resume state store — the mutable document the pipelines read and write.
//!
//! Modeled as an explicit seam (`ResumeStore` behind `Arc<dyn …>`) rather
//! than ambient global state, so the retry drivers can be exercised against
//! an in-memory store in tests. Writes are last-writer-wins per field path
//! with no transaction boundary: the lock is held per call, not per
//! operation, so two overlapping invocations may interleave field writes.

pub mod handlers;

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no resume document is loaded")]
    Empty,

    #[error("path '{0}' does not address a writable field")]
    BadPath(String),
}

/// The loaded document plus its identity and modification time.
#[derive(Debug, Clone)]
pub struct StoredResume {
    pub id: Uuid,
    pub updated_at: DateTime<Utc>,
    pub document: Value,
}

/// Snapshot read, whole-document swap, and dotted-path field write.
pub trait ResumeStore: Send + Sync {
    fn get(&self) -> Option<StoredResume>;

    /// Replaces the whole document, assigning a fresh id.
    fn replace(&self, document: Value) -> StoredResume;

    /// Writes one field addressed by a dotted path
    /// (e.g. `sections.skills.items.0.keywords`).
    fn set_value(&self, path: &str, value: Value) -> Result<(), StoreError>;
}

#[derive(Default)]
pub struct InMemoryResumeStore {
    inner: RwLock<Option<StoredResume>>,
}

impl InMemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResumeStore for InMemoryResumeStore {
    fn get(&self) -> Option<StoredResume> {
        self.inner.read().expect("store lock poisoned").clone()
    }

    fn replace(&self, document: Value) -> StoredResume {
        let stored = StoredResume {
            id: Uuid::new_v4(),
            updated_at: Utc::now(),
            document,
        };
        *self.inner.write().expect("store lock poisoned") = Some(stored.clone());
        stored
    }

    fn set_value(&self, path: &str, value: Value) -> Result<(), StoreError> {
        let mut guard = self.inner.write().expect("store lock poisoned");
        let stored = guard.as_mut().ok_or(StoreError::Empty)?;
        write_path(&mut stored.document, path, value)?;
        stored.updated_at = Utc::now();
        Ok(())
    }
}

/// Writes `value` at a dotted `path` inside `root`. Numeric segments index
/// into arrays; the final segment may create a new key in an object but an
/// array slot must already exist.
pub fn write_path(root: &mut Value, path: &str, value: Value) -> Result<(), StoreError> {
    let bad_path = || StoreError::BadPath(path.to_string());

    let mut segments = path.split('.').peekable();
    let mut current = root;

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            match current {
                Value::Object(map) => {
                    map.insert(segment.to_string(), value);
                    return Ok(());
                }
                Value::Array(items) => {
                    let index: usize = segment.parse().map_err(|_| bad_path())?;
                    let slot = items.get_mut(index).ok_or_else(bad_path)?;
                    *slot = value;
                    return Ok(());
                }
                _ => return Err(bad_path()),
            }
        }

        current = match current {
            Value::Object(map) => map.get_mut(segment).ok_or_else(bad_path)?,
            Value::Array(items) => {
                let index: usize = segment.parse().map_err(|_| bad_path())?;
                items.get_mut(index).ok_or_else(bad_path)?
            }
            _ => return Err(bad_path()),
        };
    }

    Err(bad_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "basics": { "headline": "Old headline" },
            "sections": {
                "skills": {
                    "items": [
                        { "name": "Soft Skills", "keywords": ["A"] },
                        { "name": "Hard Skills", "keywords": ["B"] }
                    ]
                }
            }
        })
    }

    #[test]
    fn test_write_path_nested_object() {
        let mut doc = document();
        write_path(&mut doc, "basics.headline", json!("New headline")).unwrap();
        assert_eq!(doc["basics"]["headline"], "New headline");
    }

    #[test]
    fn test_write_path_array_index() {
        let mut doc = document();
        write_path(
            &mut doc,
            "sections.skills.items.1.keywords",
            json!(["Rust", "SQL"]),
        )
        .unwrap();
        assert_eq!(doc["sections"]["skills"]["items"][1]["keywords"], json!(["Rust", "SQL"]));
        // Sibling untouched
        assert_eq!(doc["sections"]["skills"]["items"][0]["keywords"], json!(["A"]));
    }

    #[test]
    fn test_write_path_creates_missing_object_key() {
        let mut doc = document();
        write_path(&mut doc, "basics.label", json!("Engineer")).unwrap();
        assert_eq!(doc["basics"]["label"], "Engineer");
    }

    #[test]
    fn test_write_path_array_out_of_range_fails() {
        let mut doc = document();
        let result = write_path(&mut doc, "sections.skills.items.7.keywords", json!([]));
        assert!(matches!(result, Err(StoreError::BadPath(_))));
    }

    #[test]
    fn test_write_path_through_scalar_fails() {
        let mut doc = document();
        let result = write_path(&mut doc, "basics.headline.inner", json!("x"));
        assert!(matches!(result, Err(StoreError::BadPath(_))));
    }

    #[test]
    fn test_write_path_last_writer_wins() {
        let mut doc = document();
        write_path(&mut doc, "basics.headline", json!("First")).unwrap();
        write_path(&mut doc, "basics.headline", json!("Second")).unwrap();
        assert_eq!(doc["basics"]["headline"], "Second");
    }

    #[test]
    fn test_store_set_value_requires_loaded_document() {
        let store = InMemoryResumeStore::new();
        let result = store.set_value("basics.headline", json!("x"));
        assert!(matches!(result, Err(StoreError::Empty)));
    }

    #[test]
    fn test_store_replace_then_set_value() {
        let store = InMemoryResumeStore::new();
        let first = store.replace(document());
        store
            .set_value("basics.headline", json!("Updated"))
            .unwrap();

        let stored = store.get().unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.document["basics"]["headline"], "Updated");
    }

    #[test]
    fn test_store_replace_assigns_fresh_id() {
        let store = InMemoryResumeStore::new();
        let first = store.replace(document());
        let second = store.replace(document());
        assert_ne!(first.id, second.id);
    }
}
