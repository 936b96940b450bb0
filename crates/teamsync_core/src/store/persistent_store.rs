//! Seeded, namespaced document persistence.
//!
//! # Responsibility
//! - Load a typed value, seeding and persisting a default on first use.
//! - Save a typed value as one JSON document (last write wins).
//! - Save several documents together through a [`WriteBatch`].
//!
//! # Invariants
//! - Failures are logged at `warn` and swallowed; callers keep their
//!   in-memory value.
//! - Log lines carry keys and byte sizes only, never document contents.

use crate::store::kv_store::{KeyValueStorage, StoreError};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key prefix used when no namespace is configured.
pub const DEFAULT_NAMESPACE: &str = "teamsync";

/// Typed persistence over a [`KeyValueStorage`].
pub struct PersistentStore<S: KeyValueStorage> {
    storage: S,
    namespace: String,
}

impl<S: KeyValueStorage> PersistentStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_namespace(storage, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(storage: S, namespace: impl Into<String>) -> Self {
        Self {
            storage,
            namespace: namespace.into(),
        }
    }

    /// Full storage key for a logical key, e.g. `teamsync:tasks`.
    pub fn namespaced_key(&self, key: &str) -> String {
        if self.namespace.is_empty() {
            key.to_string()
        } else {
            format!("{}:{key}", self.namespace)
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Loads the value stored under `key`.
    ///
    /// - Missing key: persists `default` and returns it.
    /// - Unreadable storage or undecodable document: returns `default`
    ///   without writing, so a corrupt entry is not clobbered by a read.
    pub fn load<T>(&self, key: &str, default: T) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        let full_key = self.namespaced_key(key);
        let raw = match self.storage.get(&full_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("event=store_load module=store status=seeded key={full_key}");
                self.save(key, &default);
                return default;
            }
            Err(err) => {
                warn!("event=store_load module=store status=error key={full_key} error={err}");
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(
                    "event=store_load module=store status=ok key={full_key} bytes={}",
                    raw.len()
                );
                value
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error key={full_key} error={}",
                    StoreError::from(err)
                );
                default
            }
        }
    }

    /// Serializes `value` and overwrites the entry under `key`.
    ///
    /// Returns whether the write reached storage.
    pub fn save<T>(&self, key: &str, value: &T) -> bool
    where
        T: Serialize + ?Sized,
    {
        let full_key = self.namespaced_key(key);
        let result = serde_json::to_string(value)
            .map_err(StoreError::from)
            .and_then(|document| {
                self.storage
                    .put(&full_key, &document)
                    .map(|()| document.len())
            });

        match result {
            Ok(bytes) => {
                debug!("event=store_save module=store status=ok key={full_key} bytes={bytes}");
                true
            }
            Err(err) => {
                warn!("event=store_save module=store status=error key={full_key} error={err}");
                false
            }
        }
    }

    /// Starts a group of saves that reach storage in one `put_batch`.
    pub fn batch(&self) -> WriteBatch<'_, S> {
        WriteBatch {
            store: self,
            entries: Vec::new(),
            failed: false,
        }
    }
}

/// Documents staged for a single storage write.
///
/// If any document fails to serialize, nothing is written.
pub struct WriteBatch<'a, S: KeyValueStorage> {
    store: &'a PersistentStore<S>,
    entries: Vec<(String, String)>,
    failed: bool,
}

impl<S: KeyValueStorage> WriteBatch<'_, S> {
    /// Serializes `value` for `key`.
    pub fn stage<T>(mut self, key: &str, value: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        let full_key = self.store.namespaced_key(key);
        match serde_json::to_string(value) {
            Ok(document) => self.entries.push((full_key, document)),
            Err(err) => {
                warn!(
                    "event=store_save module=store status=error key={full_key} error={}",
                    StoreError::from(err)
                );
                self.failed = true;
            }
        }
        self
    }

    /// Writes every staged document; returns whether the batch landed.
    pub fn commit(self) -> bool {
        if self.failed {
            return false;
        }
        let keys = self
            .entries
            .iter()
            .map(|(key, _)| key.as_str())
            .collect::<Vec<_>>()
            .join(",");
        match self.store.storage.put_batch(&self.entries) {
            Ok(()) => {
                debug!("event=store_save module=store status=ok keys={keys}");
                true
            }
            Err(err) => {
                warn!("event=store_save module=store status=error keys={keys} error={err}");
                false
            }
        }
    }
}
