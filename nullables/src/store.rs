//! Nullable draft store — in-memory storage with scripted behavior.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use veriflow_store::{DraftStore, StoreError};

/// An in-memory draft store for testing.
///
/// Records every successful write so tests can assert on write counts and
/// final values. Failures and artificial latency can be toggled at any
/// point to exercise the retry and serialization paths.
pub struct NullDraftStore {
    entries: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<(String, String)>>,
    fail_puts: AtomicBool,
    put_delay_ms: AtomicU64,
}

impl NullDraftStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
            fail_puts: AtomicBool::new(false),
            put_delay_ms: AtomicU64::new(0),
        }
    }

    /// Pre-load a value, e.g. a draft left by a "previous" session.
    pub fn seed(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    /// Make every subsequent `put` fail until turned off again.
    pub fn set_failing(&self, failing: bool) {
        self.fail_puts.store(failing, Ordering::SeqCst);
    }

    /// Add artificial latency to every `put`, to create in-flight overlap.
    pub fn set_put_delay(&self, delay: Duration) {
        self.put_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Current value under `key`, if any.
    pub fn value_of(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    /// Number of successful writes made to `key`.
    pub fn puts_of(&self, key: &str) -> usize {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| k == key)
            .count()
    }
}

impl Default for NullDraftStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftStore for NullDraftStore {
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<String>, StoreError>> {
        let value = self.entries.lock().unwrap().get(key).cloned();
        async move { Ok(value) }.boxed()
    }

    fn put<'a>(&'a self, key: &'a str, value: &'a str) -> BoxFuture<'a, Result<(), StoreError>> {
        async move {
            let delay_ms = self.put_delay_ms.load(Ordering::SeqCst);
            if delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
            if self.fail_puts.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("simulated store failure".into()));
            }
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            self.writes
                .lock()
                .unwrap()
                .push((key.to_string(), value.to_string()));
            Ok(())
        }
        .boxed()
    }
}
