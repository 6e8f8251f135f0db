//! Two-level keyed persistence: a namespace (one per date, plus stats) and
//! an item within it.
//!
//! Backends only move JSON values. The typed accessors [`SessionStore`] and
//! [`StatsStore`] own the schema.
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::constants::{ITEM_COUNTS, ITEM_STATE, STATS_NAMESPACE};
use crate::date::DateKey;
use crate::state::{Completion, SessionState, StateViolation};
use crate::stats::StatsRecord;

/// Top level of the key space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Date(DateKey),
    Stats,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{date}"),
            Self::Stats => f.write_str(STATS_NAMESPACE),
        }
    }
}

/// Fully qualified storage key; displays as `"<namespace>:<item>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageKey {
    pub namespace: Namespace,
    pub item: &'static str,
}

impl StorageKey {
    #[must_use]
    pub const fn session(date: DateKey) -> Self {
        Self {
            namespace: Namespace::Date(date),
            item: ITEM_STATE,
        }
    }

    #[must_use]
    pub const fn stats() -> Self {
        Self {
            namespace: Namespace::Stats,
            item: ITEM_COUNTS,
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.item)
    }
}

/// Raw persistence backend
/// Platform-specific implementations should provide this
pub trait PuzzleStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &StorageKey) -> Result<Option<Value>, Self::Error>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write(&self, key: &StorageKey, value: Value) -> Result<(), Self::Error>;
}

/// Typed storage failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend failed for '{key}': {source}")]
    Backend {
        key: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("stored value for '{key}' is malformed: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("stored value for '{key}' is inconsistent: {source}")]
    Inconsistent {
        key: String,
        #[source]
        source: StateViolation,
    },
}

impl StoreError {
    fn backend<E>(key: &StorageKey, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            key: key.to_string(),
            source: Box::new(err),
        }
    }

    fn malformed(key: &StorageKey, err: serde_json::Error) -> Self {
        Self::Malformed {
            key: key.to_string(),
            source: err,
        }
    }
}

fn read_typed<S, T>(storage: &S, key: &StorageKey) -> Result<Option<T>, StoreError>
where
    S: PuzzleStorage + ?Sized,
    T: serde::de::DeserializeOwned,
{
    match storage.read(key).map_err(|e| StoreError::backend(key, e))? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| StoreError::malformed(key, e)),
    }
}

fn write_typed<S, T>(storage: &S, key: &StorageKey, value: &T) -> Result<(), StoreError>
where
    S: PuzzleStorage + ?Sized,
    T: serde::Serialize,
{
    let value = serde_json::to_value(value).map_err(|e| StoreError::malformed(key, e))?;
    storage
        .write(key, value)
        .map_err(|e| StoreError::backend(key, e))
}

/// Per-date session persistence.
#[derive(Debug)]
pub struct SessionStore<'a, S: ?Sized> {
    storage: &'a S,
}

impl<'a, S: PuzzleStorage + ?Sized> SessionStore<'a, S> {
    pub const fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Stored state for `date`, or a fresh in-progress state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the stored value is malformed.
    pub fn load(&self, date: DateKey) -> Result<SessionState, StoreError> {
        let key = StorageKey::session(date);
        let state: SessionState = read_typed(self.storage, &key)?.unwrap_or_default();
        state
            .validate()
            .map_err(|source| StoreError::Inconsistent {
                key: key.to_string(),
                source,
            })?;
        Ok(state)
    }

    /// Replace the stored state for `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn save(&self, date: DateKey, state: &SessionState) -> Result<(), StoreError> {
        write_typed(self.storage, &StorageKey::session(date), state)
    }
}

/// Lifetime stats persistence.
#[derive(Debug)]
pub struct StatsStore<'a, S: ?Sized> {
    storage: &'a S,
}

impl<'a, S: PuzzleStorage + ?Sized> StatsStore<'a, S> {
    pub const fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Current counters, all zero if nothing has been recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the stored value is malformed.
    pub fn load(&self) -> Result<StatsRecord, StoreError> {
        Ok(read_typed(self.storage, &StorageKey::stats())?.unwrap_or_default())
    }

    /// Record one completed session and persist the counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the counters cannot be read or written.
    pub fn log_completion(
        &self,
        completion: Completion,
        attempts: usize,
    ) -> Result<StatsRecord, StoreError> {
        let mut record = self.load()?;
        record.log_completion(completion, attempts);
        write_typed(self.storage, &StorageKey::stats(), &record)?;
        Ok(record)
    }
}

/// In-memory backend shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Rc<RefCell<HashMap<String, Value>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl PuzzleStorage for MemoryStorage {
    type Error = std::convert::Infallible;

    fn read(&self, key: &StorageKey) -> Result<Option<Value>, Self::Error> {
        Ok(self.values.borrow().get(&key.to_string()).cloned())
    }

    fn write(&self, key: &StorageKey, value: Value) -> Result<(), Self::Error> {
        self.values.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn keys_render_in_wire_format() {
        assert_eq!(
            StorageKey::session(day("20240301")).to_string(),
            "20240301:state"
        );
        assert_eq!(StorageKey::stats().to_string(), "stats:counts");
    }

    #[test]
    fn missing_session_loads_fresh() {
        let storage = MemoryStorage::new();
        let sessions = SessionStore::new(&storage);
        assert_eq!(sessions.load(day("20240301")).unwrap(), SessionState::new());
    }

    #[test]
    fn save_replaces_rather_than_merges() {
        let storage = MemoryStorage::new();
        let sessions = SessionStore::new(&storage);
        let date = day("20240301");
        let mut first = SessionState::new();
        first.guesses.push("A".into());
        first.guesses.push("B".into());
        sessions.save(date, &first).unwrap();
        let mut second = SessionState::new();
        second.guesses.push("C".into());
        sessions.save(date, &second).unwrap();
        assert_eq!(sessions.load(date).unwrap(), second);
    }

    #[test]
    fn save_after_load_is_a_no_op() {
        let storage = MemoryStorage::new();
        let sessions = SessionStore::new(&storage);
        let date = day("20240302");
        let loaded = sessions.load(date).unwrap();
        sessions.save(date, &loaded).unwrap();
        assert_eq!(sessions.load(date).unwrap(), loaded);
        assert_eq!(storage.keys(), ["20240302:state"]);
    }

    #[test]
    fn dates_are_isolated() {
        let storage = MemoryStorage::new();
        let sessions = SessionStore::new(&storage);
        let mut state = SessionState::new();
        state.guesses.push("A".into());
        sessions.save(day("20240301"), &state).unwrap();
        assert_eq!(sessions.load(day("20240302")).unwrap().guess_count(), 0);
    }

    #[test]
    fn malformed_values_surface_as_errors() {
        let storage = MemoryStorage::new();
        storage
            .write(&StorageKey::stats(), json!({"total": "many"}))
            .unwrap();
        let err = StatsStore::new(&storage).load().unwrap_err();
        assert!(matches!(err, StoreError::Malformed { ref key, .. } if key == "stats:counts"));
    }

    #[test]
    fn impossible_saved_states_are_refused() {
        let storage = MemoryStorage::new();
        let date = day("20240303");
        let key = StorageKey::session(date);
        let sessions = SessionStore::new(&storage);

        let six = json!(["a", "b", "c", "d", "e", "f"]);
        storage
            .write(&key, json!({"gameGuesses": six, "gameCompletion": "inProgress"}))
            .unwrap();
        let err = sessions.load(date).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Inconsistent {
                source: StateViolation::UnfinishedAfterLastGuess,
                ..
            }
        ));

        storage
            .write(&key, json!({"gameGuesses": ["a"], "gameCompletion": "lose"}))
            .unwrap();
        assert!(matches!(
            sessions.load(date),
            Err(StoreError::Inconsistent { .. })
        ));

        storage
            .write(&key, json!({"gameGuesses": [], "gameCompletion": "win"}))
            .unwrap();
        assert!(matches!(
            sessions.load(date),
            Err(StoreError::Inconsistent { .. })
        ));
    }

    #[test]
    fn stats_accumulate_across_calls() {
        let storage = MemoryStorage::new();
        let stats = StatsStore::new(&storage);
        stats.log_completion(Completion::Win, 3).unwrap();
        let record = stats.log_completion(Completion::Lose, 6).unwrap();
        assert_eq!(record.bucket(3), Some(1));
        assert_eq!(record.lose, 1);
        assert_eq!(stats.load().unwrap(), record);
    }
}
