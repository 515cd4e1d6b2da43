// Authoritative in-memory record store

use crate::error::StoreError;
use indexmap::IndexMap;


/// Keyed record store for one state kind (missions or NPCs).
///
/// Records keep their insertion slot for the lifetime of the registry:
/// replacing a value never moves it, and there is no removal. Callers only
/// see owned copies of the contents, never the map itself.
/// A value a registry can hold.
///
/// `normalized` runs on every value entering through `upsert` and restores
/// whatever invariants the record kind carries. The default keeps the value.
pub trait Record: Clone {
    fn normalized(self) -> Self {
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StateRegistry<V> {
    records: IndexMap<String, V>,
}

impl<V: Record> StateRegistry<V> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            records: IndexMap::new(),
        }
    }

    /// Look up a record by key
    pub fn get(&self, key: &str) -> Option<&V> {
        self.records.get(key)
    }

    /// Insert or replace a record, returning the value it replaced.
    ///
    /// A replaced record keeps its original position. The stored value is
    /// the normalized form of `value`.
    pub fn upsert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        self.records.insert(key.into(), value.normalized())
    }

    /// Ordered copy of every record at call time
    pub fn all(&self) -> Vec<(String, V)> {
        self.records
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Ordered record keys
    pub fn keys(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Mutate a single record slot in place.
    ///
    /// Returns `StoreError::NotFound` when the key is absent.
    pub(crate) fn modify<R>(
        &mut self,
        key: &str,
        f: impl FnOnce(&mut V) -> R,
    ) -> Result<R, StoreError> {
        self.records
            .get_mut(key)
            .map(f)
            .ok_or_else(|| StoreError::not_found(key))
    }
}

impl<V: Record> Default for StateRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V: Record> FromIterator<(K, V)> for StateRegistry<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (key, value) in iter {
            registry.upsert(key, value);
        }
        registry
    }
}
