//! In-memory store, for tests and for embedding without a data directory.

use std::collections::HashMap;
use std::sync::Mutex;

use super::SnapshotStore;
use crate::error::{PlanningError, PlanningResult};

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_values<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> PlanningResult<T> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| PlanningError::Store("memory store lock poisoned".into()))?;
        Ok(f(&mut values))
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> PlanningResult<Option<String>> {
        self.with_values(|values| values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PlanningResult<()> {
        self.with_values(|values| {
            values.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> PlanningResult<()> {
        self.with_values(|values| {
            values.remove(key);
        })
    }
}
