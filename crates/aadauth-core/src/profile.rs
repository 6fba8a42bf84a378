//! The merged user profile produced by one login's aggregation

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// String-keyed profile assembled from directory entity responses.
///
/// Created empty for every login and owned by a single aggregation run.
/// Entity handlers write whole values under their own keys; nothing is
/// merged field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(Map<String, Value>);

impl Profile {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Assign `value` under `key`, replacing whatever was there
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Profile {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
