//! Canonical configuration documents

use crate::normalize::{normalize, ENV_RUN_LISTS, RUN_LIST};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A normalized configuration document
///
/// # Invariants
/// - `run_list`, when present, is an array of strings
/// - `env_run_lists`, when present, maps names to arrays of strings
/// - attribute fields are never `null`
///
/// Deserializing runs the normalizer, so a document can only be obtained in
/// canonical form.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ConfigDocument(Map<String, Value>);

impl ConfigDocument {
    pub(crate) fn from_normalized(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// The `name` field, when it is a string
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    #[must_use]
    pub fn run_list(&self) -> Option<Vec<String>> {
        self.0.get(RUN_LIST).and_then(strings)
    }

    #[must_use]
    pub fn env_run_lists(&self) -> Option<BTreeMap<String, Vec<String>>> {
        self.0
            .get(ENV_RUN_LISTS)?
            .as_object()?
            .iter()
            .map(|(env, list)| Some((env.clone(), strings(list)?)))
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl<'de> Deserialize<'de> for ConfigDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        normalize(raw).map_err(serde::de::Error::custom)
    }
}

impl From<ConfigDocument> for Value {
    fn from(doc: ConfigDocument) -> Self {
        Value::Object(doc.0)
    }
}

fn strings(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}
