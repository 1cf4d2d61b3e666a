use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PATH_PATTERN: &str = "path_pattern";
pub const DATASET: &str = "dataset";
pub const PROVIDER: &str = "provider";
pub const FORMAT: &str = "format";
pub const START_DATE: &str = "start_date";

/// User supplied connector configuration.
///
/// The mapping is kept opaque: each stream implementation decides which keys it
/// needs, so unknown keys are carried through untouched. Accessors are only
/// provided for the keys every file source understands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceConfig(Map<String, Value>);

impl SourceConfig {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a config from a JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::Configuration(format!(
                "Connector configuration must be a JSON object, got {}",
                other
            ))),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(raw)?)
    }

    /// Builder style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn path_pattern(&self) -> Option<&str> {
        self.get_str(PATH_PATTERN)
    }

    pub fn dataset(&self) -> Option<&str> {
        self.get_str(DATASET)
    }

    pub fn format(&self) -> Option<&Value> {
        self.get(FORMAT)
    }

    pub fn provider(&self) -> Option<&Value> {
        self.get(PROVIDER)
    }

    /// Parse the optional RFC 3339 `start_date` used for incremental reads
    pub fn start_date(&self) -> Result<Option<DateTime<Utc>>> {
        match self.get(START_DATE) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => DateTime::parse_from_rfc3339(raw)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|e| Error::Configuration(format!("Invalid start_date '{}': {}", raw, e))),
            Some(other) => Err(Error::Configuration(format!(
                "start_date must be a string, got {}",
                other
            ))),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for SourceConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
