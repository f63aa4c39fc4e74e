use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A normalized analytics event as delivered by the routing framework.
///
/// Events are read-only inputs: connectors extract fields from `properties`
/// (usually through the mapping engine, which resolves them into a payload
/// before the connector runs) but never mutate or persist the event itself.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawEvent {
    pub uuid: Option<Uuid>,
    pub event: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

impl RawEvent {
    /// Look up a top-level property by name.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Look up a top-level property and read it as a string.
    pub fn property_str(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(Value::as_str)
    }
}
