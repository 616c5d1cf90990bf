/*
[INPUT]:  Recommendation records produced by the research service
[OUTPUT]: Typed recommendation model tolerant of key casing
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When the recommendation record gains or loses fields
*/

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One fragrance recommendation from a completed task.
///
/// The service emits capitalized keys (`Name`, `Brand`, `Notes`); lowercase
/// keys are accepted too. Keys we do not model are kept in `extra`.
/// Records are opaque to the poller, so a missing name is an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default, alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Brand", skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, alias = "Notes", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recommendation {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            brand: None,
            notes: None,
            reasoning: None,
            source_url: None,
            confidence: None,
            extra: Map::new(),
        }
    }

    /// Decode one record without ever failing.
    ///
    /// Fields with an unexpected type are left in `extra`; a bare string is
    /// taken as the name.
    pub fn from_raw(value: Value) -> Self {
        if let Ok(recommendation) = serde_json::from_value::<Self>(value.clone()) {
            return recommendation;
        }

        match value {
            Value::Object(mut map) => {
                let mut recommendation =
                    Self::named(take_string(&mut map, &["name", "Name"]).unwrap_or_default());
                recommendation.brand = take_string(&mut map, &["brand", "Brand"]);
                recommendation.notes = take_string(&mut map, &["notes", "Notes"]);
                recommendation.reasoning = take_string(&mut map, &["reasoning"]);
                recommendation.source_url = take_string(&mut map, &["source_url"]);
                if let Some(confidence) = map.get("confidence").and_then(Value::as_f64) {
                    map.remove("confidence");
                    recommendation.confidence = Some(confidence);
                }
                recommendation.extra = map;
                recommendation
            }
            Value::String(name) => Self::named(name),
            other => {
                let mut recommendation = Self::named("");
                recommendation.extra.insert("value".to_string(), other);
                recommendation
            }
        }
    }
}

fn take_string(map: &mut Map<String, Value>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if map.get(*key).is_some_and(Value::is_string) {
            if let Some(Value::String(value)) = map.remove(*key) {
                return Some(value);
            }
        }
    }
    None
}
