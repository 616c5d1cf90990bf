/*
[INPUT]:  Research service JSON payloads
[OUTPUT]: Typed response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::enums::TaskStatus;
use super::models::Recommendation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartResearchResponse {
    pub task_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `GET /api/research/status/{task_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "lenient_progress")]
    pub progress: u32,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_recommendations")]
    pub recommendations: Option<Vec<Recommendation>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TaskStatusResponse {
    pub fn new(status: TaskStatus, progress: u32) -> Self {
        Self {
            task_id: None,
            status,
            progress,
            message: None,
            recommendations: None,
            error: None,
        }
    }
}

/// `null`, non-numeric or negative progress reads as 0; fractions are rounded.
fn lenient_progress<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let percent = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(percent
        .filter(|value| value.is_finite())
        .map(|value| value.round().clamp(0.0, u32::MAX as f64) as u32)
        .unwrap_or(0))
}

/// A status carrying recommendations must never fail to decode because of one record.
fn lenient_recommendations<'de, D>(deserializer: D) -> Result<Option<Vec<Recommendation>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(items.into_iter().map(Recommendation::from_raw).collect()),
        Some(other) => Some(vec![Recommendation::from_raw(other)]),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CancelResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error payload, `{ "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
