/*
[INPUT]:  Caller-supplied notes/preferences or an untrusted JSON body
[OUTPUT]: Validated start request, serialized exactly as {notes, preferences}
[POS]:    Data layer - request validation shared by proxy and client
[UPDATE]: When the start payload or its validation rules change
*/

use serde::Serialize;
use serde_json::Value;

use crate::http::{ResearchError, Result};

pub const NOTES_REQUIRED: &str = "notes array is required";
const NOTES_NOT_STRINGS: &str = "notes must contain only strings";
const PREFERENCES_NOT_STRING: &str = "preferences must be a string";

/// Body of `POST /api/research/start`.
///
/// Construction always goes through validation, so a value of this type never
/// carries an empty notes list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartResearchRequest {
    notes: Vec<String>,
    preferences: String,
}

impl StartResearchRequest {
    pub fn new(notes: Vec<String>, preferences: impl Into<String>) -> Result<Self> {
        if notes.is_empty() {
            return Err(ResearchError::Validation(NOTES_REQUIRED.to_string()));
        }

        Ok(Self {
            notes,
            preferences: preferences.into(),
        })
    }

    /// Validate an untrusted JSON body.
    ///
    /// Missing or falsy `preferences` (`null`, `false`, `0`) becomes the empty
    /// string; any other non-string is rejected.
    pub fn from_value(body: &Value) -> Result<Self> {
        let notes = match body.get("notes") {
            Some(Value::Array(items)) if !items.is_empty() => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| ResearchError::Validation(NOTES_NOT_STRINGS.to_string()))
                })
                .collect::<Result<Vec<_>>>()?,
            _ => return Err(ResearchError::Validation(NOTES_REQUIRED.to_string())),
        };

        let preferences = match body.get("preferences") {
            None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
            Some(Value::Number(number)) if number.as_f64() == Some(0.0) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(_) => {
                return Err(ResearchError::Validation(
                    PREFERENCES_NOT_STRING.to_string(),
                ));
            }
        };

        Self::new(notes, preferences)
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn preferences(&self) -> &str {
        &self.preferences
    }
}
