//! Persisted `{ "events": [...] }` document.
//!
//! Remote stores and the local cache exchange the full assignment list in
//! this one shape. A document is only accepted when `events` is an array of
//! well-formed records; anything else is reported as malformed so loaders
//! can fall back to cached state.

use crate::model::assignment::Assignment;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Full snapshot of one user's assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDocument {
    pub events: Vec<Assignment>,
}

/// Document decode failures.
#[derive(Debug)]
pub enum DocumentError {
    Json(serde_json::Error),
    Malformed(String),
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "{err}"),
            Self::Malformed(message) => write!(f, "malformed assignment document: {message}"),
        }
    }
}

impl Error for DocumentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Malformed(_) => None,
        }
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl AssignmentDocument {
    pub fn from_assignments(assignments: &[Assignment]) -> Self {
        Self {
            events: assignments.to_vec(),
        }
    }

    pub fn into_assignments(self) -> Vec<Assignment> {
        self.events
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a document, requiring `events` to be an array.
    ///
    /// # Errors
    /// - `Json` when the text is not JSON at all.
    /// - `Malformed` when `events` is missing, not an array, or holds a
    ///   record that does not decode.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let events = match value {
            Value::Object(mut object) => object.remove("events"),
            _ => None,
        };

        let items = match events {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(DocumentError::Malformed(
                    "`events` must be an array".to_string(),
                ))
            }
            None => {
                return Err(DocumentError::Malformed(
                    "missing `events` array".to_string(),
                ))
            }
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let record = serde_json::from_value::<Assignment>(item).map_err(|err| {
                DocumentError::Malformed(format!("events[{index}] is invalid: {err}"))
            })?;
            records.push(record);
        }

        Ok(Self { events: records })
    }
}

#[cfg(test)]
mod tests {
    use super::{AssignmentDocument, DocumentError};

    #[test]
    fn rejects_non_array_events() {
        let err = AssignmentDocument::from_json(r#"{"events": {"id": "1"}}"#).unwrap_err();
        assert!(matches!(err, DocumentError::Malformed(_)));

        let err = AssignmentDocument::from_json(r#"{"error": "No data found"}"#).unwrap_err();
        assert!(matches!(err, DocumentError::Malformed(_)));
    }

    #[test]
    fn rejects_invalid_json_text() {
        let err = AssignmentDocument::from_json("not json").unwrap_err();
        assert!(matches!(err, DocumentError::Json(_)));
    }

    #[test]
    fn accepts_empty_events_array() {
        let doc = AssignmentDocument::from_json(r#"{"events": []}"#).unwrap();
        assert!(doc.events.is_empty());
    }

    #[test]
    fn reports_index_of_bad_record() {
        let text = r#"{"events": [{"id": "1", "title": "x"}]}"#;
        let err = AssignmentDocument::from_json(text).unwrap_err();
        assert!(err.to_string().contains("events[0]"), "unexpected: {err}");
    }
}
