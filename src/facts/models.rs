//! Data models for facts

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A persisted fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// Store-assigned id, coerced to a string
    pub id: String,
    pub text: String,
}

/// Fact insert request
///
/// `text` is kept as raw JSON so that any falsy value (absent, `null`,
/// `false`, `0`, `""`) is reported as missing rather than as a body error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactInsertRequest {
    #[serde(default)]
    pub text: Option<Value>,
}

impl FactInsertRequest {
    /// The text to ingest, or `None` when the caller supplied none
    ///
    /// Non-empty strings are used as-is. `true` and non-zero numbers are
    /// stringified. Arrays and objects are not text and count as missing.
    pub fn text(&self) -> Option<String> {
        match self.text.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Bool(true) => Some("true".to_string()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Fact insert response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactInsertResponse {
    pub id: String,
    pub text: String,
    /// Confirmation returned by the vector index, passed through as-is
    pub inserted: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_text_presence() {
        let missing: FactInsertRequest = serde_json::from_str("{}").unwrap();
        assert!(missing.text().is_none());

        let null: FactInsertRequest = serde_json::from_str(r#"{"text":null}"#).unwrap();
        assert!(null.text().is_none());

        let empty: FactInsertRequest = serde_json::from_str(r#"{"text":""}"#).unwrap();
        assert!(empty.text().is_none());

        let present: FactInsertRequest =
            serde_json::from_str(r#"{"text":"water is wet"}"#).unwrap();
        assert_eq!(present.text().as_deref(), Some("water is wet"));
    }

    #[test]
    fn test_request_falsy_values_are_missing() {
        for body in [
            r#"{"text":false}"#,
            r#"{"text":0}"#,
            r#"{"text":0.0}"#,
            r#"{"text":-0}"#,
            r#"{"text":[]}"#,
            r#"{"text":{}}"#,
        ] {
            let request: FactInsertRequest = serde_json::from_str(body).unwrap();
            assert!(request.text().is_none(), "body: {}", body);
        }
    }

    #[test]
    fn test_request_truthy_scalars_are_stringified() {
        let number: FactInsertRequest = serde_json::from_str(r#"{"text":42}"#).unwrap();
        assert_eq!(number.text().as_deref(), Some("42"));

        let boolean: FactInsertRequest = serde_json::from_str(r#"{"text":true}"#).unwrap();
        assert_eq!(boolean.text().as_deref(), Some("true"));
    }

    #[test]
    fn test_response_serialization() {
        let response = FactInsertResponse {
            id: "7".to_string(),
            text: "water is wet".to_string(),
            inserted: serde_json::json!({ "count": 1, "ids": ["7"] }),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["id"], "7");
        assert_eq!(value["inserted"]["ids"][0], "7");
    }
}
