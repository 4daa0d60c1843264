//! JSON records loading.
//!
//! Turns a JSON web-service response into an ordered sequence of records.
//! Field order follows the document (serde_json's `preserve_order` feature)
//! and nested values stay nested; flattening is the caller's business.

use serde_json::Value;

use crate::error::{Error, Result};

/// One record: an ordered mapping from field name to JSON value.
pub type JsonRecord = serde_json::Map<String, Value>;

/// Parse JSON text into records.
///
/// A top-level array of objects yields one record per element, in order. A
/// single top-level object yields one record. Anything else (scalars,
/// arrays with non-object elements, malformed JSON) is an [`Error::Parse`].
pub fn records(text: &str) -> Result<Vec<JsonRecord>> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| Error::Parse(format!("invalid JSON: {e}")))?;

    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(map),
                other => Err(Error::Parse(format!(
                    "JSON record {i} is not an object (found {})",
                    kind(&other)
                ))),
            })
            .collect(),
        Value::Object(map) => Ok(vec![map]),
        other => Err(Error::Parse(format!(
            "top-level JSON must be an object or an array of objects (found {})",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_of_objects() {
        let recs = records(r#"[{"a": 1, "b": "x"}, {"a": 2, "b": "y"}]"#).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[1]["b"], "y");
    }

    #[test]
    fn test_single_object_is_one_record() {
        let recs = records(r#"{"only": true}"#).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0]["only"], true);
    }

    #[test]
    fn test_field_order_preserved() {
        let recs = records(r#"[{"zulu": 1, "alpha": 2, "mike": 3}]"#).unwrap();
        let keys: Vec<_> = recs[0].keys().collect();
        assert_eq!(keys, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn test_nested_values_stay_nested() {
        let recs = records(r#"[{"name": "x", "tags": ["a", "b"], "geo": {"lat": 1.5}}]"#).unwrap();
        assert!(recs[0]["tags"].is_array());
        assert_eq!(recs[0]["geo"]["lat"], 1.5);
    }

    #[test]
    fn test_rejects_non_records() {
        assert!(matches!(records("42"), Err(Error::Parse(_))));
        assert!(matches!(records(r#""text""#), Err(Error::Parse(_))));
        assert!(matches!(records("[1, 2]"), Err(Error::Parse(_))));
        assert!(matches!(records("not json"), Err(Error::Parse(_))));
    }
}
