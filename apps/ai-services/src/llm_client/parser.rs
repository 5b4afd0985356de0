//! Extracts the JSON object a model reply is expected to carry.
//!
//! Replies are often wrapped in prose or code fences. The slice runs from the
//! first `{` to the last `}`; nothing smarter is attempted, so a reply holding
//! two objects, or stray braces in surrounding prose, fails to parse.

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("model response did not contain a JSON object")]
    NoJsonObject { raw: String },

    #[error("model response JSON could not be decoded: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
        raw: String,
    },
}

impl ParseError {
    /// The untouched model text, kept for diagnostics.
    pub fn raw(&self) -> &str {
        match self {
            ParseError::NoJsonObject { raw } | ParseError::InvalidJson { raw, .. } => raw,
        }
    }
}

/// Returns the substring from the first `{` through the last `}`, if any.
pub fn json_slice(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Decodes the embedded JSON object into `T`.
pub fn extract_json<T: DeserializeOwned>(raw: &str) -> Result<T, ParseError> {
    let slice = json_slice(raw).ok_or_else(|| ParseError::NoJsonObject {
        raw: raw.to_string(),
    })?;
    serde_json::from_str(slice).map_err(|source| ParseError::InvalidJson {
        source,
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_prose_wrapped_object_is_extracted() {
        let value: Value = extract_json("Here is the result: {\"a\": 1} thanks").unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_fenced_object_is_extracted() {
        let raw = "```json\n{\"overall_score\": 72.5, \"breakdown\": {\"skills_match\": 80}}\n```";
        let value: Value = extract_json(raw).unwrap();
        assert_eq!(value["overall_score"], json!(72.5));
        assert_eq!(value["breakdown"]["skills_match"], json!(80));
    }

    #[test]
    fn test_no_brace_fails_and_keeps_raw_text() {
        let err = extract_json::<Value>("I am unable to score this resume.").unwrap_err();
        assert!(matches!(err, ParseError::NoJsonObject { .. }));
        assert_eq!(err.raw(), "I am unable to score this resume.");
    }

    #[test]
    fn test_closing_brace_before_opening_fails() {
        let err = extract_json::<Value>("} nothing here {").unwrap_err();
        assert!(matches!(err, ParseError::NoJsonObject { .. }));
    }

    #[test]
    fn test_malformed_json_between_braces_fails() {
        let err = extract_json::<Value>("result: {\"a\": 1, \"b\": } done").unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson { .. }));
        assert!(err.raw().starts_with("result:"));
    }

    #[test]
    fn test_two_objects_are_not_recovered() {
        // Known limitation of the first-`{` / last-`}` slice.
        let err = extract_json::<Value>("{\"a\": 1} and also {\"b\": 2}").unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson { .. }));
    }

    #[test]
    fn test_brace_inside_trailing_prose_breaks_slice() {
        // A `}` after the object widens the slice past valid JSON.
        let err = extract_json::<Value>("{\"a\": 1} (see note })").unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson { .. }));
    }

    #[test]
    fn test_nested_object_survives_slice() {
        let value: Value =
            extract_json("ok {\"red_flags\": {\"found\": false, \"issues\": []}} end").unwrap();
        assert_eq!(value["red_flags"]["found"], json!(false));
    }

    #[test]
    fn test_typed_decode_mismatch_is_invalid_json() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Scored {
            overall_score: f64,
        }
        let err = extract_json::<Scored>("{\"overall_score\": \"high\"}").unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson { .. }));
    }
}
