use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Key under which unparsed LLM output (or an error message) is kept.
pub const RAW_KEY: &str = "_raw";

/// Best-effort parse of a generative-text reply.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmReply {
    Json(Map<String, Value>),
    Raw(String),
}

impl LlmReply {
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            LlmReply::Json(map) => map.get(key),
            LlmReply::Raw(_) => None,
        }
    }

    /// Numeric field, accepting JSON numbers and numeric strings.
    pub fn number(&self, key: &str) -> Option<f64> {
        let value = match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        value.is_finite().then_some(value)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, LlmReply::Raw(_))
    }
}

impl Serialize for LlmReply {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LlmReply::Json(map) => map.serialize(serializer),
            LlmReply::Raw(text) => {
                let mut out = serializer.serialize_map(Some(1))?;
                out.serialize_entry(RAW_KEY, text)?;
                out.end()
            }
        }
    }
}

/// Parse the span from the first `{` to the last `}` of `text` as a JSON
/// object. Falls back to [`LlmReply::Raw`] with the whole text when no span
/// exists, or with the span itself when it does not parse.
pub fn extract_json(text: &str) -> LlmReply {
    let span = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => return LlmReply::Raw(text.to_string()),
    };

    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => LlmReply::Json(map),
        Ok(_) => LlmReply::Raw(span.to_string()),
        Err(e) => {
            tracing::warn!("LLM JSON parsing error: {}", e);
            LlmReply::Raw(span.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_fenced_json() {
        let text = "Sure!\n```json\n{\"grammar_score\": 82, \"engagement_score\": \"75.5\"}\n```";
        let reply = extract_json(text);
        assert_eq!(reply.number("grammar_score"), Some(82.0));
        assert_eq!(reply.number("engagement_score"), Some(75.5));
    }

    #[test]
    fn test_no_braces_keeps_raw_text() {
        let reply = extract_json("I cannot grade this.");
        assert_eq!(reply, LlmReply::Raw("I cannot grade this.".to_string()));
    }

    #[test]
    fn test_bad_json_keeps_span() {
        let reply = extract_json("prefix {grammar_score: high} suffix");
        assert_eq!(reply, LlmReply::Raw("{grammar_score: high}".to_string()));
    }

    #[test]
    fn test_non_numeric_fields_ignored() {
        let reply = extract_json(
            r#"{"grammar_score": "excellent", "engagement_score": true, "x": null}"#,
        );
        assert!(!reply.is_raw());
        assert_eq!(reply.number("grammar_score"), None);
        assert_eq!(reply.number("engagement_score"), None);
        assert_eq!(reply.number("missing"), None);
    }

    #[test]
    fn test_nan_string_rejected() {
        let reply = extract_json(r#"{"grammar_score": "NaN"}"#);
        assert_eq!(reply.number("grammar_score"), None);
    }

    #[test]
    fn test_raw_serializes_under_sentinel_key() {
        let reply = LlmReply::Raw("timeout".to_string());
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json, serde_json::json!({ "_raw": "timeout" }));
    }

    #[test]
    fn test_feedback_text() {
        let reply = extract_json(r#"{"grammar_feedback": "Watch tenses."}"#);
        assert_eq!(reply.text("grammar_feedback"), Some("Watch tenses."));
    }
}
