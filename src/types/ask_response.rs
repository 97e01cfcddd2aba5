use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of a successful `POST /ask` response.
///
/// Every field is optional.  `null` is read as absent, and scalar values that
/// are not strings (numbers, booleans) are kept as their JSON text so they can
/// still be displayed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AskResponse {
    /// The answer text.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub answer: Option<String>,

    /// The category the question was classified into.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,

    /// The subcategory the question was classified into.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub subcategory: Option<String>,
}

impl AskResponse {
    /// Create a new `AskResponse` with only an answer.
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
            category: None,
            subcategory: None,
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the subcategory.
    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other @ (Value::Array(_) | Value::Object(_))) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_value, json};

    #[test]
    fn ask_response_complete() {
        let response: AskResponse = from_value(json!({
            "answer": "hi",
            "category": "greeting",
            "subcategory": "hello"
        }))
        .unwrap();
        assert_eq!(
            response,
            AskResponse::new("hi")
                .with_category("greeting")
                .with_subcategory("hello")
        );
    }

    #[test]
    fn ask_response_empty_object() {
        let response: AskResponse = from_value(json!({})).unwrap();
        assert_eq!(response, AskResponse::default());
    }

    #[test]
    fn ask_response_null_is_absent() {
        let response: AskResponse = from_value(json!({"answer": null, "category": "x"})).unwrap();
        assert!(response.answer.is_none());
        assert_eq!(response.category.as_deref(), Some("x"));
    }

    #[test]
    fn ask_response_scalars_become_text() {
        let response: AskResponse = from_value(json!({"answer": 0, "category": false})).unwrap();
        assert_eq!(response.answer.as_deref(), Some("0"));
        assert_eq!(response.category.as_deref(), Some("false"));
    }

    #[test]
    fn ask_response_ignores_unknown_fields() {
        let response: AskResponse =
            from_value(json!({"answer": "a", "score": 0.93, "sources": []})).unwrap();
        assert_eq!(response, AskResponse::new("a"));
    }

    #[test]
    fn ask_response_rejects_non_object() {
        assert!(from_value::<AskResponse>(json!("just text")).is_err());
    }
}
