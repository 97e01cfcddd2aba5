use serde::{Deserialize, Serialize};

/// Body of a `POST /ask` request.
///
/// Each request is self-contained: the endpoint gets no conversation history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AskRequest {
    /// The user's question, exactly as typed.
    pub query: String,
}

impl AskRequest {
    /// Create a new `AskRequest` for the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

impl From<&str> for AskRequest {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}
