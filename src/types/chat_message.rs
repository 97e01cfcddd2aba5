use std::fmt;

use serde::{Deserialize, Serialize};

/// Who authored a message in the conversation log.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person typing into the chat.
    User,

    /// The question-answering backend, or the session speaking on its behalf.
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// One entry of the conversation log.
///
/// Messages are never edited once appended, so the fields are only exposed
/// through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    sender: Sender,
    text: String,
}

impl ChatMessage {
    /// Create a new `ChatMessage`.
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }

    /// Create a new user-authored `ChatMessage`.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// Create a new bot-authored `ChatMessage`.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }

    /// The author of the message.
    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// The message text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True if the user wrote this message.
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn chat_message_serialization() {
        assert_eq!(
            to_value(ChatMessage::user("hello")).unwrap(),
            json!({"sender": "user", "text": "hello"})
        );
        assert_eq!(
            to_value(ChatMessage::bot("")).unwrap(),
            json!({"sender": "bot", "text": ""})
        );
    }

    #[test]
    fn chat_message_accessors() {
        let message = ChatMessage::bot("hi");
        assert_eq!(message.sender(), Sender::Bot);
        assert_eq!(message.text(), "hi");
        assert!(!message.is_user());
        assert_eq!(Sender::User.to_string(), "user");
    }
}
