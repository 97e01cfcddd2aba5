// Public modules
pub mod ask_request;
pub mod ask_response;
pub mod chat_message;

// Re-exports
pub use ask_request::AskRequest;
pub use ask_response::AskResponse;
pub use chat_message::{ChatMessage, Sender};
