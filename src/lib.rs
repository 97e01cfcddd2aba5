// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod format;
pub mod observability;
pub mod render;
pub mod types;

// Re-exports
pub use client::{AskBackend, AskClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use client_logger::{ClientLogger, JsonLinesLogger};
pub use error::{Error, Result};
pub use format::{Labels, Locale, LocaleParseError, format_answer, format_answer_default};
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer};
pub use types::*;
