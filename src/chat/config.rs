//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::chat::reveal::DEFAULT_TICK_INTERVAL;
use crate::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::error::{Error, Result};
use crate::format::Locale;

/// Command-line arguments for the supportchat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the question-answering service.
    #[arrrg(optional, "Service base URL (default: http://127.0.0.1:8000/)", "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECS")]
    pub timeout_secs: Option<u32>,

    /// Milliseconds between revealed characters.
    #[arrrg(optional, "Milliseconds per revealed character (default: 25)", "MS")]
    pub tick_ms: Option<u32>,

    /// Label language.
    #[arrrg(optional, "Label language: ru or en (default: ru)", "LOCALE")]
    pub locale: Option<String>,

    /// Append every request and response to this file as JSON lines.
    #[arrrg(optional, "Log requests and responses to FILE", "FILE")]
    pub log_file: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Base URL of the question-answering service.
    pub base_url: String,

    /// Timeout applied to each request.
    pub request_timeout: Duration,

    /// Time between two revealed characters.
    pub tick_interval: Duration,

    /// Which label preset answers and errors are rendered with.
    pub locale: Locale,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Where to write the request log, if anywhere.
    pub log_file: Option<PathBuf>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: http://127.0.0.1:8000/
    /// - Timeout: 60 seconds
    /// - Tick interval: 25 ms
    /// - Locale: ru
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            tick_interval: DEFAULT_TICK_INTERVAL,
            locale: Locale::default(),
            use_color: true,
            log_file: None,
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the reveal tick interval.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Sets the locale.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the request log path.
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<ChatArgs> for ChatConfig {
    type Error = Error;

    fn try_from(args: ChatArgs) -> Result<Self> {
        let locale = match args.locale {
            Some(locale) => locale
                .parse::<Locale>()
                .map_err(|err| Error::validation(err.to_string(), Some("locale".to_string())))?,
            None => Locale::default(),
        };
        let tick_interval = match args.tick_ms {
            Some(0) => {
                return Err(Error::validation(
                    "tick interval must be at least 1 ms",
                    Some("tick-ms".to_string()),
                ));
            }
            Some(ms) => Duration::from_millis(u64::from(ms)),
            None => DEFAULT_TICK_INTERVAL,
        };
        let request_timeout = match args.timeout_secs {
            Some(0) => {
                return Err(Error::validation(
                    "timeout must be at least 1 second",
                    Some("timeout-secs".to_string()),
                ));
            }
            Some(secs) => Duration::from_secs(u64::from(secs)),
            None => DEFAULT_TIMEOUT,
        };

        Ok(ChatConfig {
            base_url: args
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout,
            tick_interval,
            locale,
            use_color: !args.no_color,
            log_file: args.log_file.map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.base_url, "http://127.0.0.1:8000/");
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.tick_interval, Duration::from_millis(25));
        assert_eq!(config.locale, Locale::Russian);
        assert!(config.use_color);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn default_timeout_matches_client() {
        let config = ChatConfig::new();
        let client = crate::client::AskClient::new(&config.base_url).unwrap();
        assert_eq!(config.request_timeout, client.timeout());
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::try_from(ChatArgs::default()).unwrap();
        assert_eq!(config, ChatConfig::new());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            base_url: Some("http://support.internal:9000/".to_string()),
            timeout_secs: Some(5),
            tick_ms: Some(10),
            locale: Some("en".to_string()),
            log_file: Some("requests.jsonl".to_string()),
            no_color: true,
        };
        let config = ChatConfig::try_from(args).unwrap();
        assert_eq!(config.base_url, "http://support.internal:9000/");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.tick_interval, Duration::from_millis(10));
        assert_eq!(config.locale, Locale::English);
        assert_eq!(config.log_file, Some(PathBuf::from("requests.jsonl")));
        assert!(!config.use_color);
    }

    #[test]
    fn config_from_args_rejects_bad_values() {
        let args = ChatArgs {
            locale: Some("fr".to_string()),
            ..ChatArgs::default()
        };
        assert!(ChatConfig::try_from(args).unwrap_err().is_validation());

        let args = ChatArgs {
            tick_ms: Some(0),
            ..ChatArgs::default()
        };
        assert!(ChatConfig::try_from(args).unwrap_err().is_validation());

        let args = ChatArgs {
            timeout_secs: Some(0),
            ..ChatArgs::default()
        };
        assert!(ChatConfig::try_from(args).unwrap_err().is_validation());
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_base_url("http://localhost:1234")
            .with_request_timeout(Duration::from_secs(3))
            .with_tick_interval(Duration::from_millis(5))
            .with_locale(Locale::English)
            .without_color()
            .with_log_file(Some(PathBuf::from("log.jsonl")));

        assert_eq!(config.base_url, "http://localhost:1234");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.tick_interval, Duration::from_millis(5));
        assert_eq!(config.locale, Locale::English);
        assert!(!config.use_color);
        assert_eq!(config.log_file, Some(PathBuf::from("log.jsonl")));
    }
}
