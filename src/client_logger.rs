//! Logging trait for `/ask` client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! every request and its outcome as it passes through the [`AskClient`].
//! Error details never reach the conversation log, so this is where they go.
//!
//! [`AskClient`]: crate::AskClient

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use serde_json::json;

use crate::error::{Error, Result};
use crate::types::{AskRequest, AskResponse};

/// A trait for logging client operations.
///
/// # Example
///
/// ```rust
/// use supportchat::{AskRequest, AskResponse, ClientLogger, Error};
///
/// struct StderrLogger;
///
/// impl ClientLogger for StderrLogger {
///     fn log_request(&self, request: &AskRequest) {
///         eprintln!("-> {}", request.query);
///     }
///
///     fn log_response(&self, _request: &AskRequest, response: &AskResponse) {
///         eprintln!("<- {:?}", response.answer);
///     }
///
///     fn log_failure(&self, _request: &AskRequest, error: &Error) {
///         eprintln!("!! {error}");
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a request just before it is sent.
    fn log_request(&self, request: &AskRequest);

    /// Log a successfully decoded response.
    fn log_response(&self, request: &AskRequest, response: &AskResponse);

    /// Log a request that failed for any reason.
    fn log_failure(&self, request: &AskRequest, error: &Error);
}

/// A [`ClientLogger`] that appends one JSON object per line to a file.
pub struct JsonLinesLogger {
    file: Mutex<BufWriter<File>>,
}

impl JsonLinesLogger {
    /// Opens (creating if needed) `path` for appending.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .map_err(|err| Error::io("failed to open client log", err))?;
        Ok(Self {
            file: Mutex::new(BufWriter::new(file)),
        })
    }

    fn write_line(&self, value: serde_json::Value) {
        // Logging must never take the session down; poisoned or failing writes are dropped.
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{value}");
            let _ = file.flush();
        }
    }
}

impl ClientLogger for JsonLinesLogger {
    fn log_request(&self, request: &AskRequest) {
        self.write_line(json!({"event": "request", "query": request.query}));
    }

    fn log_response(&self, request: &AskRequest, response: &AskResponse) {
        self.write_line(json!({
            "event": "response",
            "query": request.query,
            "response": response,
        }));
    }

    fn log_failure(&self, request: &AskRequest, error: &Error) {
        self.write_line(json!({
            "event": "failure",
            "query": request.query,
            "status": error.status_code(),
            "error": error.to_string(),
        }));
    }
}
