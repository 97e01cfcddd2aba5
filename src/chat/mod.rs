//! Interactive chat against the question-answering service.
//!
//! This module provides the session controller and the pieces around it:
//!
//! - Submitting questions and tracking the awaiting state
//! - Revealing answers one character at a time
//! - Key handling for the input buffer
//! - Slash commands for the REPL
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: the session controller and its event pump
//! - [`reveal`]: the reveal state and its timer
//! - [`input`]: key handling
//! - [`commands`]: slash command parsing

mod commands;
mod config;
mod input;
mod reveal;
mod session;
mod task;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use input::Key;
pub use reveal::{DEFAULT_TICK_INTERVAL, MIN_TICK_INTERVAL};
pub use session::{Change, ChatSession, KeyOutcome, SessionStats, SubmitOutcome};
