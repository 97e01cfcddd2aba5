//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending a question
//! to the service.

use crate::format::Locale;

/// A parsed chat command.
///
/// These commands control the chat session and are never sent as queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Print the conversation so far.
    History,

    /// Set the reveal speed in milliseconds per character.
    Tick(u32),

    /// Switch the label language.
    Locale(Locale),

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Display session statistics.
    Stats,

    /// Show the current configuration.
    ShowConfig,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a valid command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use supportchat::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/tick 10").is_some());
/// assert!(parse_command("Как закрыть карту?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "history" | "log" => ChatCommand::History,
        "tick" => match argument {
            Some(arg) => match arg.parse::<u32>() {
                Ok(0) | Err(_) => {
                    ChatCommand::Invalid("/tick expects a positive integer".to_string())
                }
                Ok(value) => ChatCommand::Tick(value),
            },
            None => ChatCommand::Invalid("/tick requires a value".to_string()),
        },
        "locale" | "lang" => match argument {
            Some(arg) => match arg.parse::<Locale>() {
                Ok(locale) => ChatCommand::Locale(locale),
                Err(err) => ChatCommand::Invalid(err.to_string()),
            },
            None => ChatCommand::Invalid("/locale requires 'ru' or 'en'".to_string()),
        },
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "stats" | "status" => ChatCommand::Stats,
        "config" => ChatCommand::ShowConfig,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /history               Print the conversation so far
  /tick <ms>             Set milliseconds per revealed character
  /locale ru|en          Switch the label language
  /stats                 Show session statistics
  /config                Show current configuration
  /help                  Show this help message
  /quit                  Exit the chat

Press Enter to send a question."#
}
