//! Output rendering for the chat REPL.
//!
//! This module provides a renderer trait and a plain-text implementation that
//! shows the conversation log and the answer being revealed.

use std::io::{self, Stdout, Write};

use crate::types::{ChatMessage, Sender};

/// ANSI escape code for dim text (used for info lines).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for user messages).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (used for bot messages).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Prompt shown in front of bot output.
pub const BOT_PROMPT: &str = "Bot: ";

/// Prompt shown in front of user input.
pub const USER_PROMPT: &str = "You: ";

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - TUI rendering
pub trait Renderer: Send {
    /// Print a complete message from the log.
    fn print_message(&mut self, message: &ChatMessage);

    /// Called when a bot reply starts, before any of it is revealed.
    fn start_reply(&mut self);

    /// Print the next revealed chunk of the reply.
    fn print_reveal(&mut self, text: &str);

    /// Called once the reply is complete.
    fn finish_reply(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Called when the user interrupts a reply.
    fn print_interrupted(&mut self) {}
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    in_reply: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            in_reply: false,
        }
    }

    /// Flushes stdout to ensure immediate display of revealed content.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn sender_color(sender: Sender) -> &'static str {
        match sender {
            Sender::User => ANSI_CYAN,
            Sender::Bot => ANSI_GREEN,
        }
    }

    fn close_reply(&mut self) {
        if self.in_reply {
            if self.use_color {
                print!("{ANSI_RESET}");
            }
            println!();
            self.in_reply = false;
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_message(&mut self, message: &ChatMessage) {
        self.close_reply();
        let prompt = match message.sender() {
            Sender::User => USER_PROMPT,
            Sender::Bot => BOT_PROMPT,
        };
        if self.use_color {
            let color = Self::sender_color(message.sender());
            println!("{prompt}{color}{}{ANSI_RESET}", message.text());
        } else {
            println!("{prompt}{}", message.text());
        }
        self.flush();
    }

    fn start_reply(&mut self) {
        self.close_reply();
        if self.use_color {
            print!("{BOT_PROMPT}{ANSI_GREEN}");
        } else {
            print!("{BOT_PROMPT}");
        }
        self.in_reply = true;
        self.flush();
    }

    fn print_reveal(&mut self, text: &str) {
        print!("{text}");
        self.flush();
    }

    fn finish_reply(&mut self) {
        self.close_reply();
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.close_reply();
        if self.use_color {
            eprintln!("{ANSI_RED}Error: {error}{ANSI_RESET}");
        } else {
            eprintln!("Error: {error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        self.close_reply();
        if self.use_color {
            println!("{ANSI_DIM}{info}{ANSI_RESET}");
        } else {
            println!("{info}");
        }
        self.flush();
    }

    fn print_interrupted(&mut self) {
        self.close_reply();
        println!("[interrupted]");
        self.flush();
    }
}
