//! Interactive chat with the question-answering support service.
//!
//! Each line you type is sent to `POST /ask`; the answer is revealed one
//! character at a time, the way the web widget shows it.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a service on the default http://127.0.0.1:8000/
//! supportchat
//!
//! # Point at another host, reveal faster, English labels
//! supportchat --base-url http://support.internal:9000/ --tick-ms 5 --locale en
//!
//! # Keep a JSON-lines record of every request and response
//! supportchat --log-file requests.jsonl
//! ```
//!
//! # Commands
//!
//! - `/help` - Show available commands
//! - `/history` - Print the conversation
//! - `/tick <ms>` - Change the reveal speed
//! - `/locale ru|en` - Switch the label language
//! - `/stats` - Show session statistics
//! - `/config` - Show the current configuration
//! - `/quit` - Exit the application

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use supportchat::chat::{
    Change, ChatArgs, ChatCommand, ChatConfig, ChatSession, Key, KeyOutcome, PlainTextRenderer,
    Renderer, SubmitOutcome, help_text, parse_command,
};
use supportchat::{AskClient, JsonLinesLogger};

/// How often a pending reply checks for Ctrl+C.
const INTERRUPT_POLL: Duration = Duration::from_millis(50);

/// How a reply ended.
enum ReplyEnd {
    Idle,
    Interrupted,
}

/// Main entry point for the supportchat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("supportchat [OPTIONS]");
    let config = ChatConfig::try_from(args)?;
    let use_color = config.use_color;

    let mut client = AskClient::with_options(Some(&config.base_url), Some(config.request_timeout))?;
    if let Some(path) = &config.log_file {
        client = client.with_logger(Arc::new(JsonLinesLogger::open(path)?));
    }
    let endpoint = client.endpoint()?;
    let mut session = ChatSession::new(client, config.clone());
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    // Flag for interrupt handling while a reply is pending
    let interrupted = Arc::new(AtomicBool::new(false));

    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!("Support Chat ({endpoint})");
    println!("Type /help for commands, /quit to exit\n");

    loop {
        interrupted.store(false, Ordering::Relaxed);

        match rl.readline("You: ") {
            Ok(line) => {
                if let Some(cmd) = parse_command(&line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::History => {
                            for message in session.messages() {
                                renderer.print_message(message);
                            }
                        }
                        ChatCommand::Tick(ms) => {
                            match session.set_tick_interval(Duration::from_millis(u64::from(ms))) {
                                Ok(()) => renderer.print_info(&format!("Reveal speed set to {ms} ms")),
                                Err(err) => renderer.print_error(&err.to_string()),
                            }
                        }
                        ChatCommand::Locale(locale) => {
                            session.set_locale(locale);
                            renderer.print_info(&format!("Locale set to {locale}"));
                        }
                        ChatCommand::Stats => print_stats(&session),
                        ChatCommand::ShowConfig => print_config(&session, &config),
                        ChatCommand::Invalid(message) => renderer.print_error(&message),
                    }
                    continue;
                }

                let _ = rl.add_history_entry(line.as_str());
                session.set_input(line);
                match session.handle_key(Key::Enter { shift: false }) {
                    KeyOutcome::Submitted(SubmitOutcome::Sent) => {
                        if let ReplyEnd::Interrupted =
                            drive_reply(&mut session, &mut renderer, &interrupted).await
                        {
                            break;
                        }
                    }
                    KeyOutcome::Submitted(SubmitOutcome::Busy) => {
                        renderer.print_info("Still waiting for the previous answer.");
                    }
                    KeyOutcome::Submitted(SubmitOutcome::Disposed) => break,
                    _ => {}
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    session.dispose();
    Ok(())
}

/// Pumps the session until the reply is in the log, echoing the reveal.
async fn drive_reply(
    session: &mut ChatSession,
    renderer: &mut PlainTextRenderer,
    interrupted: &AtomicBool,
) -> ReplyEnd {
    renderer.start_reply();
    let mut printed = 0;
    loop {
        let step = tokio::select! {
            change = session.next_change() => Some(change),
            _ = wait_for_interrupt(interrupted) => None,
        };
        match step {
            None => {
                session.dispose();
                renderer.print_interrupted();
                return ReplyEnd::Interrupted;
            }
            Some(None) => {
                renderer.finish_reply();
                return ReplyEnd::Idle;
            }
            Some(Some(Change::RevealStarted)) => {}
            Some(Some(Change::Revealed)) => {
                let prefix = session.revealed_prefix();
                renderer.print_reveal(&prefix[printed..]);
                printed = prefix.len();
            }
            Some(Some(Change::Appended)) => {
                if let Some(message) = session.messages().last() {
                    let text = message.text();
                    renderer.print_reveal(text.get(printed..).unwrap_or(text));
                }
                renderer.finish_reply();
                return ReplyEnd::Idle;
            }
        }
    }
}

async fn wait_for_interrupt(interrupted: &AtomicBool) {
    while !interrupted.load(Ordering::Relaxed) {
        tokio::time::sleep(INTERRUPT_POLL).await;
    }
}

fn print_stats(session: &ChatSession) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!(
        "      Messages: {} ({} yours, {} replies)",
        stats.message_count, stats.user_messages, stats.bot_messages
    );
    println!(
        "      Requests: {} ({} failed)",
        stats.total_requests, stats.failed_requests
    );
    println!("      Reveal ticks: {}", stats.reveal_ticks);
}

fn print_config(session: &ChatSession, config: &ChatConfig) {
    let stats = session.stats();
    println!("    Current Configuration:");
    println!("      Base URL: {}", config.base_url);
    println!("      Timeout: {}s", config.request_timeout.as_secs());
    println!("      Reveal speed: {} ms", stats.tick_interval.as_millis());
    println!("      Locale: {}", stats.locale);
    match &config.log_file {
        Some(path) => println!("      Request log: {}", path.display()),
        None => println!("      Request log: (disabled)"),
    }
}
