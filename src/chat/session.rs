//! Core chat session management.
//!
//! [`ChatSession`] owns the conversation log, the input buffer and the
//! awaiting/reveal state.  It starts at most one request and at most one
//! reveal timer at a time; both run as Tokio tasks that only post events into
//! the session's inbox.  Nothing changes until the owner pumps the inbox with
//! [`ChatSession::next_change`], so every mutation happens on the owner's side
//! through `&mut self`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::chat::config::ChatConfig;
use crate::chat::input::{Key, KeyAction, apply_key};
use crate::chat::reveal::{MIN_TICK_INTERVAL, Reveal, RevealTimer};
use crate::chat::task::TaskGuard;
use crate::client::{AskBackend, AskClient};
use crate::error::{Error, Result};
use crate::format::{Labels, Locale, format_answer};
use crate::observability::{
    REVEAL_CANCELLED, REVEAL_COMPLETED, REVEAL_STARTED, REVEAL_TICKS, SESSION_FAILURES,
    SESSION_STALE_EVENTS, SESSION_SUBMISSIONS, SESSION_SUBMISSIONS_REJECTED,
};
use crate::types::{AskRequest, AskResponse, ChatMessage, Sender};

/// Events posted into the session's inbox by its background tasks.
#[derive(Debug)]
pub(crate) enum SessionEvent {
    /// The request stamped `generation` resolved.
    Response {
        generation: u64,
        result: Result<AskResponse>,
    },
    /// The reveal timer stamped `generation` fired.
    Tick { generation: u64 },
}

/// What [`ChatSession::submit`] did with its input.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A user message was appended and the request issued.
    Sent,
    /// The text was empty or whitespace; nothing changed.
    Empty,
    /// A response is still awaited; nothing changed.
    Busy,
    /// The session has been disposed; nothing changed.
    Disposed,
}

/// What [`ChatSession::handle_key`] did with a key press.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The input buffer changed.
    Edited,
    /// Enter submitted the buffer.
    Submitted(SubmitOutcome),
    /// Nothing changed.
    Ignored,
}

/// A state change applied by [`ChatSession::next_change`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Change {
    /// A response arrived and its reveal has been armed; the prefix is empty.
    RevealStarted,
    /// One more character of the answer is visible.
    Revealed,
    /// A bot message was appended and the session is idle again.
    Appended,
}

/// A snapshot of session counters.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    /// The number of messages in the conversation.
    pub message_count: usize,
    /// Messages written by the user.
    pub user_messages: usize,
    /// Messages written by the bot, errors included.
    pub bot_messages: usize,
    /// Requests issued.
    pub total_requests: u64,
    /// Requests that ended in the connection-error message.
    pub failed_requests: u64,
    /// Reveal ticks applied.
    pub reveal_ticks: u64,
    /// Current reveal tick interval.
    pub tick_interval: Duration,
    /// Current label language.
    pub locale: Locale,
}

struct InFlight {
    generation: u64,
    _task: TaskGuard,
}

/// A chat session that owns conversation state and drives the reveal.
///
/// The session must be used from within a Tokio runtime; submitting and
/// starting a reveal spawn tasks.  Dropping the session aborts both.
pub struct ChatSession<B: AskBackend + 'static = AskClient> {
    backend: Arc<B>,
    labels: Labels,
    locale: Locale,
    tick_interval: Duration,
    messages: Vec<ChatMessage>,
    input: String,
    awaiting: bool,
    reveal: Option<Reveal>,
    in_flight: Option<InFlight>,
    generation: u64,
    inbox_tx: UnboundedSender<SessionEvent>,
    inbox_rx: UnboundedReceiver<SessionEvent>,
    disposed: bool,
    total_requests: u64,
    failed_requests: u64,
    reveal_ticks: u64,
}

impl ChatSession<AskClient> {
    /// Creates a new chat session talking to `client`.
    pub fn new(client: AskClient, config: ChatConfig) -> Self {
        Self::with_backend(client, config)
    }
}

impl<B: AskBackend + 'static> ChatSession<B> {
    /// Creates a new chat session with a custom backend.
    pub fn with_backend(backend: B, config: ChatConfig) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            backend: Arc::new(backend),
            labels: Labels::from(config.locale),
            locale: config.locale,
            tick_interval: config.tick_interval.max(MIN_TICK_INTERVAL),
            messages: Vec::new(),
            input: String::new(),
            awaiting: false,
            reveal: None,
            in_flight: None,
            generation: 0,
            inbox_tx,
            inbox_rx,
            disposed: false,
            total_requests: 0,
            failed_requests: 0,
            reveal_ticks: 0,
        }
    }

    /// The conversation log, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The current input buffer.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// True from submission until the answer is fully revealed or an error
    /// message has been appended.
    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting
    }

    /// The part of the incoming answer revealed so far; empty when no reveal
    /// is running.
    pub fn revealed_prefix(&self) -> &str {
        self.reveal.as_ref().map(Reveal::prefix).unwrap_or("")
    }

    /// True once [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Replaces the input buffer, as on an input-change event.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Applies a key press to the input buffer.
    ///
    /// Plain Enter submits the buffer without adding a newline.
    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        match apply_key(&mut self.input, key) {
            KeyAction::Edited => KeyOutcome::Edited,
            KeyAction::Ignored => KeyOutcome::Ignored,
            KeyAction::Submit => {
                let text = self.input.clone();
                KeyOutcome::Submitted(self.submit(&text))
            }
        }
    }

    /// Submits `text` as the user's next question.
    ///
    /// Whitespace-only text is ignored, as is any submission while a response
    /// is still awaited.  Otherwise the exact text is appended as a user
    /// message, the input buffer is cleared, and the request is issued in the
    /// background.
    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        if self.disposed {
            return SubmitOutcome::Disposed;
        }
        if text.trim().is_empty() {
            return SubmitOutcome::Empty;
        }
        if self.awaiting {
            SESSION_SUBMISSIONS_REJECTED.click();
            return SubmitOutcome::Busy;
        }
        SESSION_SUBMISSIONS.click();

        self.messages.push(ChatMessage::user(text));
        self.input.clear();
        self.awaiting = true;
        self.cancel_reveal();

        let generation = self.next_generation();
        let backend = Arc::clone(&self.backend);
        let inbox = self.inbox_tx.clone();
        let request = AskRequest::new(text);
        let handle = tokio::spawn(async move {
            // The backend runs in its own task so a panic there still
            // resolves the request.
            let mut ask = TaskGuard::new(tokio::spawn(async move { backend.ask(request).await }));
            let result = match ask.join().await {
                Ok(result) => result,
                Err(err) => Err(Error::http_client(
                    format!("Request task failed: {err}"),
                    Some(Box::new(err)),
                )),
            };
            let _ = inbox.send(SessionEvent::Response { generation, result });
        });
        self.in_flight = Some(InFlight {
            generation,
            _task: TaskGuard::new(handle),
        });
        self.total_requests += 1;
        SubmitOutcome::Sent
    }

    /// Handles a successful payload: formats it and starts revealing it.
    ///
    /// Any reveal already running is cancelled first.  An empty answer is
    /// appended at once without arming the timer.
    pub fn on_request_success(&mut self, payload: &AskResponse) {
        if self.disposed {
            return;
        }
        self.in_flight = None;
        let answer = format_answer(payload, &self.labels);
        self.start_reveal(answer);
    }

    /// Handles a failed request: appends the fixed connection-error message
    /// and ends the awaiting state.  The error itself is not shown.
    pub fn on_request_failure(&mut self, _error: &Error) {
        if self.disposed {
            return;
        }
        SESSION_FAILURES.click();
        self.in_flight = None;
        self.cancel_reveal();
        self.failed_requests += 1;
        self.messages
            .push(ChatMessage::bot(self.labels.connection_error.clone()));
        self.awaiting = false;
    }

    /// Stops the reveal and aborts the request.  Idempotent.
    ///
    /// After disposal nothing mutates the log, including events that were
    /// already queued.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.cancel_reveal();
        self.in_flight = None;
        self.awaiting = false;
    }

    /// Waits for the next request completion or reveal tick and applies it.
    ///
    /// Returns `None` straight away when the session is idle or disposed.
    /// Stale events from cancelled timers or superseded requests are dropped
    /// without being reported.  Cancel safe: dropping the future before it
    /// completes loses no event.
    pub async fn next_change(&mut self) -> Option<Change> {
        loop {
            if self.disposed || !self.awaiting {
                return None;
            }
            let event = self.inbox_rx.recv().await?;
            if let Some(change) = self.apply(event) {
                return Some(change);
            }
        }
    }

    /// Pumps events until the session is idle or disposed.
    pub async fn settle(&mut self) {
        while self.next_change().await.is_some() {}
    }

    /// Changes the reveal speed for reveals started from now on.
    pub fn set_tick_interval(&mut self, interval: Duration) -> Result<()> {
        if interval < MIN_TICK_INTERVAL {
            return Err(Error::validation(
                "tick interval must be at least 1 ms",
                Some("tick_interval".to_string()),
            ));
        }
        self.tick_interval = interval;
        Ok(())
    }

    /// The current reveal tick interval.
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Switches the label language for messages produced from now on.
    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
        self.labels = Labels::from(locale);
    }

    /// The current label language.
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        let user_messages = self.messages.iter().filter(|m| m.is_user()).count();
        SessionStats {
            message_count: self.messages.len(),
            user_messages,
            bot_messages: self.messages.len() - user_messages,
            total_requests: self.total_requests,
            failed_requests: self.failed_requests,
            reveal_ticks: self.reveal_ticks,
            tick_interval: self.tick_interval,
            locale: self.locale,
        }
    }

    fn apply(&mut self, event: SessionEvent) -> Option<Change> {
        match event {
            SessionEvent::Response { generation, result } => {
                if self.in_flight.as_ref().map(|f| f.generation) != Some(generation) {
                    SESSION_STALE_EVENTS.click();
                    return None;
                }
                match result {
                    Ok(payload) => {
                        self.on_request_success(&payload);
                        if self.reveal.is_some() {
                            Some(Change::RevealStarted)
                        } else {
                            Some(Change::Appended)
                        }
                    }
                    Err(err) => {
                        self.on_request_failure(&err);
                        Some(Change::Appended)
                    }
                }
            }
            SessionEvent::Tick { generation } => {
                if self.reveal.as_ref().map(Reveal::generation) != Some(generation) {
                    SESSION_STALE_EVENTS.click();
                    return None;
                }
                self.tick()
            }
        }
    }

    fn start_reveal(&mut self, answer: String) {
        self.cancel_reveal();
        self.awaiting = true;
        REVEAL_STARTED.click();
        if answer.is_empty() {
            self.finish_reveal(Reveal::new(0, answer, None));
            return;
        }
        let generation = self.next_generation();
        let timer = RevealTimer::start(self.tick_interval, generation, self.inbox_tx.clone());
        self.reveal = Some(Reveal::new(generation, answer, Some(timer)));
    }

    fn tick(&mut self) -> Option<Change> {
        let reveal = self.reveal.as_mut()?;
        REVEAL_TICKS.click();
        self.reveal_ticks += 1;
        if !reveal.advance() {
            return Some(Change::Revealed);
        }
        let reveal = self.reveal.take()?;
        self.finish_reveal(reveal);
        Some(Change::Appended)
    }

    fn finish_reveal(&mut self, reveal: Reveal) {
        REVEAL_COMPLETED.click();
        self.messages
            .push(ChatMessage::new(Sender::Bot, reveal.into_answer()));
        self.awaiting = false;
    }

    fn cancel_reveal(&mut self) {
        if self.reveal.take().is_some() {
            REVEAL_CANCELLED.click();
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}
