//! The typing reveal: an answer shown one character at a time.
//!
//! A [`Reveal`] pairs the answer being revealed with the timer that paces it.
//! The timer only posts ticks into the session's inbox; the session applies
//! them one at a time, so ticks never overlap.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::chat::session::SessionEvent;
use crate::chat::task::TaskGuard;

/// Interval between ticks of the reveal animation.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(25);

/// Shortest interval the timer will run at.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Recurring timer posting `SessionEvent::Tick` for one reveal generation.
#[derive(Debug)]
pub(crate) struct RevealTimer {
    _task: TaskGuard,
}

impl RevealTimer {
    /// Arms a timer whose first tick fires one `period` from now.
    pub(crate) fn start(
        period: Duration,
        generation: u64,
        inbox: UnboundedSender<SessionEvent>,
    ) -> Self {
        let period = period.max(MIN_TICK_INTERVAL);
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if inbox.send(SessionEvent::Tick { generation }).is_err() {
                    break;
                }
            }
        });
        Self {
            _task: TaskGuard::new(handle),
        }
    }
}

/// An answer part-way through being revealed.
#[derive(Debug)]
pub(crate) struct Reveal {
    generation: u64,
    answer: String,
    // Characters revealed so far, and the byte offset where they end.
    shown: usize,
    end: usize,
    total: usize,
    _timer: Option<RevealTimer>,
}

impl Reveal {
    pub(crate) fn new(generation: u64, answer: String, timer: Option<RevealTimer>) -> Self {
        let total = answer.chars().count();
        Self {
            generation,
            answer,
            shown: 0,
            end: 0,
            total,
            _timer: timer,
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// The revealed part of the answer.
    pub(crate) fn prefix(&self) -> &str {
        &self.answer[..self.end]
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.shown >= self.total
    }

    /// Reveals exactly one more character.  Returns true once the whole
    /// answer is visible.
    pub(crate) fn advance(&mut self) -> bool {
        if let Some(c) = self.answer[self.end..].chars().next() {
            self.end += c.len_utf8();
            self.shown += 1;
        }
        self.is_complete()
    }

    /// Stops the timer and hands back the full answer.
    pub(crate) fn into_answer(self) -> String {
        self.answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_counts_characters_not_bytes() {
        let mut reveal = Reveal::new(1, "Ок!".to_string(), None);
        assert_eq!(reveal.prefix(), "");
        assert!(!reveal.advance());
        assert_eq!(reveal.prefix(), "О");
        assert!(!reveal.advance());
        assert_eq!(reveal.prefix(), "Ок");
        assert!(reveal.advance());
        assert_eq!(reveal.prefix(), "Ок!");
        assert_eq!(reveal.into_answer(), "Ок!");
    }

    #[test]
    fn empty_answer_is_complete_immediately() {
        let reveal = Reveal::new(7, String::new(), None);
        assert!(reveal.is_complete());
        assert_eq!(reveal.generation(), 7);
    }

    #[test]
    fn advance_past_end_is_harmless() {
        let mut reveal = Reveal::new(1, "a".to_string(), None);
        assert!(reveal.advance());
        assert!(reveal.advance());
        assert_eq!(reveal.prefix(), "a");
    }

    #[tokio::test(start_paused = true)]
    async fn timer_posts_tagged_ticks() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let start = Instant::now();
        let timer = RevealTimer::start(Duration::from_millis(25), 3, tx);
        for _ in 0..3 {
            match rx.recv().await {
                Some(SessionEvent::Tick { generation }) => assert_eq!(generation, 3),
                other => panic!("unexpected event: {other:?}"),
            }
        }
        assert!(start.elapsed() >= Duration::from_millis(75));
        drop(timer);
        // The sender lives in the aborted task, so the channel closes.
        assert!(rx.recv().await.is_none());
    }
}
