use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("supportchat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("supportchat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("supportchat.client.request_duration_seconds");

pub(crate) static SESSION_SUBMISSIONS: Counter = Counter::new("supportchat.session.submissions");
pub(crate) static SESSION_SUBMISSIONS_REJECTED: Counter =
    Counter::new("supportchat.session.submissions_rejected");
pub(crate) static SESSION_FAILURES: Counter = Counter::new("supportchat.session.failures");
pub(crate) static SESSION_STALE_EVENTS: Counter = Counter::new("supportchat.session.stale_events");

pub(crate) static REVEAL_STARTED: Counter = Counter::new("supportchat.reveal.started");
pub(crate) static REVEAL_COMPLETED: Counter = Counter::new("supportchat.reveal.completed");
pub(crate) static REVEAL_CANCELLED: Counter = Counter::new("supportchat.reveal.cancelled");
pub(crate) static REVEAL_TICKS: Counter = Counter::new("supportchat.reveal.ticks");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSION_SUBMISSIONS);
    collector.register_counter(&SESSION_SUBMISSIONS_REJECTED);
    collector.register_counter(&SESSION_FAILURES);
    collector.register_counter(&SESSION_STALE_EVENTS);

    collector.register_counter(&REVEAL_STARTED);
    collector.register_counter(&REVEAL_COMPLETED);
    collector.register_counter(&REVEAL_CANCELLED);
    collector.register_counter(&REVEAL_TICKS);
}
