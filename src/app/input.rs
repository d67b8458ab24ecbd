//! Debounced search input.
//!
//! [`SearchInput`] is a pure state machine; it does not own a timer. Each text
//! change issues a fresh [`DebounceTicket`] and asks the runtime to report back
//! after the quiescence window. Only the most recent ticket produces a search,
//! so a burst of keystrokes yields a single query. Clearing the input bypasses
//! the window entirely.

use std::time::Duration;

/// Quiescence window used when none is configured.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebounceTicket(pub u64);

/// What the runtime should do after a text change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Report [`SearchInput::elapsed`] with `ticket` once `after` has passed.
    Schedule { ticket: DebounceTicket, after: Duration },
    /// Search for this text right away.
    Emit(String),
}

#[derive(Debug, Clone)]
pub struct SearchInput {
    text: String,
    window: Duration,
    issued: u64,
    pending: Option<DebounceTicket>,
}

impl Default for SearchInput {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SearchInput {
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            text: String::new(),
            window,
            issued: 0,
            pending: None,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Records the full current input text.
    pub fn changed(&mut self, text: &str) -> InputOutcome {
        self.text = text.to_string();
        self.issued += 1;

        if text.is_empty() {
            self.pending = None;
            return InputOutcome::Emit(String::new());
        }

        let ticket = DebounceTicket(self.issued);
        self.pending = Some(ticket);
        InputOutcome::Schedule {
            ticket,
            after: self.window,
        }
    }

    /// Empties the input; emits immediately.
    pub fn cleared(&mut self) -> InputOutcome {
        self.changed("")
    }

    /// Quiescence reached for `ticket`. Yields the text to search for, or `None`
    /// if a newer change (or a cancel) has superseded the ticket.
    pub fn elapsed(&mut self, ticket: DebounceTicket) -> Option<String> {
        if self.pending != Some(ticket) {
            return None;
        }
        self.pending = None;
        Some(self.text.clone())
    }

    /// Drops a pending search without touching the text.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!("pending search cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket_of(outcome: InputOutcome) -> DebounceTicket {
        match outcome {
            InputOutcome::Schedule { ticket, .. } => ticket,
            InputOutcome::Emit(text) => panic!("unexpected immediate emit of {text:?}"),
        }
    }

    #[test]
    fn test_burst_emits_once_with_latest_text() {
        let mut input = SearchInput::default();
        let t1 = ticket_of(input.changed("j"));
        let t2 = ticket_of(input.changed("ja"));
        let t3 = ticket_of(input.changed("jam"));

        assert_eq!(input.elapsed(t1), None);
        assert_eq!(input.elapsed(t2), None);
        assert_eq!(input.elapsed(t3), Some("jam".to_string()));
        assert_eq!(input.elapsed(t3), None, "a ticket fires at most once");
    }

    #[test]
    fn test_schedule_uses_configured_window() {
        let mut input = SearchInput::new(Duration::from_millis(300));
        match input.changed("kaos") {
            InputOutcome::Schedule { after, .. } => assert_eq!(after, Duration::from_millis(300)),
            InputOutcome::Emit(_) => panic!("expected a scheduled search"),
        }
    }

    #[test]
    fn test_clear_emits_immediately_and_cancels_pending() {
        let mut input = SearchInput::default();
        let pending = ticket_of(input.changed("jam"));

        assert_eq!(input.cleared(), InputOutcome::Emit(String::new()));
        assert!(!input.is_pending());
        assert_eq!(input.elapsed(pending), None);
        assert_eq!(input.text(), "");
    }

    #[test]
    fn test_cancel_keeps_text() {
        let mut input = SearchInput::default();
        let pending = ticket_of(input.changed("sepatu"));
        input.cancel();
        assert_eq!(input.elapsed(pending), None);
        assert_eq!(input.text(), "sepatu");
    }

    #[test]
    fn test_same_text_after_quiescence_emits_again() {
        let mut input = SearchInput::default();
        let first = ticket_of(input.changed("jam"));
        assert!(input.elapsed(first).is_some());
        let second = ticket_of(input.changed("jam"));
        assert_eq!(input.elapsed(second), Some("jam".to_string()));
    }
}
