//! Session state for a single widget instance.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::message::{Message, PendingId};

/// State owned by one widget for its whole lifetime.
///
/// The session is a plain value; the widget wraps it in a lock and only
/// touches it for short, synchronous sections.
#[derive(Debug)]
pub struct Session {
    /// Unique session identifier, used to correlate log events.
    id: String,
    /// Session creation time.
    created_at: DateTime<Utc>,
    /// Whether the chat window is open.
    is_open: bool,
    /// Requests issued but not yet settled.
    in_flight: usize,
    /// Counter for placeholder handles.
    next_pending: u64,
    /// Append-only conversation history.
    history: Vec<Message>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a closed session with an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            is_open: false,
            in_flight: 0,
            next_pending: 0,
            history: Vec::new(),
        }
    }

    /// Get the session ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the session creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the chat window is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Flip the open flag and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.is_open = !self.is_open;
        self.is_open
    }

    /// Close the window. Returns `true` if it was open.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.is_open, false)
    }

    /// Whether at least one request is awaiting a response.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.in_flight > 0
    }

    /// Number of requests awaiting a response.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Record a new in-flight request and hand out its placeholder handle.
    pub fn begin_request(&mut self) -> PendingId {
        self.in_flight += 1;
        self.next_pending += 1;
        PendingId(self.next_pending)
    }

    /// Record that a request settled.
    pub fn finish_request(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Append a message to the history.
    pub fn push(&mut self, message: Message) {
        self.history.push(message);
    }

    /// The conversation so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Message] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;

    #[test]
    fn test_session_lifecycle() {
        let mut session = Session::new();

        assert!(!session.is_open());
        assert!(!session.is_pending());
        assert!(session.history().is_empty());

        session.push(Message::bot("Hello"));
        session.push(Message::user("Hi there!"));

        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::Bot);
        assert_eq!(history[1].role, Role::User);
        assert_eq!(history[1].text, "Hi there!");
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut session = Session::new();

        assert!(session.toggle());
        assert!(!session.toggle());
        assert!(!session.is_open());
    }

    #[test]
    fn test_close_reports_previous_state() {
        let mut session = Session::new();

        assert!(!session.close());
        session.toggle();
        assert!(session.close());
        assert!(!session.is_open());
    }

    #[test]
    fn test_pending_bookkeeping() {
        let mut session = Session::new();

        let first = session.begin_request();
        let second = session.begin_request();
        assert_ne!(first, second);
        assert_eq!(session.in_flight(), 2);

        session.finish_request();
        assert!(session.is_pending());
        session.finish_request();
        assert!(!session.is_pending());

        // Extra settles never underflow.
        session.finish_request();
        assert_eq!(session.in_flight(), 0);
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        assert_ne!(Session::new().id(), Session::new().id());
    }
}
