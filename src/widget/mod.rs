//! The chat widget.
//!
//! [`ChatWidget`] mediates between a person and a remote chatbot through a
//! small set of injected UI surfaces ([`Affordances`]) and a
//! [`ChatTransport`]. It owns the [`Session`] and drives the
//! send/receive cycle.
//!
//! # Example
//!
//! ```rust,ignore
//! let widget = ChatWidget::initialize(affordances, transport, &credentials, WidgetSettings::default());
//!
//! widget.toggle_visibility();
//! let outcome = widget.submit("hello").await;
//! ```

pub mod affordance;

pub use affordance::{Affordances, ChatWindow, Control, TextInput};

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::session::{Message, PendingId, Session};
use crate::transport::{
    ChatReply, ChatRequest, ChatTransport, CredentialProvider, SecurityToken, TransportError,
};
use affordance::Bound;

/// Greeting shown when the widget starts.
pub const DEFAULT_GREETING: &str = "Hello! I'm your assistant. How can I help you today?";

/// Placeholder text while a reply is pending.
pub const DEFAULT_PLACEHOLDER: &str = "Typing...";

/// Text shown when a request fails.
pub const DEFAULT_FALLBACK: &str = "Sorry, something went wrong. Please try again.";

/// Default bound on a single round-trip.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// What to do with a submission while another one is still in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Drop the new submission and keep the send control disabled until the
    /// pending one settles.
    #[default]
    Reject,
    /// Let requests run side by side, each with its own placeholder.
    Allow,
}

/// Texts and limits used by the widget.
#[derive(Debug, Clone)]
pub struct WidgetSettings {
    pub greeting: String,
    pub placeholder: String,
    pub fallback: String,
    pub overlap: OverlapPolicy,
    pub request_timeout: Duration,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            fallback: DEFAULT_FALLBACK.to_string(),
            overlap: OverlapPolicy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Result of a [`ChatWidget::submit`] call.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The widget is missing a surface and does nothing.
    Inert,
    /// Empty or whitespace-only text; nothing happened.
    Ignored,
    /// Another request is in flight and the overlap policy is
    /// [`OverlapPolicy::Reject`]; nothing happened.
    Busy,
    /// The server replied; its text was appended as a bot message.
    Replied(ChatReply),
    /// The request failed; the fallback text was appended as a bot message.
    Failed(TransportError),
}

impl SubmitOutcome {
    /// Whether the submission produced a terminal bot message.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Replied(_) | Self::Failed(_))
    }
}

/// An embeddable chat widget.
///
/// Cloning is cheap and every clone drives the same session, so a clone can
/// be moved into a spawned task while the host keeps handling UI events.
///
/// A widget built without all of its surfaces is inert: every operation
/// returns immediately and nothing is rendered.
#[derive(Clone)]
pub struct ChatWidget {
    inner: Option<Arc<Inner>>,
}

struct Inner {
    surfaces: Bound,
    transport: Arc<dyn ChatTransport>,
    token: Option<SecurityToken>,
    settings: WidgetSettings,
    session: Mutex<Session>,
}

impl fmt::Debug for ChatWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            None => f.write_str("ChatWidget(inert)"),
            Some(inner) => f
                .debug_struct("ChatWidget")
                .field("session", &inner.session)
                .field("transport", &inner.transport)
                .field("settings", &inner.settings)
                .finish_non_exhaustive(),
        }
    }
}

enum Prepared {
    Done(SubmitOutcome),
    Sent { request: InFlight, text: String },
}

/// A request that has shown its placeholder and still owes the session a
/// terminal bot message.
///
/// Dropping it before it settles (the submit future was cancelled) settles
/// it with the fallback text.
struct InFlight {
    inner: Arc<Inner>,
    pending: PendingId,
    settled: bool,
}

impl InFlight {
    async fn complete(mut self, text: String) -> SubmitOutcome {
        let inner = Arc::clone(&self.inner);
        let session_id = inner.session().id().to_string();
        info!(
            name: "chat.submit.sent",
            session_id = %session_id,
            chars = text.chars().count(),
            "Chat message sent"
        );

        let request = ChatRequest::new(text);
        let timeout = inner.settings.request_timeout;
        let result = tokio::time::timeout(timeout, inner.transport.send(&request, inner.token.as_ref()))
            .await
            .unwrap_or(Err(TransportError::Timeout(timeout)));

        let (reply, outcome) = match result {
            Ok(reply) => {
                info!(
                    name: "chat.submit.replied",
                    session_id = %session_id,
                    kind = ?reply.kind,
                    "Chat reply received"
                );
                (Message::bot(reply.message.as_str()), SubmitOutcome::Replied(reply))
            }
            Err(e) => {
                warn!(
                    name: "chat.submit.failed",
                    session_id = %session_id,
                    error = %e,
                    "Chat request failed"
                );
                (
                    Message::bot(inner.settings.fallback.as_str()),
                    SubmitOutcome::Failed(e),
                )
            }
        };

        self.settled = true;
        inner.settle(self.pending, reply);
        outcome
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(
            name: "chat.submit.abandoned",
            session_id = %self.inner.session().id(),
            pending = %self.pending,
            "Chat request dropped before its reply"
        );
        let fallback = Message::bot(self.inner.settings.fallback.as_str());
        self.inner.settle(self.pending, fallback);
    }
}

impl ChatWidget {
    /// Bind the widget to its surfaces and greet the user.
    ///
    /// If any surface in `affordances` is missing the widget is inert.
    /// The security token is read from `credentials` once, here.
    pub fn initialize(
        affordances: Affordances,
        transport: Arc<dyn ChatTransport>,
        credentials: &dyn CredentialProvider,
        settings: WidgetSettings,
    ) -> Self {
        let Some(surfaces) = affordances.bind() else {
            return Self { inner: None };
        };

        let mut session = Session::new();
        let greeting = Message::bot(settings.greeting.as_str());

        surfaces.window.set_open(false);
        surfaces.close.set_visible(false);
        surfaces.toggle.set_visible(true);
        surfaces.send.set_enabled(true);
        surfaces.window.append(&greeting);
        session.push(greeting);

        let token = credentials.security_token();
        info!(
            name: "chat.widget.initialized",
            session_id = %session.id(),
            created_at = %session.created_at(),
            has_token = token.is_some(),
            "Chat widget initialized"
        );

        Self {
            inner: Some(Arc::new(Inner {
                surfaces,
                token,
                transport,
                settings,
                session: Mutex::new(session),
            })),
        }
    }

    /// Whether the widget was built without all of its surfaces.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.inner.is_none()
    }

    /// Session identifier, if the widget is active.
    #[must_use]
    pub fn session_id(&self) -> Option<String> {
        self.inner.as_ref().map(|inner| inner.session().id().to_string())
    }

    /// Whether the chat window is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.session().is_open())
    }

    /// Whether a request is awaiting its reply.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.session().is_pending())
    }

    /// Snapshot of the conversation so far.
    #[must_use]
    pub fn history(&self) -> Vec<Message> {
        self.inner
            .as_ref()
            .map(|inner| inner.session().history().to_vec())
            .unwrap_or_default()
    }

    /// Open the window if closed, close it if open. Returns the new state.
    ///
    /// Opening hides the toggle control and focuses the input; closing
    /// shows the toggle control again.
    pub fn toggle_visibility(&self) -> bool {
        let Some(inner) = &self.inner else {
            return false;
        };
        let open = inner.session().toggle();
        inner.render_visibility(open);
        debug!(name: "chat.widget.toggled", open, "Chat window toggled");
        open
    }

    /// Close the window. Does nothing if it is already closed.
    pub fn close_window(&self) {
        let Some(inner) = &self.inner else {
            return;
        };
        if inner.session().close() {
            inner.render_visibility(false);
            debug!(name: "chat.widget.closed", "Chat window closed");
        }
    }

    /// Handler for the send control and the Enter key: submit whatever is
    /// in the input field.
    pub fn send_from_input(&self) -> impl Future<Output = SubmitOutcome> + Send + use<> {
        let text = self
            .inner
            .as_ref()
            .map(|inner| inner.surfaces.input.value())
            .unwrap_or_default();
        self.submit(&text)
    }

    /// Send `text` to the chatbot.
    ///
    /// The user message, input clearing and placeholder happen before this
    /// returns; the returned future performs the round-trip and appends
    /// exactly one bot message (the reply or the fallback). Failures are
    /// logged, never returned as errors. Dropping the future before it
    /// finishes settles the request with the fallback.
    pub fn submit(&self, text: &str) -> impl Future<Output = SubmitOutcome> + Send + use<> {
        let prepared = self.prepare(text);
        async move {
            match prepared {
                Prepared::Done(outcome) => outcome,
                Prepared::Sent { request, text } => request.complete(text).await,
            }
        }
    }

    fn prepare(&self, text: &str) -> Prepared {
        let Some(inner) = &self.inner else {
            return Prepared::Done(SubmitOutcome::Inert);
        };
        let text = text.trim();
        if text.is_empty() {
            return Prepared::Done(SubmitOutcome::Ignored);
        }

        let pending = {
            let mut session = inner.session();
            if inner.settings.overlap == OverlapPolicy::Reject && session.is_pending() {
                debug!(
                    name: "chat.submit.busy",
                    session_id = %session.id(),
                    "Submission dropped while a reply is pending"
                );
                return Prepared::Done(SubmitOutcome::Busy);
            }

            // Render under the lock so the view order matches history order.
            let message = Message::user(text);
            inner.surfaces.window.append(&message);
            session.push(message);
            let pending = session.begin_request();
            inner
                .surfaces
                .window
                .show_pending(pending, &inner.settings.placeholder);
            if inner.settings.overlap == OverlapPolicy::Reject {
                inner.surfaces.send.set_enabled(false);
            }
            pending
        };

        inner.surfaces.input.clear();

        Prepared::Sent {
            request: InFlight {
                inner: Arc::clone(inner),
                pending,
                settled: false,
            },
            text: text.to_string(),
        }
    }
}

impl Inner {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn render_visibility(&self, open: bool) {
        self.surfaces.window.set_open(open);
        self.surfaces.toggle.set_visible(!open);
        self.surfaces.close.set_visible(open);
        if open {
            self.surfaces.input.focus();
        }
    }

    /// Replace the placeholder with the terminal message for `pending`.
    fn settle(&self, pending: PendingId, reply: Message) {
        let mut session = self.session();
        self.surfaces.window.remove_pending(pending);
        self.surfaces.window.append(&reply);
        session.push(reply);
        session.finish_request();
        if !session.is_pending() && self.settings.overlap == OverlapPolicy::Reject {
            self.surfaces.send.set_enabled(true);
        }
    }
}
