//! UI surfaces the widget binds to.
//!
//! The host supplies these at construction time; the widget never looks
//! them up on its own. Each one is optional in [`Affordances`] so a page
//! (or a test) that omits part of the widget still constructs cleanly.

use std::fmt;
use std::sync::Arc;

use crate::session::{Message, PendingId};

/// A clickable control: the toggle button, close button or send button.
pub trait Control: Send + Sync {
    /// Show or hide the control.
    fn set_visible(&self, _visible: bool) {}

    /// Allow or block activation of the control.
    fn set_enabled(&self, _enabled: bool) {}
}

/// The text field the user types into.
pub trait TextInput: Send + Sync {
    /// Current contents.
    fn value(&self) -> String;

    /// Empty the field.
    fn clear(&self);

    /// Move keyboard focus to the field.
    fn focus(&self);
}

/// The chat window and its message list.
pub trait ChatWindow: Send + Sync {
    /// Show or hide the window.
    fn set_open(&self, open: bool);

    /// Render a message at the end of the list.
    fn append(&self, message: &Message);

    /// Render a transient placeholder at the end of the list.
    fn show_pending(&self, id: PendingId, text: &str);

    /// Remove a placeholder previously shown with [`ChatWindow::show_pending`].
    fn remove_pending(&self, id: PendingId);
}

/// The set of surfaces handed to [`ChatWidget::initialize`](super::ChatWidget::initialize).
#[derive(Default, Clone)]
pub struct Affordances {
    pub toggle: Option<Arc<dyn Control>>,
    pub close: Option<Arc<dyn Control>>,
    pub send: Option<Arc<dyn Control>>,
    pub input: Option<Arc<dyn TextInput>>,
    pub window: Option<Arc<dyn ChatWindow>>,
}

impl fmt::Debug for Affordances {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Affordances")
            .field("toggle", &self.toggle.is_some())
            .field("close", &self.close.is_some())
            .field("send", &self.send.is_some())
            .field("input", &self.input.is_some())
            .field("window", &self.window.is_some())
            .finish()
    }
}

impl Affordances {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_toggle(mut self, control: Arc<dyn Control>) -> Self {
        self.toggle = Some(control);
        self
    }

    #[must_use]
    pub fn with_close(mut self, control: Arc<dyn Control>) -> Self {
        self.close = Some(control);
        self
    }

    #[must_use]
    pub fn with_send(mut self, control: Arc<dyn Control>) -> Self {
        self.send = Some(control);
        self
    }

    #[must_use]
    pub fn with_input(mut self, input: Arc<dyn TextInput>) -> Self {
        self.input = Some(input);
        self
    }

    #[must_use]
    pub fn with_window(mut self, window: Arc<dyn ChatWindow>) -> Self {
        self.window = Some(window);
        self
    }

    /// All surfaces, or `None` if any is missing.
    pub(crate) fn bind(self) -> Option<Bound> {
        Some(Bound {
            toggle: self.toggle?,
            close: self.close?,
            send: self.send?,
            input: self.input?,
            window: self.window?,
        })
    }
}

/// A complete set of surfaces.
pub(crate) struct Bound {
    pub(crate) toggle: Arc<dyn Control>,
    pub(crate) close: Arc<dyn Control>,
    pub(crate) send: Arc<dyn Control>,
    pub(crate) input: Arc<dyn TextInput>,
    pub(crate) window: Arc<dyn ChatWindow>,
}
