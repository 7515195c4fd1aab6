//! Line-oriented console front-end for the widget.
//!
//! The console plays every surface the widget needs: it prints messages and
//! placeholders, holds the "input field" that the host fills from stdin, and
//! tracks whether the send control is enabled.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::session::{Message, PendingId, Role};
use crate::widget::{Affordances, ChatWindow, Control, TextInput};

/// Shared console state behind every console surface.
pub struct Console {
    out: Mutex<Box<dyn Write + Send>>,
    input: Mutex<String>,
    send_enabled: AtomicBool,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("send_enabled", &self.send_enabled())
            .finish_non_exhaustive()
    }
}

impl Console {
    /// A console writing to `out`.
    #[must_use]
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            input: Mutex::new(String::new()),
            send_enabled: AtomicBool::new(true),
        }
    }

    /// A console writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Replace the contents of the input field.
    pub fn set_input(&self, text: &str) {
        let mut input = self.input.lock().unwrap_or_else(PoisonError::into_inner);
        input.clear();
        input.push_str(text);
    }

    /// Whether the send control currently accepts activation.
    pub fn send_enabled(&self) -> bool {
        self.send_enabled.load(Ordering::SeqCst)
    }

    /// Every surface, bound to this console.
    #[must_use]
    pub fn affordances(self: &Arc<Self>) -> Affordances {
        Affordances::new()
            .with_toggle(Arc::new(ConsoleControl::new(ControlKind::Toggle, self)))
            .with_close(Arc::new(ConsoleControl::new(ControlKind::Close, self)))
            .with_send(Arc::new(ConsoleControl::new(ControlKind::Send, self)))
            .with_input(Arc::clone(self) as Arc<dyn TextInput>)
            .with_window(Arc::clone(self) as Arc<dyn ChatWindow>)
    }

    /// Print a line that is not part of the conversation.
    pub fn notice(&self, text: &str) {
        self.print(&format!("· {text}"));
    }

    fn print(&self, line: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        // A closed stdout is not worth failing the widget over.
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }
}

impl TextInput for Console {
    fn value(&self) -> String {
        self.input
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn clear(&self) {
        self.input
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn focus(&self) {
        debug!(name: "console.input.focused", "Input focused");
    }
}

impl ChatWindow for Console {
    fn set_open(&self, open: bool) {
        if open {
            self.print("── chat opened ──");
        } else {
            self.print("── chat closed ── (type /toggle to reopen)");
        }
    }

    fn append(&self, message: &Message) {
        let who = match message.role {
            Role::User => "you",
            Role::Bot => "bot",
        };
        self.print(&format!("[{who}] {}", message.text));
    }

    fn show_pending(&self, id: PendingId, text: &str) {
        self.print(&format!("[bot] {text} ({id})"));
    }

    fn remove_pending(&self, id: PendingId) {
        debug!(name: "console.pending.removed", pending = %id, "Placeholder removed");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ControlKind {
    Toggle,
    Close,
    Send,
}

/// One of the console's buttons.
#[derive(Debug)]
struct ConsoleControl {
    kind: ControlKind,
    console: Arc<Console>,
}

impl ConsoleControl {
    fn new(kind: ControlKind, console: &Arc<Console>) -> Self {
        Self {
            kind,
            console: Arc::clone(console),
        }
    }
}

impl Control for ConsoleControl {
    fn set_visible(&self, visible: bool) {
        debug!(name: "console.control.visibility", control = ?self.kind, visible, "Control visibility changed");
    }

    fn set_enabled(&self, enabled: bool) {
        if self.kind == ControlKind::Send {
            self.console.send_enabled.store(enabled, Ordering::SeqCst);
        }
    }
}
