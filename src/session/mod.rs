//! Widget session state.
//!
//! A session lives for as long as the widget that owns it. It tracks
//! whether the chat window is open, how many requests are in flight, and the
//! append-only message history.
//!
//! # Architecture
//!
//! - [`Message`]: A single immutable history entry
//! - [`Session`]: Open/closed flag, in-flight bookkeeping and history
//!
//! # Example
//!
//! ```rust
//! use chatbot_widget::session::{Message, Role, Session};
//!
//! let mut session = Session::new();
//! session.push(Message::bot("Hello!"));
//! session.push(Message::user("Hi"));
//!
//! assert_eq!(session.history().len(), 2);
//! assert_eq!(session.history()[1].role, Role::User);
//! ```

mod message;
mod state;

pub use message::{Message, PendingId, Role};
pub use state::Session;
