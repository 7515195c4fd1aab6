//! Chatbot Widget
//!
//! A request/response chat client: the core of an embeddable chat widget
//! that posts user messages to a remote chatbot endpoint and renders the
//! replies.
//!
//! # Architecture
//!
//! - **Widget**: Owns open/closed state, the message history and the
//!   asynchronous send/receive cycle
//! - **Transport**: The single HTTP boundary to the chatbot, plus the
//!   security token sources
//! - **Console**: A terminal rendition of the widget's UI surfaces
//!
//! # Modules
//!
//! - [`config`]: Layered configuration (defaults, file, env, CLI)
//! - [`session`]: Session state and message history
//! - [`terminal`]: Console front-end
//! - [`transport`]: Chat transport trait, HTTP implementation, credentials
//! - [`widget`]: The chat widget and its UI surface traits

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::match_same_arms)]

pub mod config;
pub mod session;
pub mod terminal;
pub mod transport;
pub mod widget;
