//! Request/response boundary between the widget and the remote chatbot.
//!
//! The widget never talks HTTP directly. It hands a [`ChatRequest`] to a
//! [`ChatTransport`] and gets back either a decoded [`ChatReply`] or a
//! [`TransportError`].
//!
//! # Implementations
//!
//! - [`HttpTransport`]: JSON `POST` over `reqwest`
//!
//! # Credentials
//!
//! The security token attached to each request comes from a
//! [`CredentialProvider`], read once when the widget is initialized.

pub mod credentials;
pub mod http;

pub use credentials::{CookieToken, CredentialProvider, NoToken, SecurityToken, StaticToken};
pub use http::HttpTransport;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body sent to the chatbot endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
}

impl ChatRequest {
    /// Build a request for one user message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Decoded reply from the chatbot endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    /// Reply text shown to the user.
    pub message: String,
    /// Server-side classification of the reply, when present.
    #[serde(default, rename = "type")]
    pub kind: Option<ReplyKind>,
    /// Structured payload that accompanies some replies (search hits, etc.).
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Reply classification reported by the server.
///
/// A reply of kind [`ReplyKind::Error`] is still a successful round-trip:
/// the server understood the request and produced text for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    /// A command was carried out.
    Success,
    /// The server rejected or could not carry out the request.
    Error,
    /// Results of a search command.
    SearchResults,
    /// Free-form answer from a language model.
    AiResponse,
    /// Usage help.
    Help,
    /// Any kind this client does not know about.
    #[serde(other)]
    Other,
}

/// Everything that can keep a request from producing a [`ChatReply`].
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Server answered with a non-success status.
    #[error("Endpoint error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// Response body was not a valid reply.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// No response within the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

/// A single request/response round-trip to the chatbot.
#[async_trait]
pub trait ChatTransport: Send + Sync + std::fmt::Debug {
    /// Send one message and wait for the decoded reply.
    async fn send(
        &self,
        request: &ChatRequest,
        token: Option<&SecurityToken>,
    ) -> Result<ChatReply, TransportError>;
}
