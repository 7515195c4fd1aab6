//! HTTP implementation of [`ChatTransport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::COOKIE;
use tracing::debug;
use url::Url;

use super::{ChatReply, ChatRequest, ChatTransport, SecurityToken, TransportError};

/// Header carrying the security token unless overridden.
pub const DEFAULT_TOKEN_HEADER: &str = "X-CSRFToken";

/// Endpoint path unless overridden.
pub const DEFAULT_ENDPOINT_PATH: &str = "/api/chatbot/";

/// Sends chat messages as JSON `POST` requests.
///
/// # Example
///
/// ```rust,no_run
/// use chatbot_widget::transport::{ChatRequest, ChatTransport, HttpTransport, StaticToken};
/// use chatbot_widget::transport::CredentialProvider;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = HttpTransport::new("http://localhost:8000", "/api/chatbot/")?;
/// let token = StaticToken::new("csrf").security_token();
///
/// let reply = transport.send(&ChatRequest::new("Hello!"), token.as_ref()).await?;
/// println!("{}", reply.message);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpTransport {
    endpoint: Url,
    http: reqwest::Client,
    token_header: String,
    cookie: Option<String>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The cookie header carries session secrets.
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint.as_str())
            .field("token_header", &self.token_header)
            .field("cookie", &self.cookie.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Create a transport posting to `path` under `base_url`.
    pub fn new(base_url: impl AsRef<str>, path: impl AsRef<str>) -> Result<Self, TransportError> {
        Self::with_client(base_url, path, reqwest::Client::new())
    }

    /// Create a transport with a custom reqwest client.
    pub fn with_client(
        base_url: impl AsRef<str>,
        path: impl AsRef<str>,
        http: reqwest::Client,
    ) -> Result<Self, TransportError> {
        let endpoint = Url::parse(base_url.as_ref())?.join(path.as_ref())?;
        Ok(Self {
            endpoint,
            http,
            token_header: DEFAULT_TOKEN_HEADER.to_string(),
            cookie: None,
            timeout: None,
        })
    }

    /// Use a different header name for the security token.
    #[must_use]
    pub fn with_token_header(mut self, name: impl Into<String>) -> Self {
        self.token_header = name.into();
        self
    }

    /// Forward a `Cookie` header with every request.
    #[must_use]
    pub fn with_cookie_header(mut self, cookies: impl Into<String>) -> Self {
        self.cookie = Some(cookies.into());
        self
    }

    /// Bound every request by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The full endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn decode_response(response: reqwest::Response) -> Result<ChatReply, TransportError> {
        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?;
            Ok(serde_json::from_slice(&body)?)
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            Err(TransportError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        match self.timeout {
            Some(timeout) if err.is_timeout() => TransportError::Timeout(timeout),
            _ => TransportError::Http(err),
        }
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(
        &self,
        request: &ChatRequest,
        token: Option<&SecurityToken>,
    ) -> Result<ChatReply, TransportError> {
        let mut builder = self.http.post(self.endpoint.clone()).json(request);
        if let Some(token) = token {
            builder = builder.header(self.token_header.as_str(), token.expose());
        }
        if let Some(cookie) = &self.cookie {
            builder = builder.header(COOKIE, cookie.as_str());
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        debug!(
            name: "chat.transport.request",
            endpoint = %self.endpoint,
            has_token = token.is_some(),
            "Posting chat message"
        );

        let response = builder.send().await.map_err(|e| self.classify(e))?;
        Self::decode_response(response)
            .await
            .map_err(|e| match e {
                TransportError::Http(inner) => self.classify(inner),
                other => other,
            })
    }
}
