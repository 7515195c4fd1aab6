use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::transport::{
    CookieToken, CredentialProvider, HttpTransport, NoToken, StaticToken, TransportError,
    http::{DEFAULT_ENDPOINT_PATH, DEFAULT_TOKEN_HEADER},
};
use crate::widget::{
    DEFAULT_FALLBACK, DEFAULT_GREETING, DEFAULT_PLACEHOLDER, DEFAULT_REQUEST_TIMEOUT,
    OverlapPolicy, WidgetSettings,
};

/// Cookie holding the security token unless overridden.
pub const DEFAULT_TOKEN_COOKIE: &str = "csrftoken";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Base URL of the chatbot server
    #[arg(long, env = "CHATBOT_URL")]
    pub base_url: Option<String>,

    /// Endpoint path, joined onto the base URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Seconds to wait for a reply before giving up
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Security token sent with every request
    #[arg(long, env = "CSRF_TOKEN")]
    pub csrf_token: Option<String>,

    /// Cookie header to forward; the token is read from it when no
    /// explicit token is given
    #[arg(long, env = "CHATBOT_COOKIE")]
    pub cookie: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub endpoint: EndpointConfig,
    pub credentials: CredentialsConfig,
    pub widget: WidgetConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EndpointConfig {
    pub base_url: String,
    pub path: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CredentialsConfig {
    pub token_header: String,
    pub cookie_name: String,
    pub token: Option<String>,
    pub cookie: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    pub greeting: String,
    pub placeholder: String,
    pub fallback: String,
    pub overlap: OverlapPolicy,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("endpoint.base_url", "http://127.0.0.1:8000")?
            .set_default("endpoint.path", DEFAULT_ENDPOINT_PATH)?
            .set_default("endpoint.timeout_secs", DEFAULT_REQUEST_TIMEOUT.as_secs())?
            .set_default("credentials.token_header", DEFAULT_TOKEN_HEADER)?
            .set_default("credentials.cookie_name", DEFAULT_TOKEN_COOKIE)?
            .set_default("widget.greeting", DEFAULT_GREETING)?
            .set_default("widget.placeholder", DEFAULT_PLACEHOLDER)?
            .set_default("widget.fallback", DEFAULT_FALLBACK)?
            .set_default("widget.overlap", "reject")?;

        // 2. Config file
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        }

        // 3. Environment variables (prefixed with CHATBOT_)
        // E.g. CHATBOT_ENDPOINT__TIMEOUT_SECS=10
        builder = builder.add_source(
            Environment::with_prefix("CHATBOT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (and the env vars clap reads for them)
        if let Some(url) = cli.base_url {
            builder = builder.set_override("endpoint.base_url", url)?;
        }
        if let Some(path) = cli.endpoint {
            builder = builder.set_override("endpoint.path", path)?;
        }
        if let Some(secs) = cli.timeout_secs {
            builder = builder.set_override("endpoint.timeout_secs", secs)?;
        }
        if let Some(token) = cli.csrf_token {
            builder = builder.set_override("credentials.token", token)?;
        }
        if let Some(cookie) = cli.cookie {
            builder = builder.set_override("credentials.cookie", cookie)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        if cfg.endpoint.timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "endpoint.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(cfg)
    }

    /// Round-trip bound for a single request.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.endpoint.timeout_secs)
    }

    /// Widget texts and limits.
    #[must_use]
    pub fn widget_settings(&self) -> WidgetSettings {
        WidgetSettings {
            greeting: self.widget.greeting.clone(),
            placeholder: self.widget.placeholder.clone(),
            fallback: self.widget.fallback.clone(),
            overlap: self.widget.overlap,
            request_timeout: self.request_timeout(),
        }
    }

    /// HTTP transport for the configured endpoint.
    pub fn transport(&self) -> Result<HttpTransport, TransportError> {
        let mut transport = HttpTransport::new(&self.endpoint.base_url, &self.endpoint.path)?
            .with_token_header(self.credentials.token_header.as_str())
            .with_timeout(self.request_timeout());
        if let Some(cookie) = &self.credentials.cookie {
            transport = transport.with_cookie_header(cookie.as_str());
        }
        Ok(transport)
    }

    /// Token source: an explicit token wins over the cookie lookup.
    #[must_use]
    pub fn credential_provider(&self) -> Arc<dyn CredentialProvider> {
        match (&self.credentials.token, &self.credentials.cookie) {
            (Some(token), _) => Arc::new(StaticToken::new(token.as_str())),
            (None, Some(cookie)) => Arc::new(CookieToken::new(
                cookie.as_str(),
                self.credentials.cookie_name.as_str(),
            )),
            (None, None) => Arc::new(NoToken),
        }
    }
}
