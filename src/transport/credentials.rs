//! Security token sources.

use std::fmt;

/// Opaque credential forwarded with every request.
///
/// The value is never printed by `Debug` so it cannot leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SecurityToken(String);

impl SecurityToken {
    /// Wrap a raw token value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw token, for placing in a request header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecurityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecurityToken(..)")
    }
}

/// Supplies the security token for a widget session.
pub trait CredentialProvider: Send + Sync {
    /// Current token, if one is available.
    fn security_token(&self) -> Option<SecurityToken>;
}

/// A provider that never has a token.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoToken;

impl CredentialProvider for NoToken {
    fn security_token(&self) -> Option<SecurityToken> {
        None
    }
}

/// A fixed token supplied by the host.
#[derive(Debug, Clone)]
pub struct StaticToken(SecurityToken);

impl StaticToken {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecurityToken::new(value))
    }
}

impl CredentialProvider for StaticToken {
    fn security_token(&self) -> Option<SecurityToken> {
        Some(self.0.clone())
    }
}

/// Looks the token up by name in a `Cookie` header string
/// (`name=value; other=value`).
#[derive(Clone)]
pub struct CookieToken {
    cookies: String,
    name: String,
}

impl CookieToken {
    /// Build a provider over `cookies`, reading the cookie called `name`.
    #[must_use]
    pub fn new(cookies: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            cookies: cookies.into(),
            name: name.into(),
        }
    }

    /// The full cookie string, for forwarding as a `Cookie` header.
    #[must_use]
    pub fn cookie_header(&self) -> &str {
        &self.cookies
    }
}

impl fmt::Debug for CookieToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieToken")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl CredentialProvider for CookieToken {
    fn security_token(&self) -> Option<SecurityToken> {
        self.cookies
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| key.trim() == self.name)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
            .map(SecurityToken::new)
    }
}
