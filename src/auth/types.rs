//! Auth types
//!
//! Strategies, credentials, the stored token and login outcomes.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scheme installed by `set_token` when none is given, and by form/bearer logins
pub const DEFAULT_SCHEME: &str = "Bearer";

/// Scheme installed by the jwt strategy
pub const JWT_SCHEME: &str = "JWT";

/// Authentication strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum AuthStrategy {
    /// POST username/password as a URL-encoded form
    Form,
    /// GET with HTTP Basic credentials
    Basic,
    /// POST credentials as JSON, install `Bearer <token>`
    Bearer,
    /// POST credentials as JSON, install `JWT <token>`
    Jwt,
}

impl AuthStrategy {
    /// Every supported strategy
    pub const ALL: [AuthStrategy; 4] = [
        AuthStrategy::Form,
        AuthStrategy::Basic,
        AuthStrategy::Bearer,
        AuthStrategy::Jwt,
    ];

    /// Lowercase strategy name
    pub fn as_str(self) -> &'static str {
        match self {
            AuthStrategy::Form => "form",
            AuthStrategy::Basic => "basic",
            AuthStrategy::Bearer => "bearer",
            AuthStrategy::Jwt => "jwt",
        }
    }
}

impl fmt::Display for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        AuthStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == name)
            .ok_or_else(|| Error::unsupported_strategy(s))
    }
}

impl TryFrom<String> for AuthStrategy {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Username and password pair
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Token currently installed on the session
#[derive(Clone)]
pub struct AuthToken {
    /// The token value
    pub value: String,
    /// Authorization scheme (e.g. "Bearer")
    pub scheme: String,
    /// When the token was stored
    pub issued_at: DateTime<Utc>,
}

impl AuthToken {
    /// Create a token stored now
    pub fn new(value: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            scheme: scheme.into(),
            issued_at: Utc::now(),
        }
    }

    /// `Authorization` header value for this token
    pub fn header_value(&self) -> String {
        format!("{} {}", self.scheme, self.value)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("value", &"<redacted>")
            .field("scheme", &self.scheme)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// Successful login result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The server accepted the login but no token was stored
    Authenticated,
    /// A token was extracted and installed with the given scheme
    TokenInstalled {
        /// Authorization scheme of the installed header
        scheme: String,
    },
}

impl LoginOutcome {
    /// Scheme of the installed token, if any
    pub fn scheme(&self) -> Option<&str> {
        match self {
            LoginOutcome::Authenticated => None,
            LoginOutcome::TokenInstalled { scheme } => Some(scheme),
        }
    }
}
