//! Login configuration
//!
//! A login profile describes where and how to authenticate, plus the session
//! settings to authenticate with. Profiles are written in YAML:
//!
//! ```yaml
//! auth_url: https://example.com/login
//! username: admin
//! strategy: form
//! extra_fields:
//!   csrf_token: abc
//! session:
//!   timeout_secs: 10
//!   cookies: "sid=abc; theme=dark"
//! ```

use crate::auth::{AuthStrategy, DEFAULT_TOKEN_PATH};
use crate::error::{Error, Result};
use crate::http::SessionConfig;
use crate::types::StringMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Login Profile
// ============================================================================

/// Complete login profile loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginConfig {
    /// Authentication endpoint
    #[serde(default)]
    pub auth_url: String,

    /// Username
    #[serde(default)]
    pub username: String,

    /// Password (may instead come from the command line or environment)
    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    /// Login strategy
    #[serde(default = "default_strategy")]
    pub strategy: AuthStrategy,

    /// Path of the token in JSON login responses
    #[serde(default = "default_token_path")]
    pub token_path: String,

    /// Additional fields for form logins
    #[serde(default)]
    pub extra_fields: StringMap,

    /// Session settings
    #[serde(default)]
    pub session: SessionSettings,
}

fn default_strategy() -> AuthStrategy {
    AuthStrategy::Form
}

fn default_token_path() -> String {
    DEFAULT_TOKEN_PATH.to_string()
}

// ============================================================================
// Session Settings
// ============================================================================

/// HTTP session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: StringMap,

    /// Cookies to preload, as `name=value; name2=value2`
    #[serde(default)]
    pub cookies: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            headers: StringMap::new(),
            cookies: None,
        }
    }
}

impl LoginConfig {
    /// Create a form-login profile with default settings
    pub fn new(auth_url: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            auth_url: auth_url.into(),
            username: username.into(),
            password: None,
            strategy: default_strategy(),
            token_path: default_token_path(),
            extra_fields: StringMap::new(),
            session: SessionSettings::default(),
        }
    }

    /// Load a profile from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a profile from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Check that the profile can be used to log in
    pub fn validate(&self) -> Result<()> {
        if self.auth_url.trim().is_empty() {
            return Err(Error::invalid_value("auth_url", "must not be empty"));
        }
        url::Url::parse(&self.auth_url)?;

        if self.username.is_empty() {
            return Err(Error::invalid_value("username", "must not be empty"));
        }

        if self.session.timeout_secs == 0 {
            return Err(Error::invalid_value(
                "session.timeout_secs",
                "must be greater than zero",
            ));
        }

        if self.token_path.trim().is_empty() {
            return Err(Error::invalid_value("token_path", "must not be empty"));
        }

        Ok(())
    }

    /// Session configuration described by this profile
    pub fn session_config(&self) -> SessionConfig {
        let mut builder = SessionConfig::builder()
            .timeout(Duration::from_secs(self.session.timeout_secs));

        if let Some(agent) = &self.session.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        for (key, value) in &self.session.headers {
            builder = builder.header(key.clone(), value.clone());
        }

        builder.build()
    }
}
