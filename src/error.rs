//! Error types for sessionauth
//!
//! Every fallible API in the crate returns `Result<T, Error>` where Error is
//! defined here. The boolean `login` surface collapses these into `false`.

use thiserror::Error;

/// The main error type for sessionauth
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Unsupported authentication strategy: {name}")]
    UnsupportedStrategy { name: String },

    #[error("No token found at '{path}' in login response")]
    MissingToken { path: String },

    #[error("Token is not a valid {scheme} authorization header value")]
    InvalidToken { scheme: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported strategy error
    pub fn unsupported_strategy(name: impl Into<String>) -> Self {
        Self::UnsupportedStrategy { name: name.into() }
    }

    /// Create a missing token error
    pub fn missing_token(path: impl Into<String>) -> Self {
        Self::MissingToken { path: path.into() }
    }

    /// Create an invalid token error
    pub fn invalid_token(scheme: impl Into<String>) -> Self {
        Self::InvalidToken {
            scheme: scheme.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Whether the failure happened below HTTP (connect, DNS, TLS, timeout)
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_))
    }

    /// The HTTP status of a rejected request, if that is what failed
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for sessionauth
pub type Result<T> = std::result::Result<T, Error>;
