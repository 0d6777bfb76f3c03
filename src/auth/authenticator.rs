//! Authenticator implementation
//!
//! Dispatches a login to one strategy handler and installs the resulting
//! token on the shared session.

use super::types::{AuthStrategy, AuthToken, Credentials, LoginOutcome, DEFAULT_SCHEME, JWT_SCHEME};
use crate::error::{Error, Result};
use crate::http::{Session, AUTHORIZATION};
use crate::types::StringMap;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderValue;
use reqwest::Response;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error};

/// Field looked up in JSON login responses unless configured otherwise
pub const DEFAULT_TOKEN_PATH: &str = "token";

/// Bytes of a rejected response body kept in `Error::HttpStatus`
pub const MAX_ERROR_BODY: usize = 1024;

/// Credential strategy dispatcher bound to a shared session
///
/// Clones share both the session and the stored token.
#[derive(Clone)]
pub struct Authenticator {
    /// Shared session whose `Authorization` header is managed here
    session: Session,
    /// Token installed by the last successful login or `set_token`
    token: Arc<RwLock<Option<AuthToken>>>,
    /// Path of the token inside JSON login responses
    token_path: String,
}

impl Authenticator {
    /// Create an authenticator acting on the given session
    pub fn new(session: Session) -> Self {
        Self {
            session,
            token: Arc::new(RwLock::new(None)),
            token_path: DEFAULT_TOKEN_PATH.to_string(),
        }
    }

    /// Look the token up at a dotted path (e.g. `data.access_token`)
    #[must_use]
    pub fn with_token_path(mut self, path: impl Into<String>) -> Self {
        self.token_path = path.into();
        self
    }

    /// The shared session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Log in with a named strategy
    ///
    /// Never fails: unsupported strategy names, transport errors, rejected
    /// logins and unusable responses are logged and reported as `false`.
    /// `extra_fields` only apply to the form strategy.
    pub async fn login(
        &self,
        auth_url: &str,
        username: &str,
        password: &str,
        strategy: &str,
        extra_fields: Option<&StringMap>,
    ) -> bool {
        let strategy = match strategy.parse::<AuthStrategy>() {
            Ok(strategy) => strategy,
            Err(e) => {
                error!("{e}");
                return false;
            }
        };

        let credentials = Credentials::new(username, password);
        match self
            .try_login(auth_url, &credentials, strategy, extra_fields)
            .await
        {
            Ok(_) => true,
            Err(Error::HttpStatus { status, .. }) => {
                debug!("{strategy} login to {auth_url} rejected with status {status}");
                false
            }
            Err(e) => {
                error!("{strategy} login to {auth_url} failed: {e}");
                false
            }
        }
    }

    /// Log in and report why it failed
    pub async fn try_login(
        &self,
        auth_url: &str,
        credentials: &Credentials,
        strategy: AuthStrategy,
        extra_fields: Option<&StringMap>,
    ) -> Result<LoginOutcome> {
        if extra_fields.is_some() && strategy != AuthStrategy::Form {
            debug!("Ignoring extra fields for {strategy} login");
        }

        match strategy {
            AuthStrategy::Form => self.login_form(auth_url, credentials, extra_fields).await,
            AuthStrategy::Basic => self.login_basic(auth_url, credentials).await,
            AuthStrategy::Bearer => {
                self.exchange_token(auth_url, credentials, DEFAULT_SCHEME)
                    .await
            }
            AuthStrategy::Jwt => self.exchange_token(auth_url, credentials, JWT_SCHEME).await,
        }
    }

    /// POST the credentials as a form; a token in the response is optional
    async fn login_form(
        &self,
        auth_url: &str,
        credentials: &Credentials,
        extra_fields: Option<&StringMap>,
    ) -> Result<LoginOutcome> {
        let mut fields = extra_fields.cloned().unwrap_or_default();
        fields.insert("username".to_string(), credentials.username.clone());
        fields.insert("password".to_string(), credentials.password.clone());

        let response = self.session.post_form(auth_url, fields).await?;
        let response = ensure_success(response).await?;

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!("Could not read form login response ({e}), keeping auth state");
                return Ok(LoginOutcome::Authenticated);
            }
        };

        let token = match serde_json::from_str::<Value>(&body) {
            Ok(json) => extract_jsonpath(&json, &self.token_path),
            Err(e) => {
                debug!("Form login response is not JSON ({e}), keeping auth state");
                None
            }
        };

        let Some(token) = token else {
            return Ok(LoginOutcome::Authenticated);
        };

        match self.install_token(token, DEFAULT_SCHEME).await {
            Ok(()) => Ok(LoginOutcome::TokenInstalled {
                scheme: DEFAULT_SCHEME.to_string(),
            }),
            Err(e) => {
                debug!("Ignoring form login token ({e}), keeping auth state");
                Ok(LoginOutcome::Authenticated)
            }
        }
    }

    /// GET with Basic credentials; nothing is stored
    async fn login_basic(&self, auth_url: &str, credentials: &Credentials) -> Result<LoginOutcome> {
        let response = self
            .session
            .get_basic(auth_url, &credentials.username, &credentials.password)
            .await?;
        ensure_success(response).await?;
        Ok(LoginOutcome::Authenticated)
    }

    /// POST the credentials as JSON and install the returned token
    async fn exchange_token(
        &self,
        auth_url: &str,
        credentials: &Credentials,
        scheme: &str,
    ) -> Result<LoginOutcome> {
        let body = json!({
            "username": credentials.username,
            "password": credentials.password,
        });

        let response = self.session.post_json(auth_url, body).await?;
        let response = ensure_success(response).await?;
        let body: Value = serde_json::from_str(&response.text().await?)?;

        let token = extract_jsonpath(&body, &self.token_path)
            .ok_or_else(|| Error::missing_token(&self.token_path))?;

        self.install_token(token, scheme).await?;
        Ok(LoginOutcome::TokenInstalled {
            scheme: scheme.to_string(),
        })
    }

    /// Store a token and overwrite the session's `Authorization` header
    ///
    /// Fails with `Error::InvalidToken` and changes nothing when
    /// `<scheme> <token>` is not a legal header value (control characters,
    /// line breaks). Use [`DEFAULT_SCHEME`] for `Bearer`.
    pub async fn set_token(
        &self,
        token: impl Into<String>,
        scheme: impl Into<String>,
    ) -> Result<()> {
        self.install_token(token, scheme).await
    }

    /// Store a token with the `Bearer` scheme
    pub async fn set_bearer_token(&self, token: impl Into<String>) -> Result<()> {
        self.set_token(token, DEFAULT_SCHEME).await
    }

    /// Forget the token and remove the session's `Authorization` header
    pub async fn clear_auth(&self) {
        let mut current = self.token.write().await;
        *current = None;
        if self.session.remove_header(AUTHORIZATION).await.is_some() {
            debug!("Cleared session authorization");
        }
    }

    /// Whether the session currently carries an `Authorization` header
    pub async fn is_authenticated(&self) -> bool {
        self.session.header(AUTHORIZATION).await.is_some()
    }

    /// Scheme of the stored token
    pub async fn token_scheme(&self) -> Option<String> {
        let current = self.token.read().await;
        current.as_ref().map(|token| token.scheme.clone())
    }

    /// When the stored token was installed
    pub async fn token_issued_at(&self) -> Option<DateTime<Utc>> {
        let current = self.token.read().await;
        current.as_ref().map(|token| token.issued_at)
    }

    /// Token and header change together under the token lock
    async fn install_token(
        &self,
        value: impl Into<String>,
        scheme: impl Into<String>,
    ) -> Result<()> {
        let token = AuthToken::new(value, scheme);
        let header = token.header_value();
        if HeaderValue::from_str(&header).is_err() {
            return Err(Error::invalid_token(&token.scheme));
        }

        let mut current = self.token.write().await;
        self.session.set_header(AUTHORIZATION, header).await;
        debug!("Installed {} authorization on session", token.scheme);
        *current = Some(token);
        Ok(())
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("session", &self.session)
            .field("token_path", &self.token_path)
            .finish_non_exhaustive()
    }
}

/// Turn a non-2xx response into `Error::HttpStatus`, keeping at most
/// [`MAX_ERROR_BODY`] bytes of the body
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::http_status(status.as_u16(), truncate_body(body)))
}

fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}

/// Extract a value from JSON using a simple JSONPath expression
/// Supports basic paths like "$.data.token" or "data.token"
pub fn extract_jsonpath(value: &Value, path: &str) -> Option<String> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        match current {
            Value::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }

    match current {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
