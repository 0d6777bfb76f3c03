//! Shared HTTP session
//!
//! A `Session` is a cheaply cloneable handle: every clone talks through the
//! same `reqwest::Client`, sees the same default-header map and shares one
//! cookie jar. Header names are case-insensitive and each name holds a single
//! value, so writing a header always replaces what was there.

use super::cookies::parse_cookie_string;
use crate::error::Result;
use crate::types::{JsonValue, StringMap};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Method, Response};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

/// Normalized name of the authorization header
pub const AUTHORIZATION: &str = "authorization";

/// Configuration for a session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Transport timeout applied to every request
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Headers sent with every request
    pub default_headers: StringMap,
    /// Keep cookies set by responses for later requests
    pub cookie_store: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("sessionauth/{}", env!("CARGO_PKG_VERSION")),
            default_headers: StringMap::new(),
            cookie_store: true,
        }
    }
}

impl SessionConfig {
    /// Create a new config builder
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }
}

/// Builder for session config
#[derive(Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Disable the cookie jar
    pub fn no_cookie_store(mut self) -> Self {
        self.config.cookie_store = false;
        self
    }

    /// Build the config
    pub fn build(self) -> SessionConfig {
        self.config
    }
}

/// Request body variants
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// URL-encoded form fields
    Form(StringMap),
    /// JSON document
    Json(JsonValue),
}

/// Configuration for a single request
#[derive(Clone, Default)]
pub struct RequestConfig {
    /// Request headers, replacing same-named session defaults (names lowercased)
    pub headers: StringMap,
    /// Request body
    pub body: RequestBody,
    /// HTTP Basic credentials, replacing any default authorization header
    pub basic_auth: Option<(String, String)>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header, replacing any earlier value under the same name
    #[must_use]
    pub fn header(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(normalize_header_name(key.as_ref()), value.into());
        self
    }

    /// Set a URL-encoded form body
    #[must_use]
    pub fn form(mut self, fields: StringMap) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    /// Set a JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// Authenticate this request with HTTP Basic credentials
    #[must_use]
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some((username.into(), password.into()));
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Request headers keyed by normalized name, one value per name
    fn normalized_headers(&self) -> StringMap {
        self.headers
            .iter()
            .map(|(key, value)| (normalize_header_name(key), value.clone()))
            .collect()
    }
}

/// Shared HTTP session with mutable default headers and a cookie jar
#[derive(Clone)]
pub struct Session {
    client: Client,
    headers: Arc<RwLock<StringMap>>,
    /// `None` when the session was built without a cookie store
    cookies: Option<Arc<Jar>>,
}

impl Session {
    /// Create a session with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(SessionConfig::default())
    }

    /// Create a session with custom configuration
    pub fn with_config(config: SessionConfig) -> Result<Self> {
        let cookies = config.cookie_store.then(|| Arc::new(Jar::default()));

        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent);
        if let Some(jar) = &cookies {
            builder = builder.cookie_provider(Arc::clone(jar));
        }
        let client = builder.build()?;

        let headers = config
            .default_headers
            .iter()
            .map(|(key, value)| (normalize_header_name(key), value.clone()))
            .collect();

        Ok(Self {
            client,
            headers: Arc::new(RwLock::new(headers)),
            cookies,
        })
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    // ------------------------------------------------------------------------
    // Default headers
    // ------------------------------------------------------------------------

    /// Set a default header, returning the value it replaced
    pub async fn set_header(
        &self,
        name: impl AsRef<str>,
        value: impl Into<String>,
    ) -> Option<String> {
        let mut headers = self.headers.write().await;
        headers.insert(normalize_header_name(name.as_ref()), value.into())
    }

    /// Get a default header value
    pub async fn header(&self, name: impl AsRef<str>) -> Option<String> {
        let headers = self.headers.read().await;
        headers.get(&normalize_header_name(name.as_ref())).cloned()
    }

    /// Remove a default header, returning its value if it was set
    pub async fn remove_header(&self, name: impl AsRef<str>) -> Option<String> {
        let mut headers = self.headers.write().await;
        headers.remove(&normalize_header_name(name.as_ref()))
    }

    /// Snapshot of the default headers (names lowercased)
    pub async fn headers(&self) -> StringMap {
        self.headers.read().await.clone()
    }

    // ------------------------------------------------------------------------
    // Cookies
    // ------------------------------------------------------------------------

    /// Load cookies from a `name=value; name2=value2` string into the jar
    ///
    /// The cookies are scoped to the host of `url` and to every path on it.
    /// Returns how many cookies were added; always 0 without a cookie store.
    pub fn add_cookies(&self, cookie_string: &str, url: &Url) -> usize {
        let Some(jar) = &self.cookies else {
            warn!("Session has no cookie store, ignoring cookies for {}", url);
            return 0;
        };

        let pairs = parse_cookie_string(cookie_string);
        for (name, value) in &pairs {
            jar.add_cookie_str(&format!("{name}={value}; Path=/"), url);
        }
        debug!("Loaded {} cookie(s) for {}", pairs.len(), url);
        pairs.len()
    }

    /// The `Cookie` header the jar would send to `url`
    pub fn cookie_header(&self, url: &Url) -> Option<String> {
        self.cookies
            .as_ref()?
            .cookies(url)
            .and_then(|value| value.to_str().ok().map(String::from))
    }

    // ------------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------------

    /// Make a GET request
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.request(Method::GET, url, RequestConfig::default())
            .await
    }

    /// Make a GET request with HTTP Basic credentials
    pub async fn get_basic(&self, url: &str, username: &str, password: &str) -> Result<Response> {
        self.request(
            Method::GET,
            url,
            RequestConfig::new().basic_auth(username, password),
        )
        .await
    }

    /// POST a URL-encoded form
    pub async fn post_form(&self, url: &str, fields: StringMap) -> Result<Response> {
        self.request(Method::POST, url, RequestConfig::new().form(fields))
            .await
    }

    /// POST a JSON body
    pub async fn post_json(&self, url: &str, body: JsonValue) -> Result<Response> {
        self.request(Method::POST, url, RequestConfig::new().json(body))
            .await
    }

    /// Make a generic request
    ///
    /// Non-2xx responses are returned as `Ok`; only transport failures error.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<Response> {
        let mut req = self.client.request(method.clone(), url);
        let request_headers = config.normalized_headers();

        {
            let defaults = self.headers.read().await;
            for (key, value) in defaults.iter() {
                let replaced_by_basic = key == AUTHORIZATION && config.basic_auth.is_some();
                if replaced_by_basic || request_headers.contains_key(key) {
                    continue;
                }
                req = req.header(key.as_str(), value.as_str());
            }
        }

        for (key, value) in &request_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some((username, password)) = &config.basic_auth {
            req = req.basic_auth(username, Some(password));
        }

        req = match config.body {
            RequestBody::Empty => req,
            RequestBody::Form(fields) => req.form(&fields),
            RequestBody::Json(body) => req.json(&body),
        };

        if let Some(timeout) = config.timeout {
            req = req.timeout(timeout);
        }

        let response = req.send().await?;
        debug!("{} {} -> {}", method, url, response.status().as_u16());
        Ok(response)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Header values may carry credentials, so only the names are shown.
        let names: Vec<String> = self
            .headers
            .try_read()
            .map(|headers| headers.keys().cloned().collect())
            .unwrap_or_default();
        f.debug_struct("Session")
            .field("header_names", &names)
            .field("cookie_store", &self.cookies.is_some())
            .finish_non_exhaustive()
    }
}

/// Lowercase and trim a header name so lookups are case-insensitive
pub(crate) fn normalize_header_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
