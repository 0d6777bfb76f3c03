//! CLI runner - executes commands

use crate::auth::{AuthStrategy, Authenticator, Credentials, LoginOutcome};
use crate::cli::commands::{Cli, Commands, LoginArgs, OutputFormat};
use crate::config::LoginConfig;
use crate::error::{Error, Result};
use crate::http::Session;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use url::Url;

/// Result of a `login` run, printed to stdout
#[derive(Debug, Clone, Serialize)]
pub struct LoginReport {
    pub authenticated: bool,
    pub strategy: AuthStrategy,
    pub auth_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoginReport {
    fn new(config: &LoginConfig) -> Self {
        Self {
            authenticated: false,
            strategy: config.strategy,
            auth_url: config.auth_url.clone(),
            scheme: None,
            issued_at: None,
            verify_status: None,
            error: None,
        }
    }

    /// Render the report in the requested format
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string(self)?),
            OutputFormat::Pretty => {
                let mut out = String::new();
                let status = if self.authenticated {
                    "authenticated"
                } else {
                    "not authenticated"
                };
                out.push_str(&format!(
                    "{} login to {}: {}\n",
                    self.strategy, self.auth_url, status
                ));
                if let Some(scheme) = &self.scheme {
                    out.push_str(&format!("  authorization scheme: {scheme}\n"));
                }
                if let Some(issued_at) = &self.issued_at {
                    out.push_str(&format!("  token issued at: {}\n", issued_at.to_rfc3339()));
                }
                if let Some(code) = self.verify_status {
                    out.push_str(&format!("  verify status: {code}\n"));
                }
                if let Some(error) = &self.error {
                    out.push_str(&format!("  error: {error}\n"));
                }
                Ok(out.trim_end().to_string())
            }
        }
    }
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Login(args) => self.login(args).await,
            Commands::Strategies => self.strategies(),
        }
    }

    /// Log in and print a report
    async fn login(&self, args: &LoginArgs) -> Result<()> {
        let config = resolve_config(args)?;
        let password = config.password.clone().ok_or_else(|| {
            Error::config("Password not specified (use --password or SESSIONAUTH_PASSWORD)")
        })?;

        let session = Session::with_config(config.session_config())?;
        if let Some(cookies) = &config.session.cookies {
            let url = Url::parse(&config.auth_url)?;
            session.add_cookies(cookies, &url);
        }

        let auth = Authenticator::new(session.clone()).with_token_path(&config.token_path);
        let credentials = Credentials::new(&config.username, password);
        let extra_fields = (!config.extra_fields.is_empty()).then_some(&config.extra_fields);

        info!(
            "Logging in to {} as {} using {} strategy",
            config.auth_url, config.username, config.strategy
        );

        let mut report = LoginReport::new(&config);
        let outcome = auth
            .try_login(&config.auth_url, &credentials, config.strategy, extra_fields)
            .await;

        let result = match outcome {
            Ok(outcome) => {
                report.authenticated = true;
                report.scheme = outcome.scheme().map(String::from);
                report.issued_at = auth.token_issued_at().await;
                if outcome == LoginOutcome::Authenticated {
                    info!("Login accepted without a token");
                }
                match &args.verify_url {
                    Some(url) => verify(&session, url, &mut report).await,
                    None => Ok(()),
                }
            }
            Err(e) => {
                report.error = Some(e.to_string());
                Err(e)
            }
        };

        println!("{}", report.render(self.cli.format)?);
        result
    }

    /// List supported strategies
    fn strategies(&self) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(&AuthStrategy::ALL)?);
            }
            OutputFormat::Pretty => {
                for strategy in AuthStrategy::ALL {
                    println!("{strategy}");
                }
            }
        }
        Ok(())
    }
}

/// Merge the optional profile file with command-line flags and validate
pub fn resolve_config(args: &LoginArgs) -> Result<LoginConfig> {
    let mut config = match &args.config {
        Some(path) => LoginConfig::from_file(path)?,
        None => LoginConfig::new(String::new(), String::new()),
    };

    if let Some(url) = &args.auth_url {
        config.auth_url.clone_from(url);
    }
    if let Some(username) = &args.username {
        config.username.clone_from(username);
    }
    if args.password.is_some() {
        config.password.clone_from(&args.password);
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(path) = &args.token_path {
        config.token_path.clone_from(path);
    }
    if let Some(timeout) = args.timeout {
        config.session.timeout_secs = timeout;
    }
    if args.cookie.is_some() {
        config.session.cookies.clone_from(&args.cookie);
    }
    for (key, value) in &args.fields {
        config.extra_fields.insert(key.clone(), value.clone());
    }
    for (key, value) in &args.headers {
        config.session.headers.insert(key.clone(), value.clone());
    }

    config.validate()?;
    Ok(config)
}

/// GET the verification URL with the authenticated session
async fn verify(session: &Session, url: &str, report: &mut LoginReport) -> Result<()> {
    let response = session.get(url).await.inspect_err(|e| {
        report.error = Some(e.to_string());
    })?;

    let status = response.status();
    report.verify_status = Some(status.as_u16());
    if status.is_success() {
        info!("Verification request to {} succeeded", url);
        return Ok(());
    }

    warn!("Verification request to {} returned {}", url, status.as_u16());
    let err = Error::http_status(status.as_u16(), "verification request rejected");
    report.error = Some(err.to_string());
    Err(err)
}
