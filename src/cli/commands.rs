//! CLI commands and argument parsing

use crate::auth::AuthStrategy;
use crate::error::Result;
use crate::types::parse_key_value;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Log in to a web application with form, basic, bearer or JWT credentials
#[derive(Parser, Debug)]
#[command(name = "sessionauth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and report the outcome
    Login(LoginArgs),

    /// List supported login strategies
    Strategies,
}

/// Arguments of the `login` command; flags override the profile file
#[derive(Args, Debug, Default)]
pub struct LoginArgs {
    /// Login profile (YAML)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Authentication endpoint
    #[arg(long)]
    pub auth_url: Option<String>,

    /// Username
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password
    #[arg(short, long, env = "SESSIONAUTH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Login strategy (form, basic, bearer, jwt)
    #[arg(short, long)]
    pub strategy: Option<AuthStrategy>,

    /// Extra form field as key=value (repeatable)
    #[arg(long = "field", value_parser = parse_pair)]
    pub fields: Vec<(String, String)>,

    /// Default header as key=value (repeatable)
    #[arg(long = "header", value_parser = parse_pair)]
    pub headers: Vec<(String, String)>,

    /// Cookies to preload, as "name=value; name2=value2"
    #[arg(long)]
    pub cookie: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Path of the token in JSON login responses
    #[arg(long)]
    pub token_path: Option<String>,

    /// URL to GET with the authenticated session after login
    #[arg(long)]
    pub verify_url: Option<String>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one report per line)
    Json,
    /// Human-readable output
    Pretty,
}

fn parse_pair(input: &str) -> Result<(String, String)> {
    parse_key_value(input)
}
