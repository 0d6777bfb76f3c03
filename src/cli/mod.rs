//! CLI module
//!
//! Command-line interface for logging in to web applications.
//!
//! # Commands
//!
//! - `login` - Authenticate with one strategy and report the outcome
//! - `strategies` - List supported strategies

mod commands;
mod runner;

pub use commands::{Cli, Commands, LoginArgs, OutputFormat};
pub use runner::{resolve_config, LoginReport, Runner};
