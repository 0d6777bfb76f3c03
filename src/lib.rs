//! # sessionauth
//!
//! Attach credentials to a shared HTTP session using one of four login
//! strategies, and manage the resulting `Authorization` header by hand.
//!
//! ## Strategies
//!
//! - **form**: POST username/password as a URL-encoded form; a `token` in the
//!   JSON response is installed as `Bearer <token>` when present
//! - **basic**: GET with HTTP Basic credentials; nothing is stored
//! - **bearer**: POST credentials as JSON and install `Bearer <token>`
//! - **jwt**: like bearer, but installs `JWT <token>`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sessionauth::{Authenticator, Session};
//!
//! #[tokio::main]
//! async fn main() -> sessionauth::Result<()> {
//!     let session = Session::new()?;
//!     let auth = Authenticator::new(session.clone());
//!
//!     if auth.login("https://example.com/api/login", "admin", "secret", "bearer", None).await {
//!         // Every request through `session` now carries the token
//!         let response = session.get("https://example.com/api/me").await?;
//!         println!("{}", response.status());
//!     }
//!
//!     auth.clear_auth().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                      Authenticator                        │
//! │  login(url, user, pass, strategy, extra) → bool           │
//! │  try_login(...) → Result<LoginOutcome>                    │
//! │  set_token(token, scheme)    clear_auth()                 │
//! └──────────────┬──────────────────────────────┬─────────────┘
//!                │                              │
//! ┌──────────────┴─────────────┐  ┌─────────────┴─────────────┐
//! │ Form │ Basic │ Bearer │ JWT│  │ Session                   │
//! │ strategy handlers          │─▶│ default headers, cookies  │
//! └────────────────────────────┘  └───────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Login strategies and token management
pub mod auth;

/// Shared HTTP session
pub mod http;

/// Login profiles
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::{AuthStrategy, Authenticator, Credentials, LoginOutcome};
pub use config::LoginConfig;
pub use error::{Error, Result};
pub use http::{Session, SessionConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
