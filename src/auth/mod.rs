//! Authentication module
//!
//! Supports: Form, Basic, Bearer and JWT login strategies
//!
//! The `Authenticator` dispatches a login to one strategy and, when the
//! server hands back a token, installs it as the shared session's
//! `Authorization` header. Tokens can also be set and cleared by hand.

mod authenticator;
mod types;

pub use authenticator::{extract_jsonpath, Authenticator, DEFAULT_TOKEN_PATH, MAX_ERROR_BODY};
pub use types::{
    AuthStrategy, AuthToken, Credentials, LoginOutcome, DEFAULT_SCHEME, JWT_SCHEME,
};
