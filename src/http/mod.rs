//! HTTP session module
//!
//! Provides the shared client session that authentication strategies act on.
//!
//! # Features
//!
//! - **Default Headers**: A case-insensitive, single-valued header map applied
//!   to every request and mutable at runtime
//! - **Cookie Jar**: Cookies set by login responses persist across requests
//! - **Per-request Overrides**: Request headers and Basic credentials replace
//!   same-named defaults instead of appending a second value

mod cookies;
mod session;

pub use cookies::parse_cookie_string;
pub use session::{
    RequestBody, RequestConfig, Session, SessionConfig, SessionConfigBuilder, AUTHORIZATION,
};

#[cfg(test)]
mod tests;
