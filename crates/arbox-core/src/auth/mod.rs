//! Session management for the Arbox API.
//!
//! This module provides:
//! - `Credential`: the shared cell holding the current session token
//! - `SessionManager`: probe-then-relogin lifecycle around that cell
//!
//! Tokens are never persisted; a fresh process starts from whatever token
//! the caller supplies (possibly none) and logs in when the probe fails.

pub mod credential;
pub mod session;

pub use credential::Credential;
pub use session::{ProbeOutcome, SessionManager};
