//! Session lifecycle with lazy reconnection.
//!
//! The API has no refresh tokens and no expiry hints, so the only way to
//! learn that a token died is a failed authenticated call. `SessionManager`
//! probes a cheap endpoint before each operation and logs in again only
//! when the probe fails.
//!
//! Logins are single-flight: concurrent callers that all see a dead token
//! queue on one lock, the first performs the login and the rest notice the
//! bumped attempt counter and take its outcome, success or failure.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::endpoints::Endpoint;
use crate::api::transport::{RequestDescriptor, Transport};
use crate::error::{AuthenticationError, TransportError};

/// Result of probing the current token.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// The server accepted the token.
    Valid,
    /// The server answered 401/403: the token was refused.
    Rejected { status: StatusCode },
    /// Anything else went wrong (network, 5xx, bad body).
    Failed(TransportError),
}

impl ProbeOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ProbeOutcome::Valid)
    }

    fn from_error(error: TransportError) -> Self {
        match error.status() {
            Some(status) if error.is_auth_rejection() => ProbeOutcome::Rejected { status },
            _ => ProbeOutcome::Failed(error),
        }
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

/// Outcome of the most recent login attempt.
#[derive(Debug, Default)]
struct LoginState {
    successes: u64,
    last_failure: Option<String>,
}

pub struct SessionManager {
    transport: Arc<Transport>,
    /// Finished login attempts, successful or not. Only written under `login`.
    attempts: AtomicU64,
    /// Held while a login is in flight.
    login: Mutex<LoginState>,
}

impl SessionManager {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self {
            transport,
            attempts: AtomicU64::new(0),
            login: Mutex::new(LoginState::default()),
        }
    }

    /// Current token value (possibly empty)
    pub fn token(&self) -> String {
        self.transport.credential().get()
    }

    /// Number of successful logins performed by this manager.
    pub async fn login_count(&self) -> u64 {
        self.login.lock().await.successes
    }

    /// Probe the session with a lightweight authenticated request.
    pub async fn probe(&self) -> ProbeOutcome {
        let endpoint = Endpoint::Notifications { page: 1 };
        let url = self.transport.url(&endpoint.path(self.transport.config().box_id));

        match self
            .transport
            .request(RequestDescriptor::new(endpoint.method(), url))
            .await
        {
            Ok(_) => ProbeOutcome::Valid,
            Err(e) => ProbeOutcome::from_error(e),
        }
    }

    /// True when the current token is accepted. Never fails.
    pub async fn is_connected(&self) -> bool {
        let outcome = self.probe().await;
        debug!(connected = outcome.is_valid(), "Checked session");
        outcome.is_valid()
    }

    /// Make sure the shared credential is usable, logging in again if not.
    ///
    /// A failed login leaves the credential empty. Callers that were already
    /// waiting on that login get its failure; the next call starts over.
    pub async fn ensure_connection(&self) -> Result<(), AuthenticationError> {
        let seen = self.attempts.load(Ordering::Acquire);

        match self.probe().await {
            ProbeOutcome::Valid => return Ok(()),
            ProbeOutcome::Rejected { status } => {
                debug!(status = %status, "Session token rejected, logging in");
            }
            ProbeOutcome::Failed(e) => {
                warn!(error = %e, "Session probe failed, logging in again");
            }
        }

        let mut state = self.login.lock().await;
        if self.attempts.load(Ordering::Acquire) != seen {
            return match &state.last_failure {
                None => {
                    debug!("Another caller refreshed the session");
                    Ok(())
                }
                Some(reason) => {
                    debug!(error = %reason, "Another caller's login failed");
                    Err(AuthenticationError::Concurrent(reason.clone()))
                }
            };
        }

        let result = match self.login().await {
            Ok(token) => {
                self.transport.credential().set(token);
                state.successes += 1;
                state.last_failure = None;
                info!(box_id = self.transport.config().box_id, "Obtained new session token");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                state.last_failure = Some(e.to_string());
                Err(e)
            }
        };
        // Published only once the credential and outcome are in place
        self.attempts.fetch_add(1, Ordering::Release);
        result
    }

    /// Clear the current token and request a new one with email/password.
    async fn login(&self) -> Result<String, AuthenticationError> {
        // A token that failed the probe must not survive a failed login
        self.transport.credential().clear();

        let config = self.transport.config();
        let endpoint = Endpoint::Login {
            email: config.email.clone(),
        };
        let request = RequestDescriptor::new(endpoint.method(), self.transport.url(&endpoint.path(config.box_id)))
            .json(&LoginRequest {
                email: &config.email,
                password: &config.password,
            })
            .map_err(AuthenticationError::Login)?;

        let body: Value = self
            .transport
            .request(request)
            .await
            .map_err(AuthenticationError::Login)?;

        let response: LoginResponse =
            serde_json::from_value(body).map_err(|_| AuthenticationError::MissingToken)?;
        match response.token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(AuthenticationError::MissingToken),
        }
    }
}
