//! Typed async client for the Arbox fitness-box management API.
//!
//! ```no_run
//! # async fn run() -> arbox_core::Result<()> {
//! use arbox_core::{ArboxClient, ClientOptions, ConnectionConfig, DateRange};
//!
//! let config = ConnectionConfig::from_env()?;
//! let client = ArboxClient::new(config, ClientOptions::default())?;
//! let leads = client.get_open_leads().await?;
//! let tasks = client.get_all_tasks(DateRange::this_week()).await?;
//! println!("{} open leads, {} tasks this week", leads.len(), tasks.all_tasks.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;

pub use api::{ArboxClient, Endpoint, RequestDescriptor, DEMO_SENTINEL};
pub use auth::{Credential, ProbeOutcome, SessionManager};
pub use config::{ClientOptions, ConnectionConfig};
pub use error::{AuthenticationError, ConfigError, Error, Result, TransportError};
pub use models::DateRange;
