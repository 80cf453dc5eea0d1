//! REST API client module for the Arbox box-management service.
//!
//! This module provides the `ArboxClient` for communicating with the
//! Arbox API to fetch leads, members, schedules, tasks and reports.
//!
//! Requests carry the box id and a session token in custom headers; the
//! token is obtained by posting the account email and password to the
//! session endpoint.

pub mod client;
pub mod endpoints;
pub mod transport;

pub use client::{ArboxClient, DEFAULT_SALES_REPORT};
pub use endpoints::Endpoint;
pub use transport::{RequestDescriptor, Transport, DEMO_SENTINEL};
