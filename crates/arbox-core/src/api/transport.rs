//! Single-request HTTP transport.
//!
//! `Transport` sends exactly one request, attaches the headers the Arbox API
//! expects (including the current session token read from the shared
//! [`Credential`] cell) and returns the decoded JSON body. It never retries
//! and never looks at status codes beyond success/failure.

use std::sync::Arc;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::auth::Credential;
use crate::config::{ClientOptions, ConnectionConfig};
use crate::error::TransportError;

/// Body returned for every request while demo mode is on.
pub const DEMO_SENTINEL: &str = "demo data";

const ACCEPT: &str = "application/json, text/plain, */*";
const CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Header carrying the box id
const BOX_HEADER: HeaderName = HeaderName::from_static("boxfk");

/// Header carrying the session token
const TOKEN_HEADER: HeaderName = HeaderName::from_static("accesstoken");

/// One outgoing request: url, method and optional JSON body.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub url: String,
    pub method: Method,
    pub body: Option<Value>,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Attach a JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, TransportError> {
        self.body = Some(serde_json::to_value(body).map_err(TransportError::Encode)?);
        Ok(self)
    }

    fn carries_payload(&self) -> bool {
        self.method != Method::GET && self.method != Method::HEAD
    }
}

/// HTTP transport shared by the session manager and the client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct Transport {
    client: Client,
    config: Arc<ConnectionConfig>,
    options: ClientOptions,
    credential: Credential,
}

impl Transport {
    pub fn new(
        config: Arc<ConnectionConfig>,
        options: ClientOptions,
        credential: Credential,
    ) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(options.timeout).build()?;

        Ok(Self {
            client,
            config,
            options,
            credential,
        })
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Absolute URL for a path relative to the API base.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.options.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn headers(&self) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(BOX_HEADER, HeaderValue::from(self.config.box_id));
        headers.insert(
            TOKEN_HEADER,
            HeaderValue::from_str(&self.credential.get())
                .map_err(|_| TransportError::InvalidHeader { name: "accesstoken" })?,
        );
        // Box names are free text (often Hebrew), so pass the raw bytes through
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_bytes(self.config.box_name.as_bytes())
                .map_err(|_| TransportError::InvalidHeader { name: "user-agent" })?,
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE));
        headers.insert(
            header::HOST,
            HeaderValue::from_str(&self.options.host)
                .map_err(|_| TransportError::InvalidHeader { name: "host" })?,
        );
        headers.insert(
            header::ORIGIN,
            HeaderValue::from_str(&self.options.origin)
                .map_err(|_| TransportError::InvalidHeader { name: "origin" })?,
        );
        Ok(headers)
    }

    /// Send one request and return the decoded JSON body.
    ///
    /// Payload-carrying methods without a body send `{}`. An empty success
    /// body decodes to `null`.
    pub async fn request(&self, request: RequestDescriptor) -> Result<Value, TransportError> {
        let body = match request.body {
            Some(ref body) => Some(body.clone()),
            None if request.carries_payload() => Some(Value::Object(Default::default())),
            None => None,
        };

        if self.options.debug {
            debug!(method = %request.method, url = %request.url, body = ?redacted(body.as_ref()), "Server request");
        }

        if self.options.demo_mode {
            debug!(url = %request.url, "Demo mode, skipping a real server call");
            return Ok(Value::String(DEMO_SENTINEL.to_string()));
        }

        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(self.headers()?);
        if let Some(body) = body {
            builder = builder.body(serde_json::to_vec(&body).map_err(TransportError::Encode)?);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::from_status(status, &body));
        }

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(TransportError::Decode)
    }

    /// Send one request and decode the body into `T`.
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
    ) -> Result<T, TransportError> {
        let value = self.request(request).await?;
        serde_json::from_value(value).map_err(TransportError::Decode)
    }
}

/// Copy of a request body safe for logging.
fn redacted(body: Option<&Value>) -> Option<Value> {
    let mut body = body.cloned()?;
    if let Some(password) = body.get_mut("password") {
        *password = Value::String("<redacted>".to_string());
    }
    Some(body)
}
