//! The HTTP layer underneath the client.
//!
//! [`Transport`] is the seam where the actual network exchange happens. The
//! default, [`ReqwestTransport`], wraps a pooled `reqwest::Client`; tests and
//! embedders can substitute their own.

use crate::{error::message_chain, request::PreparedRequest, Error, Result};
use async_trait::async_trait;
use http::{HeaderMap, StatusCode};

/// The raw outcome of one HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The response body as text.
    pub body: String,
}

/// Sends prepared requests over the wire.
///
/// Implementations report connection-level faults as [`Error::Transport`] and
/// requests they cannot send as [`Error::Protocol`]. They return every
/// response that arrives, whatever its status; status checking happens in
/// the client.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use trello_api::{Error, PreparedRequest, RawResponse, Transport};
///
/// struct Offline;
///
/// #[async_trait]
/// impl Transport for Offline {
///     async fn send(&self, _request: &PreparedRequest) -> Result<RawResponse, Error> {
///         Err(Error::transport("network unreachable"))
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one HTTP exchange.
    async fn send(&self, request: &PreparedRequest) -> Result<RawResponse>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a fresh connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        let http_client = reqwest::Client::builder().build().map_err(|e| {
            Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;
        Ok(Self { http_client })
    }

    /// Reuses an already configured `reqwest::Client`.
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &PreparedRequest) -> Result<RawResponse> {
        let mut builder = self
            .http_client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(translate)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(translate)?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// Maps a `reqwest` failure onto the two local fault kinds.
///
/// The URL is stripped first: it carries the credentials.
pub(crate) fn translate(err: reqwest::Error) -> Error {
    let err = err.without_url();
    if err.is_builder() {
        Error::Protocol {
            message: message_chain(&err),
            source: Some(Box::new(err)),
        }
    } else {
        Error::Transport {
            message: message_chain(&err),
            timed_out: err.is_timeout(),
            source: Box::new(err),
        }
    }
}

/// Raises [`Error::HttpError`] for non-2xx responses and passes the rest through.
pub(crate) fn error_for_status(response: RawResponse) -> Result<RawResponse> {
    let status = response.status;
    if status.is_success() {
        return Ok(response);
    }

    if status.is_client_error() {
        tracing::error!(
            status = status.as_u16(),
            response = %response.body,
            "Client error (4xx)"
        );
    } else if status.is_server_error() {
        tracing::warn!(
            status = status.as_u16(),
            response = %response.body,
            "Server error (5xx)"
        );
    }

    Err(Error::HttpError {
        status,
        raw_response: response.body,
        headers: response.headers,
    })
}
