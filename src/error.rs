//! Error types for Trello API calls.
//!
//! Transport faults are split in two: [`Error::Transport`] for network-level
//! failures worth retrying, and [`Error::Protocol`] for requests the transport
//! refused to send at all. HTTP error statuses are passed through untouched as
//! [`Error::HttpError`].

use http::{HeaderMap, StatusCode};

/// Boxed error used as the source of translated transport faults.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for Trello API calls.
///
/// # Examples
///
/// ```no_run
/// use trello_api::{Client, Error, Params};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder().credentials("key", "token").build()?;
///
/// match client.organizations().show::<serde_json::Value>("acme", Params::new()).await {
///     Ok(org) => println!("Found: {}", org.data["displayName"]),
///     Err(Error::HttpError { status, raw_response, .. }) => {
///         eprintln!("Trello answered {}: {}", status, raw_response);
///     }
///     Err(e) if e.is_retryable() => eprintln!("Network trouble, try again: {}", e),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The connection or transport failed (DNS lookup, connection refused,
    /// timeout, broken body stream).
    ///
    /// `message` holds the full message chain of the original fault.
    #[error("Transport error: {message}")]
    Transport {
        /// The original fault's message chain
        message: String,
        /// Whether the fault was the configured timeout elapsing
        timed_out: bool,
        /// The original fault
        #[source]
        source: BoxError,
    },

    /// The request was handed to the transport incorrectly, for example with
    /// an unsupported URL scheme or an unbuildable request.
    ///
    /// Retrying will not help; the calling code needs fixing.
    #[error("Protocol error: {message}")]
    Protocol {
        /// The original fault's message
        message: String,
        /// The original fault, when there is one
        #[source]
        source: Option<BoxError>,
    },

    /// Trello returned a non-2xx HTTP status code.
    ///
    /// The status is not reinterpreted: a missing organization is simply a 404.
    #[error("HTTP error {status}: {raw_response}")]
    HttpError {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
        /// The response headers
        headers: HeaderMap,
    },

    /// Failed to deserialize the response body into the expected type.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// Failed to serialize the request body.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// An argument was outside the set of values Trello accepts.
    ///
    /// Raised before any request is built.
    #[error("Invalid value {value:?} for {field}")]
    InvalidValue {
        /// The argument name
        field: &'static str,
        /// The rejected value
        value: String,
    },

    /// Invalid configuration was provided, such as a bad header value.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Wraps a network-level fault raised by a [`Transport`](crate::Transport).
    pub fn transport(source: impl Into<BoxError>) -> Self {
        let source = source.into();
        Error::Transport {
            message: message_chain(&*source),
            timed_out: false,
            source,
        }
    }

    /// Reports a request the transport could not accept.
    pub fn protocol(message: impl Into<String>) -> Self {
        Error::Protocol {
            message: message.into(),
            source: None,
        }
    }

    /// Returns `true` if repeating the call could succeed.
    ///
    /// Transport faults, 5xx and 429 responses are retryable. Nothing in this
    /// crate retries on its own; this is a hint for the caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use trello_api::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::HttpError {
    ///     status: StatusCode::BAD_GATEWAY,
    ///     raw_response: "upstream".to_string(),
    ///     headers: http::HeaderMap::new(),
    /// };
    /// assert!(err.is_retryable());
    ///
    /// let err = Error::protocol("URL scheme is not allowed");
    /// assert!(!err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport { .. } => true,
            Error::HttpError { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Error::Protocol { .. }
            | Error::DeserializationFailed { .. }
            | Error::SerializationFailed(_)
            | Error::InvalidValue { .. }
            | Error::ConfigurationError(_)
            | Error::InvalidUrl(_) => false,
        }
    }

    /// Returns `true` if the request hit the configured timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport { timed_out: true, .. })
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpError { status, .. } => Some(*status),
            Error::DeserializationFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::HttpError { raw_response, .. } => Some(raw_response),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

/// Joins an error and its sources into one `a: b: c` message.
pub(crate) fn message_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        let cause_message = cause.to_string();
        if !message.ends_with(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        current = cause.source();
    }
    message
}

/// A specialized `Result` type for Trello API calls.
pub type Result<T> = std::result::Result<T, Error>;
