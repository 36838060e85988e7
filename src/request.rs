//! Request types and the request builder.
//!
//! An [`ApiRequest`] describes a call relative to the versioned API root.
//! The builder turns it into a [`PreparedRequest`]: an absolute URL with the
//! query string filled in, merged headers and a serialized body.

use crate::{config::ClientConfig, Error, Result};
use http::{header::CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Content type applied to POST, PUT and PATCH bodies unless overridden.
///
/// A `Content-Type` set on the request, or among the client's default
/// headers, takes precedence over this value.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Query parameters for a request.
///
/// Keys iterate in sorted order, so equal parameter sets always produce
/// identical URLs.
///
/// ```
/// use trello_api::Params;
///
/// let params = Params::new().with("fields", "name,url").with("filter", "open");
/// assert_eq!(params.get("filter"), Some("open"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value for `key`.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a parameter, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> Option<String> {
        self.0.insert(key.into(), value.to_string())
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for Params {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// A request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Structured data. Serialized as JSON text, or into the query string on GET.
    Json(Value),
    /// A payload sent verbatim.
    Raw(String),
}

impl Body {
    /// Captures any serializable value as a structured body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationFailed`] if the value cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Body::Json)
            .map_err(|e| Error::SerializationFailed(e.to_string()))
    }
}

/// A call to make, relative to the versioned API root.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// The HTTP method.
    pub method: Method,

    /// The path below the API version segment, e.g. `organizations/acme`.
    pub path: String,

    /// Query parameters, sent for every method.
    pub params: Params,

    /// Optional payload.
    pub body: Option<Body>,

    /// Headers layered over the client's defaults.
    pub headers: HeaderMap,
}

impl ApiRequest {
    /// Creates a request with no parameters, body or extra headers.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Params::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Adds a query parameter to the request.
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Replaces the query parameters.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Sets the payload.
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }
}

/// A fully addressed request, ready to hand to a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    /// The HTTP method.
    pub method: Method,

    /// Absolute target URL, query string included.
    pub url: Url,

    /// Default headers merged with the caller's.
    pub headers: HeaderMap,

    /// Serialized body. Always `None` for GET.
    pub body: Option<String>,

    /// Per-request timeout.
    pub timeout: Option<Duration>,
}

impl PreparedRequest {
    /// The URL path and query, e.g. `/1/boards/b1?key=K&token=T`.
    pub fn target(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        }
    }

    /// Returns a header value as text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

/// Builds the unsigned request for `request` under `config`.
pub(crate) fn build(config: &ClientConfig, request: &ApiRequest) -> Result<PreparedRequest> {
    let relative = format!(
        "{}/{}",
        config.api_version(),
        request.path.trim_start_matches('/')
    );
    let mut url = config.base_url().join(&relative)?;

    let mut query: Vec<(String, String)> = request
        .params
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let body = if request.method == Method::GET {
        // GET carries structured data in the query string instead of a body
        if let Some(Body::Json(Value::Object(map))) = &request.body {
            query.extend(map.iter().map(|(k, v)| (k.clone(), query_value(v))));
        }
        None
    } else {
        match &request.body {
            Some(Body::Json(value)) => Some(
                serde_json::to_string(value)
                    .map_err(|e| Error::SerializationFailed(e.to_string()))?,
            ),
            Some(Body::Raw(raw)) => Some(raw.clone()),
            None => None,
        }
    };

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &query {
            pairs.append_pair(key, value);
        }
    }

    // A caller header replaces every default value under that name
    let mut headers = config.default_headers().clone();
    for name in request.headers.keys() {
        headers.remove(name);
    }
    for (name, value) in &request.headers {
        headers.append(name.clone(), value.clone());
    }
    if sends_form_by_default(&request.method) && !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
    }

    Ok(PreparedRequest {
        method: request.method.clone(),
        url,
        headers,
        body,
        timeout: config.timeout(),
    })
}

fn sends_form_by_default(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}

/// Renders a JSON value as a query string value.
fn query_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) if items.iter().all(|v| !v.is_array() && !v.is_object()) => items
            .iter()
            .map(query_value)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}
