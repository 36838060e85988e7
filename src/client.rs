//! Trello client: request preparation, sending and response parsing.
//!
//! The [`Client`] type is the main entry point. Use [`ClientBuilder`] to
//! configure and create clients.

use crate::{
    api::{Boards, Members, Organizations},
    auth::Credentials,
    config::{ClientConfig, DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT},
    request::{self, ApiRequest, Body, Params, PreparedRequest},
    transport::{self, RawResponse, ReqwestTransport, Transport},
    Error, Response, Result,
};
use http::{HeaderName, HeaderValue, Method};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use url::Url;

/// An authenticated client for the Trello REST API.
///
/// Cloning is cheap: clones share the connection pool and the last-exchange
/// slot. Configuration is copied on write, so setters on one clone do not
/// affect the others.
///
/// # Examples
///
/// ```no_run
/// use trello_api::{Client, MemberType, Params};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), trello_api::Error> {
/// let client = Client::builder()
///     .credentials("app-key", "user-token")
///     .timeout(Duration::from_secs(30))
///     .build()?;
///
/// let boards = client
///     .organizations()
///     .boards::<Vec<serde_json::Value>>("acme", Params::new().with("filter", "open"))
///     .await?;
/// println!("{} open boards", boards.data.len());
///
/// client
///     .organizations()
///     .invite::<serde_json::Value>("acme", "ada@example.com", "Ada Lovelace", MemberType::Normal)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    last: Arc<Mutex<Option<Exchange>>>,
}

/// The most recent successful request/response pair.
///
/// Kept for debugging only. Concurrent calls overwrite it in no particular
/// order.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub request: PreparedRequest,
    pub response: RawResponse,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client for the public Trello API with the given key and token.
    pub fn with_credentials(key: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().credentials(key, token).build()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Organization endpoints.
    pub fn organizations(&self) -> Organizations<'_> {
        Organizations::new(self)
    }

    /// Board endpoints.
    pub fn boards(&self) -> Boards<'_> {
        Boards::new(self)
    }

    /// Member endpoints.
    pub fn members(&self) -> Members<'_> {
        Members::new(self)
    }

    /// Builds the fully addressed, signed request for `request`.
    ///
    /// Performs no I/O.
    ///
    /// # Examples
    ///
    /// ```
    /// use trello_api::{ApiRequest, Client};
    /// use http::Method;
    ///
    /// let client = Client::with_credentials("K", "T").unwrap();
    /// let prepared = client
    ///     .prepare(&ApiRequest::new(Method::GET, "boards/b1").with_param("fields", "name"))
    ///     .unwrap();
    ///
    /// assert_eq!(
    ///     prepared.url.as_str(),
    ///     "https://api.trello.com/1/boards/b1?fields=name&key=K&token=T"
    /// );
    /// ```
    pub fn prepare(&self, request: &ApiRequest) -> Result<PreparedRequest> {
        let mut prepared = request::build(&self.config, request)?;
        if let Some(credentials) = self.config.credentials() {
            credentials.sign(&mut prepared);
        }
        Ok(prepared)
    }

    /// Sends a prepared request.
    ///
    /// Non-2xx responses become [`Error::HttpError`]. On success the pair is
    /// kept as the last exchange and the response is returned as received.
    pub async fn send(&self, request: PreparedRequest) -> Result<RawResponse> {
        tracing::debug!(
            method = %request.method,
            path = %request.url.path(),
            "Executing HTTP request"
        );

        let response = self.transport.send(&request).await?;
        let response = transport::error_for_status(response)?;

        self.record(Exchange {
            request,
            response: response.clone(),
        });

        Ok(response)
    }

    /// Prepares, sends and parses a request.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use trello_api::{ApiRequest, Body, Client};
    /// use http::Method;
    /// use serde_json::json;
    ///
    /// # async fn example() -> Result<(), trello_api::Error> {
    /// let client = Client::with_credentials("K", "T")?;
    ///
    /// let request = ApiRequest::new(Method::POST, "cards")
    ///     .with_param("idList", "l1")
    ///     .with_body(Body::json(&json!({ "name": "Write release notes" }))?);
    ///
    /// let card = client.call::<serde_json::Value>(request).await?;
    /// println!("Created card {}", card.data["id"]);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<Res>(&self, request: ApiRequest) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let start_time = Instant::now();

        let result = match self.prepare(&request) {
            Ok(prepared) => match self.send(prepared).await {
                Ok(raw) => parse_response(raw, start_time.elapsed()),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            tracing::warn!(
                error = %e,
                method = %request.method,
                path = %request.path,
                "Request failed"
            );
        }

        result
    }

    /// Makes a GET request with the given query parameters.
    pub async fn get<Res>(&self, path: impl Into<String>, params: Params) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::GET, path).with_params(params);
        self.call(request).await
    }

    /// Makes a POST request with a structured body.
    pub async fn post<Req, Res>(&self, path: impl Into<String>, body: &Req) -> Result<Response<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::POST, path).with_body(Body::json(body)?);
        self.call(request).await
    }

    /// Makes a PUT request with a structured body.
    pub async fn put<Req, Res>(&self, path: impl Into<String>, body: &Req) -> Result<Response<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::PUT, path).with_body(Body::json(body)?);
        self.call(request).await
    }

    /// Makes a PATCH request with a structured body.
    pub async fn patch<Req, Res>(
        &self,
        path: impl Into<String>,
        body: &Req,
    ) -> Result<Response<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::PATCH, path).with_body(Body::json(body)?);
        self.call(request).await
    }

    /// Makes a DELETE request with the given query parameters.
    pub async fn delete<Res>(
        &self,
        path: impl Into<String>,
        params: Params,
    ) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::DELETE, path).with_params(params);
        self.call(request).await
    }

    /// The request of the last successful exchange.
    pub fn last_request(&self) -> Option<PreparedRequest> {
        self.last_exchange().map(|exchange| exchange.request)
    }

    /// The response of the last successful exchange.
    pub fn last_response(&self) -> Option<RawResponse> {
        self.last_exchange().map(|exchange| exchange.response)
    }

    pub fn last_exchange(&self) -> Option<Exchange> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, exchange: Exchange) {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(exchange);
    }

    /// Points the client at another API root.
    pub fn set_base_url(&mut self, url: impl AsRef<str>) -> Result<()> {
        let url = Url::parse(url.as_ref())?;
        Arc::make_mut(&mut self.config).set_base_url(url)
    }

    pub fn set_api_version(&mut self, version: impl Into<String>) {
        Arc::make_mut(&mut self.config).set_api_version(version.into());
    }

    /// Sets the per-request timeout; `None` leaves it to the transport.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        Arc::make_mut(&mut self.config).set_timeout(timeout);
    }

    /// Replaces the credentials; `None` sends requests unsigned.
    pub fn set_credentials(&mut self, credentials: Option<Credentials>) {
        Arc::make_mut(&mut self.config).set_credentials(credentials);
    }

    /// Sets a default header for every later request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn set_default_header(
        &mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<()> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        Arc::make_mut(&mut self.config)
            .default_headers_mut()
            .insert(name, value);
        Ok(())
    }

    /// Resets the default headers to `Accept` and `User-Agent`.
    pub fn clear_headers(&mut self) -> Result<()> {
        Arc::make_mut(&mut self.config).reset_headers()
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Parses the raw body into `Res`. An empty body reads as JSON `null`.
fn parse_response<Res>(raw: RawResponse, latency: Duration) -> Result<Response<Res>>
where
    Res: DeserializeOwned,
{
    tracing::info!(
        status = raw.status.as_u16(),
        latency_ms = latency.as_millis(),
        "Received HTTP response"
    );

    let text = if raw.body.trim().is_empty() {
        "null"
    } else {
        raw.body.as_str()
    };

    match serde_json::from_str::<Res>(text) {
        Ok(data) => Ok(Response::new(
            data,
            raw.body,
            raw.status,
            raw.headers,
            latency,
        )),
        Err(e) => {
            tracing::error!(
                error = %e,
                raw_response = %raw.body,
                "Failed to deserialize response"
            );

            Err(Error::DeserializationFailed {
                raw_response: raw.body,
                serde_error: e.to_string(),
                status: raw.status,
            })
        }
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let name = HeaderName::try_from(name)
        .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
    let value = HeaderValue::try_from(value)
        .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
    Ok((name, value))
}

/// Builder for configuring and creating a [`Client`].
///
/// Every setting has a default, so `Client::builder().build()` yields an
/// unauthenticated client for `https://api.trello.com/1/`.
///
/// # Examples
///
/// ```no_run
/// use trello_api::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), trello_api::Error> {
/// let client = ClientBuilder::new()
///     .credentials("app-key", "user-token")
///     .timeout(Duration::from_secs(30))
///     .user_agent("board-sync/2.1")
///     .default_header("X-Request-Source", "nightly-sync")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    api_version: String,
    timeout: Option<Duration>,
    user_agent: String,
    default_headers: Vec<(HeaderName, HeaderValue)>,
    credentials: Option<Credentials>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_headers: Vec::new(),
            credentials: None,
            transport: None,
        }
    }

    /// Sets the API root. Defaults to `https://api.trello.com/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the version segment placed before every path. Defaults to `1`.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Sets the request timeout. Defaults to 10 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Leaves timeouts entirely to the transport.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        self.default_headers
            .push(parse_header(name.as_ref(), value.as_ref())?);
        Ok(self)
    }

    /// Signs every request with an application key and user token.
    pub fn credentials(mut self, key: impl Into<String>, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(key, token));
        self
    }

    /// Signs every request with a login/password pair.
    pub fn login(mut self, login: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::from_login(login, password));
        self
    }

    /// Sends requests through a preconfigured `reqwest::Client`.
    pub fn http_client(mut self, http_client: reqwest::Client) -> Self {
        self.transport = Some(Arc::new(ReqwestTransport::with_client(http_client)));
        self
    }

    /// Sends requests through a custom [`Transport`].
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path, the user agent is
    /// not a valid header value, or the HTTP client cannot be created.
    pub fn build(self) -> Result<Client> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        let mut config = ClientConfig::new(
            base_url,
            self.api_version,
            self.timeout,
            self.user_agent,
            self.credentials,
        )?;
        for (name, value) in self.default_headers {
            config.default_headers_mut().insert(name, value);
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };

        Ok(Client {
            config: Arc::new(config),
            transport,
            last: Arc::new(Mutex::new(None)),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
