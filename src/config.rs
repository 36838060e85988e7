//! Client configuration.

use crate::{auth::Credentials, Error, Result};
use http::{
    header::{ACCEPT, USER_AGENT},
    HeaderMap, HeaderValue,
};
use std::time::Duration;
use url::Url;

/// Root of the public Trello API.
pub const DEFAULT_BASE_URL: &str = "https://api.trello.com/";

/// API version segment placed before every path.
pub const DEFAULT_API_VERSION: &str = "1";

/// Request timeout used unless the builder sets another.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// `User-Agent` sent unless the builder sets another.
pub const DEFAULT_USER_AGENT: &str = concat!("trello-api-rs/", env!("CARGO_PKG_VERSION"));

/// Everything a [`Client`](crate::Client) needs to address and authenticate requests.
///
/// Built by [`ClientBuilder`](crate::ClientBuilder) and changed afterwards only
/// through the client's setters.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    api_version: String,
    timeout: Option<Duration>,
    user_agent: String,
    default_headers: HeaderMap,
    credentials: Option<Credentials>,
}

impl ClientConfig {
    pub(crate) fn new(
        base_url: Url,
        api_version: String,
        timeout: Option<Duration>,
        user_agent: String,
        credentials: Option<Credentials>,
    ) -> Result<Self> {
        let default_headers = standard_headers(&user_agent)?;
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            api_version,
            timeout,
            user_agent,
            default_headers,
            credentials,
        })
    }

    /// The URL every versioned path is joined onto. Always ends with `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Headers sent with every request unless the request overrides them.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub(crate) fn set_base_url(&mut self, url: Url) -> Result<()> {
        self.base_url = normalize_base_url(url)?;
        Ok(())
    }

    pub(crate) fn set_api_version(&mut self, version: String) {
        self.api_version = version;
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub(crate) fn set_credentials(&mut self, credentials: Option<Credentials>) {
        self.credentials = credentials;
    }

    pub(crate) fn default_headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.default_headers
    }

    /// Drops custom default headers, keeping only `Accept` and `User-Agent`.
    pub(crate) fn reset_headers(&mut self) -> Result<()> {
        self.default_headers = standard_headers(&self.user_agent)?;
        Ok(())
    }
}

#[cfg(test)]
impl ClientConfig {
    /// Trello defaults with no credentials.
    pub(crate) fn test_default() -> Self {
        Self::new(
            Url::parse(DEFAULT_BASE_URL).unwrap(),
            DEFAULT_API_VERSION.to_string(),
            Some(DEFAULT_TIMEOUT),
            DEFAULT_USER_AGENT.to_string(),
            None,
        )
        .unwrap()
    }
}

fn standard_headers(user_agent: &str) -> Result<HeaderMap> {
    let user_agent = HeaderValue::try_from(user_agent)
        .map_err(|e| Error::ConfigurationError(format!("Invalid user agent: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, user_agent);
    Ok(headers)
}

/// Rejects URLs that cannot take a path and makes sure the path ends with `/`,
/// so joining `1/...` appends rather than replaces the last segment.
fn normalize_base_url(mut url: Url) -> Result<Url> {
    if url.cannot_be_a_base() {
        return Err(Error::ConfigurationError(format!(
            "Base URL cannot carry a path: {}",
            url
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
