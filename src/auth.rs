//! Trello credentials and query-string signing.

use crate::request::PreparedRequest;
use std::fmt;

/// The application key and user token sent with every request.
///
/// Trello authenticates through two query parameters, `key` and `token`.
/// Once credentials are configured on a client, both are appended to the
/// query string of every outgoing request regardless of method.
///
/// The token never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    key: String,
    token: String,
}

impl Credentials {
    /// Creates credentials from an application key and a user token.
    pub fn new(key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            token: token.into(),
        }
    }

    /// Creates credentials from a login/password pair.
    ///
    /// Older integrations hand over the pair under these names; Trello still
    /// reads them as `key` and `token`.
    pub fn from_login(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(login, password)
    }

    /// The application key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Appends `key` and `token` to the request's query string.
    ///
    /// Uses `?` when the URL has no query yet and `&` otherwise. Any `key` or
    /// `token` pairs already in the query are dropped first, so the signed
    /// URL carries exactly one of each.
    pub fn sign(&self, request: &mut PreparedRequest) {
        let url = &mut request.url;
        if url.query_pairs().any(|(name, _)| is_credential(&name)) {
            let kept: Vec<(String, String)> = url
                .query_pairs()
                .filter(|(name, _)| !is_credential(name))
                .map(|(name, value)| (name.into_owned(), value.into_owned()))
                .collect();
            url.set_query(None);
            if !kept.is_empty() {
                url.query_pairs_mut().extend_pairs(kept);
            }
        }
        url.query_pairs_mut()
            .append_pair("key", &self.key)
            .append_pair("token", &self.token);
    }
}

fn is_credential(name: &str) -> bool {
    name == "key" || name == "token"
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, Method};
    use url::Url;

    fn request(url: &str) -> PreparedRequest {
        PreparedRequest {
            method: Method::GET,
            url: Url::parse(url).unwrap(),
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    #[test]
    fn sign_starts_a_query_when_none_exists() {
        let mut req = request("https://api.trello.com/1/boards/b1");
        Credentials::new("K", "T").sign(&mut req);
        assert_eq!(req.url.as_str(), "https://api.trello.com/1/boards/b1?key=K&token=T");
    }

    #[test]
    fn sign_extends_an_existing_query() {
        let mut req = request("https://api.trello.com/1/boards/b1?fields=name");
        Credentials::new("K", "T").sign(&mut req);
        assert_eq!(
            req.url.as_str(),
            "https://api.trello.com/1/boards/b1?fields=name&key=K&token=T"
        );
    }

    #[test]
    fn sign_replaces_credentials_already_in_the_query() {
        let mut req =
            request("https://api.trello.com/1/boards/b1?key=X&fields=name&token=stale");
        Credentials::new("K", "T").sign(&mut req);
        assert_eq!(
            req.url.as_str(),
            "https://api.trello.com/1/boards/b1?fields=name&key=K&token=T"
        );

        let mut req = request("https://api.trello.com/1/boards/b1?token=stale");
        Credentials::new("K", "T").sign(&mut req);
        assert_eq!(req.url.as_str(), "https://api.trello.com/1/boards/b1?key=K&token=T");
    }

    #[test]
    fn debug_hides_token() {
        let creds = Credentials::from_login("app-key", "s3cret-token");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("app-key"));
        assert!(!printed.contains("s3cret-token"));
    }
}
