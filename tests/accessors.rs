//! Exact request shapes produced by the accessors, checked through a
//! recording transport so no network is involved.

use async_trait::async_trait;
use http::{HeaderMap, Method, StatusCode};
use std::sync::{Arc, Mutex};
use trello_api::{
    Client, Error, MemberType, Params, PreparedRequest, RawResponse, Transport,
    FORM_CONTENT_TYPE,
};

#[derive(Clone, Default)]
struct RecordingTransport {
    sent: Arc<Mutex<Vec<PreparedRequest>>>,
}

impl RecordingTransport {
    fn requests(&self) -> Vec<PreparedRequest> {
        self.sent.lock().unwrap().clone()
    }

    fn only_request(&self) -> PreparedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: &PreparedRequest) -> Result<RawResponse, Error> {
        self.sent.lock().unwrap().push(request.clone());
        Ok(RawResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: "{}".to_string(),
        })
    }
}

/// Fails every request the way a refused connection does.
struct RefusingTransport;

#[async_trait]
impl Transport for RefusingTransport {
    async fn send(&self, _request: &PreparedRequest) -> Result<RawResponse, Error> {
        Err(Error::transport(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "Connection refused (os error 111)",
        )))
    }
}

fn recording_client() -> (Client, RecordingTransport) {
    let transport = RecordingTransport::default();
    let client = Client::builder()
        .credentials("K", "T")
        .transport(transport.clone())
        .build()
        .unwrap();
    (client, transport)
}

type Json = serde_json::Value;

#[tokio::test]
async fn test_members_request_shape() {
    let (client, transport) = recording_client();

    client
        .organizations()
        .members::<Json>("abc123", Params::new())
        .await
        .unwrap();

    let request = transport.only_request();
    assert_eq!(request.method, Method::GET);
    assert_eq!(
        request.url.as_str(),
        "https://api.trello.com/1/organizations/abc123/memberships?member=true&key=K&token=T"
    );
    assert_eq!(request.body, None);
}

#[tokio::test]
async fn test_invite_request_shape() {
    let (client, transport) = recording_client();

    client
        .organizations()
        .invite::<Json>("abc123", "a@x.com", "A B", MemberType::Admin)
        .await
        .unwrap();

    let request = transport.only_request();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(
        request.url.as_str(),
        "https://api.trello.com/1/organizations/abc123/members?key=K&token=T"
    );
    assert_eq!(
        request.body.as_deref(),
        Some(r#"{"email":"a@x.com","fullName":"A B","type":"admin"}"#)
    );
    assert_eq!(request.header("content-type"), Some(FORM_CONTENT_TYPE));
}

#[tokio::test]
async fn test_invite_with_parsed_type() {
    let (client, transport) = recording_client();

    let member_type: MemberType = "normal".parse().unwrap();
    client
        .organizations()
        .invite::<Json>("abc123", "a@x.com", "A B", member_type)
        .await
        .unwrap();

    assert!(transport
        .only_request()
        .body
        .unwrap()
        .contains(r#""type":"normal""#));
}

#[tokio::test]
async fn test_empty_params_only_carry_credentials() {
    let (client, transport) = recording_client();

    client
        .organizations()
        .show::<Json>("abc123", Params::new())
        .await
        .unwrap();

    let request = transport.only_request();
    assert_eq!(request.target(), "/1/organizations/abc123?key=K&token=T");
    let keys: Vec<String> = request.url.query_pairs().map(|(k, _)| k.into_owned()).collect();
    assert_eq!(keys, vec!["key", "token"]);
}

#[tokio::test]
async fn test_get_params_all_reach_the_query() {
    let (client, transport) = recording_client();

    let params = Params::new()
        .with("fields", "name,url")
        .with("filter", "open")
        .with("members", "all");
    client
        .organizations()
        .boards::<Json>("abc123", params.clone())
        .await
        .unwrap();

    let request = transport.only_request();
    assert_eq!(request.url.path(), "/1/organizations/abc123/boards");
    let pairs: Vec<(String, String)> = request.url.query_pairs().into_owned().collect();
    for (key, value) in params.iter() {
        assert!(pairs.contains(&(key.to_string(), value.to_string())), "missing {}", key);
    }
    assert!(pairs.contains(&("key".to_string(), "K".to_string())));
    assert!(pairs.contains(&("token".to_string(), "T".to_string())));
}

#[tokio::test]
async fn test_show_is_idempotent() {
    let (client, transport) = recording_client();

    for _ in 0..2 {
        client
            .organizations()
            .show::<Json>("abc123", Params::new())
            .await
            .unwrap();
    }

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], requests[1]);
}

#[tokio::test]
async fn test_ids_are_percent_encoded() {
    let (client, transport) = recording_client();

    client
        .members()
        .boards::<Json>("ada lovelace/1", Params::new())
        .await
        .unwrap();

    assert_eq!(
        transport.only_request().target(),
        "/1/members/ada%20lovelace%2F1/boards?key=K&token=T"
    );
}

#[tokio::test]
async fn test_board_and_member_paths() {
    let (client, transport) = recording_client();

    client.boards().show::<Json>("b1", Params::new()).await.unwrap();
    client.boards().lists::<Json>("b1", Params::new()).await.unwrap();
    client.boards().cards::<Json>("b1", Params::new()).await.unwrap();
    client.boards().members::<Json>("b1", Params::new()).await.unwrap();
    client.members().me::<Json>(Params::new()).await.unwrap();
    client
        .members()
        .organizations::<Json>("ada", Params::new())
        .await
        .unwrap();
    client
        .organizations()
        .field::<Json>("abc123", "displayName")
        .await
        .unwrap();

    let paths: Vec<String> = transport
        .requests()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(
        paths,
        vec![
            "/1/boards/b1",
            "/1/boards/b1/lists",
            "/1/boards/b1/cards",
            "/1/boards/b1/members",
            "/1/members/me",
            "/1/members/ada/organizations",
            "/1/organizations/abc123/displayName",
        ]
    );
}

#[tokio::test]
async fn test_unknown_field_is_rejected_locally() {
    let (client, transport) = recording_client();

    let err = client
        .organizations()
        .field::<Json>("abc123", "password")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidValue { field: "field", .. }));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_unsigned_client_sends_no_credentials() {
    let transport = RecordingTransport::default();
    let client = Client::builder()
        .transport(transport.clone())
        .build()
        .unwrap();

    client.boards().show::<Json>("b1", Params::new()).await.unwrap();

    assert_eq!(transport.only_request().url.query(), None);
}

#[tokio::test]
async fn test_login_pair_signs_as_key_and_token() {
    let transport = RecordingTransport::default();
    let client = Client::builder()
        .login("legacy-login", "legacy-password")
        .transport(transport.clone())
        .build()
        .unwrap();

    client.members().me::<Json>(Params::new()).await.unwrap();

    assert_eq!(
        transport.only_request().url.query(),
        Some("key=legacy-login&token=legacy-password")
    );
}

#[tokio::test]
async fn test_refused_connection_surfaces_as_transport_error() {
    let client = Client::builder()
        .credentials("K", "T")
        .transport(RefusingTransport)
        .build()
        .unwrap();

    let err = client
        .organizations()
        .show::<Json>("abc123", Params::new())
        .await
        .unwrap_err();

    match err {
        Error::Transport { message, .. } => {
            assert_eq!(message, "Connection refused (os error 111)");
        }
        other => panic!("Expected Transport, got {:?}", other),
    }
    assert!(client.last_request().is_none());
}

#[tokio::test]
async fn test_dot_segment_ids_are_rejected_locally() {
    let (client, transport) = recording_client();

    let err = client
        .organizations()
        .boards::<Json>("..", Params::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidValue { field: "id", ref value } if value == ".."));

    let err = client
        .organizations()
        .show::<Json>(".", Params::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidValue { field: "id", .. }));

    assert!(client.boards().lists::<Json>("..", Params::new()).await.is_err());
    assert!(client.members().show::<Json>("..", Params::new()).await.is_err());
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_caller_credential_params_are_replaced() {
    let (client, transport) = recording_client();

    let params = Params::new()
        .with("key", "X")
        .with("token", "stale")
        .with("fields", "name");
    client.boards().show::<Json>("b1", params).await.unwrap();

    let request = transport.only_request();
    assert_eq!(request.target(), "/1/boards/b1?fields=name&key=K&token=T");
}

#[tokio::test]
async fn test_default_content_type_header_is_kept_on_writes() {
    let transport = RecordingTransport::default();
    let client = Client::builder()
        .credentials("K", "T")
        .default_header("Content-Type", "application/json")
        .unwrap()
        .transport(transport.clone())
        .build()
        .unwrap();

    client
        .organizations()
        .invite::<Json>("abc123", "a@x.com", "A B", MemberType::Normal)
        .await
        .unwrap();

    assert_eq!(
        transport.only_request().header("content-type"),
        Some("application/json")
    );
}
