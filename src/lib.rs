//! # trello-api - a thin, typed client for the Trello REST API
//!
//! Every call is a direct mapping onto a documented Trello endpoint: the
//! client prefixes the path with the API version, fills in the query string,
//! signs it with your `key` and `token`, sends it, and parses the JSON reply.
//!
//! ## Quick Start
//!
//! ```no_run
//! use trello_api::{Client, MemberType, Params};
//! use trello_api::api::{Board, Organization};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), trello_api::Error> {
//!     let client = Client::builder()
//!         .credentials("app-key", "user-token")
//!         .build()?;
//!
//!     let org = client
//!         .organizations()
//!         .show::<Organization>("acme", Params::new())
//!         .await?;
//!     println!("{} has {} boards", org.display_name, org.id_boards.len());
//!
//!     let boards = client
//!         .organizations()
//!         .boards::<Vec<Board>>("acme", Params::new().with("filter", "open"))
//!         .await?;
//!     for board in boards.data {
//!         println!("- {}", board.name);
//!     }
//!
//!     client
//!         .organizations()
//!         .invite::<serde_json::Value>("acme", "ada@example.com", "Ada Lovelace", MemberType::Admin)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Per-request signing** - `key` and `token` are appended to every query string
//! - **Typed accessors** - organizations, boards and members as method calls
//! - **Raw escape hatch** - [`Client::call`] with an [`ApiRequest`] for any other endpoint
//! - **Distinct failure kinds** - transport faults, protocol misuse and HTTP statuses stay apart
//! - **Pluggable transport** - `reqwest` by default, any [`Transport`] on request
//! - **Structured logging** - `tracing` events, with credentials kept out of them
//!
//! ## Error Handling
//!
//! ```no_run
//! use trello_api::{Client, Error, Params};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::with_credentials("key", "token")?;
//! match client.boards().show::<serde_json::Value>("b1", Params::new()).await {
//!     Ok(board) => println!("Board: {}", board.data["name"]),
//!     Err(Error::Transport { message, .. }) => eprintln!("Network trouble: {}", message),
//!     Err(Error::Protocol { message, .. }) => eprintln!("Bad request setup: {}", message),
//!     Err(Error::HttpError { status, raw_response, .. }) => {
//!         eprintln!("Trello answered {}: {}", status, raw_response);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
mod auth;
mod client;
pub mod config;
mod error;
mod request;
mod response;
mod transport;

pub use api::MemberType;
pub use auth::Credentials;
pub use client::{Client, ClientBuilder, Exchange};
pub use config::ClientConfig;
pub use error::{BoxError, Error, Result};
pub use request::{ApiRequest, Body, Params, PreparedRequest, FORM_CONTENT_TYPE};
pub use response::Response;
pub use transport::{RawResponse, ReqwestTransport, Transport};
