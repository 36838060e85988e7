//! Basic example: read an organization and its boards.
//!
//! This example shows how to:
//! - Create a client from a key and token
//! - Read an organization into a typed model
//! - List its boards with query parameters
//! - Inspect the last request for debugging
//!
//! Run with:
//! `TRELLO_KEY=... TRELLO_TOKEN=... cargo run --example basic_call -- <organization>`

use trello_api::api::{Board, Organization};
use trello_api::{Client, Error, Params};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("trello_api=debug,basic_call=info")
        .init();

    let key = std::env::var("TRELLO_KEY").unwrap_or_default();
    let token = std::env::var("TRELLO_TOKEN").unwrap_or_default();
    let organization = std::env::args().nth(1).unwrap_or_else(|| "trelloinc".to_string());

    let client = Client::with_credentials(key, token)?;

    println!("=== Organization ===");
    let org = client
        .organizations()
        .show::<Organization>(&organization, Params::new())
        .await?;

    println!("Name: {}", org.display_name);
    println!("Website: {}", org.website.as_deref().unwrap_or("-"));
    println!("Request latency: {:?}", org.latency);
    println!();

    println!("=== Open boards ===");
    let boards = client
        .organizations()
        .boards::<Vec<Board>>(
            &organization,
            Params::new().with("filter", "open").with("fields", "name,url"),
        )
        .await?;

    for board in &boards.data {
        println!("- {} ({})", board.name, board.url.as_deref().unwrap_or("no url"));
    }
    println!();

    println!("=== Last request ===");
    if let Some(request) = client.last_request() {
        println!("{} {}", request.method, request.url.path());
        println!("Headers: {:?}", request.headers);
    }

    Ok(())
}
