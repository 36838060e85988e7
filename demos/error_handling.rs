//! Example demonstrating how failures surface.
//!
//! This example shows how to:
//! - Tell transport faults from protocol misuse
//! - Read the status and body of HTTP errors
//! - Reject invalid arguments before anything is sent
//!
//! Run with: `TRELLO_KEY=... TRELLO_TOKEN=... cargo run --example error_handling`

use trello_api::{Client, Error, MemberType, Params};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("trello_api=info")
        .init();

    let key = std::env::var("TRELLO_KEY").unwrap_or_default();
    let token = std::env::var("TRELLO_TOKEN").unwrap_or_default();
    let client = Client::with_credentials(key, token)?;

    println!("=== Example 1: HTTP errors pass through ===");
    match client
        .organizations()
        .show::<serde_json::Value>("this-organization-does-not-exist", Params::new())
        .await
    {
        Ok(response) => println!("Unexpected success: {}", response.data),
        Err(Error::HttpError {
            status,
            raw_response,
            headers,
        }) => {
            println!("HTTP Error!");
            println!("  Status: {}", status);
            println!("  Is client error (4xx): {}", status.is_client_error());
            println!("  Raw response: {}", raw_response);
            println!("  Content-Type: {:?}", headers.get("content-type"));
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 2: Transport faults ===");
    let unreachable = Client::builder()
        .base_url("http://127.0.0.1:1")?
        .credentials("K", "T")
        .build()?;

    match unreachable.boards().show::<serde_json::Value>("b1", Params::new()).await {
        Err(e @ Error::Transport { .. }) => {
            println!("Transport error: {}", e);
            println!("  Worth retrying: {}", e.is_retryable());
        }
        other => println!("Unexpected: {:?}", other.map(|r| r.data)),
    }
    println!();

    println!("=== Example 3: Protocol errors ===");
    let misconfigured = Client::builder()
        .base_url("ftp://api.trello.com/")?
        .build()?;

    match misconfigured.members().me::<serde_json::Value>(Params::new()).await {
        Err(e @ Error::Protocol { .. }) => {
            println!("Protocol error: {}", e);
            println!("  Worth retrying: {}", e.is_retryable());
        }
        other => println!("Unexpected: {:?}", other.map(|r| r.data)),
    }
    println!();

    println!("=== Example 4: Invalid member type ===");
    match "owner".parse::<MemberType>() {
        Ok(member_type) => {
            client
                .organizations()
                .invite::<serde_json::Value>("acme", "ada@example.com", "Ada Lovelace", member_type)
                .await?;
        }
        Err(e) => println!("Rejected before sending: {}", e),
    }

    Ok(())
}
