//! Fetch a JSend endpoint and print whichever shape comes back.
//!
//! Run against any JSend-speaking server:
//! ```bash
//! cargo run --example fetch_status -- http://localhost:8080/status
//! ```

use jsend_client::prelude::*;
use serde_json::Value;

#[tokio::main]
async fn main() -> JsendClientResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter("jsend_client=debug")
        .init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:8080/status".to_string());

    let client = JsendClient::builder().build()?;
    let response = client.get::<Value>(&url).await?;

    println!("http status: {}", response.http_status());
    match response.error() {
        None if response.has_data() => println!("data: {}", response.data().unwrap()),
        None => println!("success with no data"),
        Some(error) => println!("server reported {}", error),
    }

    Ok(())
}
