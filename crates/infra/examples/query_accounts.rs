//! Example: authenticate and run a SOQL query
//!
//! Reads credentials from `SFCLIENT_*` environment variables (or
//! `sfclient.toml` / `sfclient.json`), then lists a few accounts.
//!
//! ```bash
//! export SFCLIENT_CLIENT_ID=... SFCLIENT_CLIENT_SECRET=...
//! export SFCLIENT_USERNAME=... SFCLIENT_PASSWORD=...
//! RUST_LOG=sfclient_infra=debug cargo run --example query_accounts
//! ```

use sfclient_common::observability::{init_tracing, LoggingConfig};
use sfclient_infra::{config, SalesforceClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(&LoggingConfig::default());

    let client = SalesforceClient::new(config::load()?)?;

    let page =
        client.query("SELECT Id, Name FROM Account ORDER BY CreatedDate DESC LIMIT 5").await?;

    println!("Instance: {}", client.instance_url().await.unwrap_or_default());
    println!("Token:    {}", client.token_state().await);
    for record in page["records"].as_array().into_iter().flatten() {
        let id = record["Id"].as_str().unwrap_or("-");
        let name = record["Name"].as_str().unwrap_or("-");
        println!("  {id}  {name}");
    }

    Ok(())
}
