use std::time::Duration;

use scrapi_core::{ApiCredentials, ClientConfig, ConfigOverrides, ScrapiClient, SearchOpts};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let username = std::env::var("SCRAPI_USERNAME")?;
    let password = std::env::var("SCRAPI_PASSWORD")?;
    let base_url = std::env::var("SCRAPI_BASE_URL")?;

    let client = ScrapiClient::new(
        &ApiCredentials::new(username, password),
        ClientConfig::new(base_url),
    )?;

    let opts = SearchOpts::default().with_limit(5).with_parse(true);
    let overrides = ConfigOverrides::default()
        .with_timeout(Duration::from_secs(90))
        .with_poll_interval(Duration::from_secs(3));

    println!("Submitting search job...");
    let results = client.search("bing_search", "rust async runtime", &opts, &overrides).await?;

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
