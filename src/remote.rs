//! Download license documents so unknown URLs can be classified by text.

use std::time::Duration;

use anyhow::Result;
use reqwest::Client;

const USER_AGENT: &str = concat!("license-matchr/", env!("CARGO_PKG_VERSION"));

/// HTTP client used for all license downloads.
pub fn client() -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(10))
        .user_agent(USER_AGENT)
        .build()?)
}

/// Only plain `http`/`https` URLs are fetched.
pub fn is_fetchable(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Fetch the body of a license URL.
///
/// Returns `Ok(None)` when the server answers with a non-success status and
/// `Err` on network failures.
pub async fn fetch_text(client: &Client, url: &str) -> Result<Option<String>> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Ok(None);
    }

    Ok(Some(response.text().await?))
}
