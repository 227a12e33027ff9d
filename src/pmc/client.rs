// src/pmc/client.rs
use std::time::Duration;

use reqwest::header;

use crate::utils::error::FetchError;

// Publisher pages return 403 for default client user agents; present a
// realistic browser string instead.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/118.0.0.0 Safari/537.36";

const FETCH_TIMEOUT_SECS: u64 = 15;

// Courtesy throttle between articles, not a correctness mechanism.
const COURTESY_DELAY_SECS: u64 = 2;

/// Creates a reqwest client configured for article page downloads.
fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
}

/// Downloads one article page as raw HTML text.
pub async fn fetch_article(url: &str) -> Result<String, FetchError> {
    let client = build_client()?;

    tracing::info!("Downloading article from: {}", url);

    let response = client
        .get(url)
        .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*")
        .send()
        .await?; // Propagates reqwest::Error as FetchError::Network

    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        if status == reqwest::StatusCode::FORBIDDEN {
            tracing::warn!("Received 403 Forbidden - check User-Agent and request rate.");
            return Err(FetchError::Blocked);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::PageNotFound(url.to_string()));
        }
        return Err(FetchError::Http(status));
    }

    let body = response.text().await?;
    tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);

    Ok(body)
}

/// Fixed delay applied after each successfully processed article to bound
/// the request rate against the remote source.
pub async fn throttle() {
    tokio::time::sleep(Duration::from_secs(COURTESY_DELAY_SECS)).await;
}
