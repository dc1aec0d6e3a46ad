// src/fetch/mod.rs

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{EtlError, Result};

/// Identifies us to the source site; Wikipedia throttles anonymous clients.
pub const USER_AGENT: &str = "largest-banks-etl/0.1 (learning project; contact: none)";

/// Build the HTTP client used for page fetches.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|source| EtlError::Fetch {
            url: String::new(),
            source,
        })
}

/// GET `url` and return the body as text. A transport error, a timeout or a
/// non-success status all fail with `EtlError::Fetch`. No retries.
#[instrument(level = "info", skip(client))]
pub async fn fetch_html(client: &Client, url: &str, timeout: Duration) -> Result<String> {
    let parsed = Url::parse(url).map_err(|source| EtlError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    let fetch_err = |source| EtlError::Fetch {
        url: url.to_string(),
        source,
    };

    let body = client
        .get(parsed)
        .timeout(timeout)
        .send()
        .await
        .map_err(fetch_err)?
        .error_for_status()
        .map_err(fetch_err)?
        .text()
        .await
        .map_err(fetch_err)?;

    debug!(bytes = body.len(), "fetched page");
    Ok(body)
}
