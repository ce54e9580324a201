pub mod fetcher;
pub mod web;

pub use fetcher::{HttpClient, HttpRequest, HttpResponse};

use crate::error::ScrapeError;
use crate::target::ScrapeTarget;
use std::time::Duration;

/// Fetch the raw page bytes for a validated target.
///
/// One attempt only; any transport failure or non-2xx status becomes
/// [`ScrapeError::Fetch`].
pub async fn fetch_page<C: HttpClient>(
    client: &C,
    target: &ScrapeTarget,
    user_agent: &str,
    timeout: Duration,
) -> Result<Vec<u8>, ScrapeError> {
    let request = HttpRequest {
        url: target.url().clone(),
        user_agent: user_agent.to_string(),
        timeout: Some(timeout),
    };

    let fetch_error = |detail: String| ScrapeError::Fetch {
        url: target.url().to_string(),
        detail,
    };

    let response = client
        .get(&request)
        .await
        .map_err(|e| fetch_error(e.to_string()))?;

    if !response.is_success() {
        return Err(fetch_error(format!("HTTP status {}", response.status_line())));
    }

    ::log::debug!(
        "Fetched {} bytes from {}",
        response.body.len(),
        target.url()
    );
    Ok(response.body)
}
