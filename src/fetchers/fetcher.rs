use crate::error::TransportError;
use std::time::Duration;
use url::Url;

/// A single GET request issued by the pipeline
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: Url,
    pub user_agent: String,
    pub timeout: Option<Duration>,
}

/// Status and raw body of a completed request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Status code with its canonical reason, e.g. `404 Not Found`
    pub fn status_line(&self) -> String {
        match reqwest::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
        {
            Some(reason) => format!("{} {}", self.status, reason),
            None => self.status.to_string(),
        }
    }
}

// Base trait for the transport used by every stage that touches the network
#[allow(async_fn_in_trait)]
pub trait HttpClient {
    /// Perform one GET. Non-2xx statuses are returned, not turned into errors.
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
