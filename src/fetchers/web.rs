use crate::error::TransportError;
use crate::fetchers::fetcher::{HttpClient, HttpRequest, HttpResponse};
use reqwest::Client;
use reqwest::header::USER_AGENT;

/// [`HttpClient`] backed by reqwest.
///
/// Idle connections are not kept, so separate invocations never share a
/// connection. Cookies are not stored and redirects follow reqwest's default
/// policy.
#[derive(Debug, Clone)]
pub struct WebClient {
    client: Client,
}

impl WebClient {
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder().pool_max_idle_per_host(0).build()?;
        Ok(Self { client })
    }
}

impl HttpClient for WebClient {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        ::log::trace!("GET {}", request.url);

        let mut builder = self
            .client
            .get(request.url.clone())
            .header(USER_AGENT, &request.user_agent);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        ::log::debug!("GET {} -> {} ({} bytes)", request.url, status, body.len());
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
