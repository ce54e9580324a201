use crate::error::TransportError;
use crate::fetchers::{HttpClient, HttpRequest, HttpResponse};
use std::collections::HashMap;
use std::sync::Mutex;

/// Canned transport that records every request it sees
#[derive(Debug, Default)]
pub struct MockClient {
    routes: HashMap<String, Result<HttpResponse, String>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with a status and body
    pub fn route(mut self, url: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert(url.to_string(), Ok(HttpResponse::new(status, body)));
        self
    }

    /// Fail requests to `url` at the transport layer
    pub fn fail(mut self, url: &str, detail: &str) -> Self {
        self.routes.insert(url.to_string(), Err(detail.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests().iter().map(|r| r.url.to_string()).collect()
    }
}

impl HttpClient for MockClient {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.routes.get(request.url.as_str()) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(detail)) => Err(TransportError(detail.clone())),
            None => Ok(HttpResponse::new(404, "not found")),
        }
    }
}
