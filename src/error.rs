use crate::tokens::TruncateError;
use thiserror::Error;

/// Failure of one pipeline stage.
///
/// The `Display` output is the message handed back to the conversational
/// agent, so every variant names the stage that failed and why.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The input did not look like an absolute http(s) URL
    #[error("Error: Invalid URL format. Must start with http or https.")]
    InvalidUrl,

    /// robots.txt could not be fetched or read
    #[error("Error: Failed to check robots.txt. Details: {0}")]
    PolicyCheck(String),

    /// robots.txt forbids fetching the page for our user agent
    #[error("Error: Scraping is disallowed by robots.txt for {url} for user agent {user_agent}.")]
    CrawlDisallowed { url: String, user_agent: String },

    /// The page request failed or returned a non-2xx status
    #[error("Error: Failed to fetch page {url}. Details: {detail}")]
    Fetch { url: String, detail: String },

    /// The markup yielded no text in any extraction tier
    #[error("Error: Failed to parse HTML or extract text from {url}. Details: {detail}")]
    Extraction { url: String, detail: String },

    /// Encoding, decoding or truncating the text failed
    #[error("Error: Failed to tokenize or truncate text. Details: {0}")]
    Tokenization(String),
}

/// Failure at the HTTP transport layer (connect, timeout, body read).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError(err.to_string())
    }
}

/// Failure while loading or validating a [`crate::config::ScraperConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<TruncateError> for ScrapeError {
    fn from(err: TruncateError) -> Self {
        ScrapeError::Tokenization(err.to_string())
    }
}

/// Failure while building an [`crate::ArticleScraper`].
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] TransportError),

    #[error("failed to load tokenizer: {0}")]
    Tokenizer(#[from] TruncateError),

    #[error("invalid content keywords: {0}")]
    Pattern(#[from] regex::Error),
}
