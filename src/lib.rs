// Re-export modules
pub mod config;
pub mod error;
pub mod fetchers;
pub mod parsers;
pub mod results;
pub mod robots;
pub mod target;
pub mod tokens;
pub mod tool;

#[cfg(test)]
mod tests;

// Re-export commonly used types for convenience
pub use config::ScraperConfig;
pub use error::{ScrapeError, SetupError};
pub use fetchers::{HttpClient, web::WebClient};
pub use results::ToolOutput;

use parsers::ExtractOptions;
use target::ScrapeTarget;
use tokens::Truncator;

/// Article extraction pipeline:
/// validate URL, check robots.txt, fetch, extract, truncate.
///
/// Each call to [`ArticleScraper::scrape`] is independent; the scraper holds
/// only immutable settings and the transport.
#[derive(Debug)]
pub struct ArticleScraper<C = WebClient> {
    config: ScraperConfig,
    client: C,
    extract_options: ExtractOptions,
    truncator: Truncator,
}

impl ArticleScraper<WebClient> {
    /// Create a scraper using the reqwest-backed client
    pub fn new(config: ScraperConfig) -> Result<Self, SetupError> {
        let client = WebClient::new()?;
        Self::with_client(config, client)
    }
}

impl<C: HttpClient> ArticleScraper<C> {
    /// Create a scraper over a custom transport
    pub fn with_client(config: ScraperConfig, client: C) -> Result<Self, SetupError> {
        config.validate()?;
        let extract_options = ExtractOptions::from_config(&config)?;
        let truncator = Truncator::new(config.encoding, config.token_budget)?;

        Ok(Self {
            config,
            client,
            extract_options,
            truncator,
        })
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run the pipeline, stopping at the first failing stage
    pub async fn scrape(&self, url: &str) -> Result<String, ScrapeError> {
        ::log::info!("Scraping article: {}", url);
        let user_agent = self.config.user_agent.as_str();

        let target = ScrapeTarget::parse(url)?;

        robots::check(
            &self.client,
            &target,
            user_agent,
            self.config.robots_timeout(),
        )
        .await?;

        let page =
            fetchers::fetch_page(&self.client, &target, user_agent, self.config.fetch_timeout())
                .await?;

        let extraction = parsers::extract_article(&page, &self.extract_options).map_err(|e| {
            ScrapeError::Extraction {
                url: target.url().to_string(),
                detail: e.to_string(),
            }
        })?;
        ::log::debug!(
            "Extracted {} characters via {:?}",
            extraction.text.len(),
            extraction.tier
        );

        let text = self.truncator.truncate(&extraction.text)?;

        ::log::info!("Scraped {} characters from {}", text.len(), target.url());
        Ok(text)
    }

    /// Run the pipeline and fold the outcome into a [`ToolOutput`]
    pub async fn run_tool(&self, url: &str) -> ToolOutput {
        match self.scrape(url).await {
            Ok(text) => ToolOutput::Scraped(text),
            Err(e) => {
                ::log::warn!("Scrape of {} failed: {}", url, e);
                ToolOutput::Error(e.to_string())
            }
        }
    }
}
