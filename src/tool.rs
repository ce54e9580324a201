//! The single-string tool handed to the conversational agent.

use crate::config::ScraperConfig;
use crate::results::{TOOL_MSG_PREFIX, ToolOutput};
use crate::{ArticleScraper, SetupError};
use serde_json::{Value, json};

/// Name the agent calls the tool by
pub const TOOL_NAME: &str = "scrape_article";

const TOOL_DESCRIPTION: &str = "Fetches content from a given URL, checks robots.txt, parses the page \
to extract main text based on common class/tag patterns, and returns the first 600 tokens. \
Returns the extracted text after the marker `SCRAPED TEXT::`, or an error message if fetching, \
parsing, or the robots.txt check fails.";

/// Scrape one article with the default configuration (plus environment
/// overrides). Every outcome, including setup failures, comes back as a
/// string starting with `TOOL OUTPUT: `.
pub async fn scrape_article(url: &str) -> String {
    match build_default() {
        Ok(scraper) => scraper.run_tool(url).await.to_string(),
        Err(e) => {
            ::log::error!("Failed to set up scraper: {}", e);
            format!("{}Error: Failed to set up scraper. Details: {}", TOOL_MSG_PREFIX, e)
        }
    }
}

fn build_default() -> Result<ArticleScraper, SetupError> {
    let config = ScraperConfig::default().with_env_overrides()?;
    ArticleScraper::new(config)
}

/// Function-calling definition of the tool
pub fn definition() -> Value {
    json!({
        "name": TOOL_NAME,
        "description": TOOL_DESCRIPTION,
        "parameters": {
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL of the article page to scrape."
                }
            },
            "required": ["url"]
        }
    })
}

/// Whether a tool string carries scraped text rather than an error
pub fn is_scraped(output: &str) -> bool {
    ToolOutput::from_tool_string(output).is_some_and(|o| o.is_scraped())
}
