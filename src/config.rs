use crate::error::ConfigError;
use crate::tokens::Encoding;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding the user agent
pub const USER_AGENT_ENV: &str = "ARTICLE_SCRAPER_USER_AGENT";

/// Environment variable overriding the token budget
pub const TOKEN_BUDGET_ENV: &str = "ARTICLE_SCRAPER_TOKEN_BUDGET";

/// Configuration for the article scraper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// User agent sent with every request and matched against robots.txt
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for the page request, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Timeout for the robots.txt request, in seconds (none if unset)
    #[serde(default)]
    pub robots_timeout_secs: Option<u64>,

    /// Maximum number of tokens kept from the extracted text
    #[serde(default = "default_token_budget")]
    pub token_budget: usize,

    /// BPE table used to count tokens
    #[serde(default)]
    pub encoding: Encoding,

    /// Class-name fragments that mark an element as article content
    #[serde(default = "default_content_keywords")]
    pub content_keywords: Vec<String>,

    /// Container tags searched for matching class names
    #[serde(default = "default_container_tags")]
    pub container_tags: Vec<String>,
}

/// Default value for user_agent
fn default_user_agent() -> String {
    "MyArticleScraperSummaryGenerator/1.0".to_string()
}

/// Default value for fetch_timeout_secs
fn default_fetch_timeout_secs() -> u64 {
    15
}

/// Default value for token_budget
fn default_token_budget() -> usize {
    600
}

fn default_content_keywords() -> Vec<String> {
    [
        "article", "post", "content", "body", "text", "story", "review", "main",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_container_tags() -> Vec<String> {
    ["div", "article", "main", "section"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            robots_timeout_secs: None,
            token_budget: default_token_budget(),
            encoding: Encoding::default(),
            content_keywords: default_content_keywords(),
            container_tags: default_container_tags(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from `ARTICLE_SCRAPER_*` environment variables
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(user_agent) = std::env::var(USER_AGENT_ENV) {
            if !user_agent.is_empty() {
                self.user_agent = user_agent;
            }
        }

        if let Ok(budget) = std::env::var(TOKEN_BUDGET_ENV) {
            self.token_budget = budget.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{} is not a number: {}", TOKEN_BUDGET_ENV, budget))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("user_agent must not be empty".into()));
        }
        if self.fetch_timeout_secs == 0 || self.robots_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid("timeouts must be at least one second".into()));
        }
        if self.token_budget == 0 {
            return Err(ConfigError::Invalid("token_budget must be positive".into()));
        }
        if self.content_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid("content_keywords must not be empty".into()));
        }
        if self.container_tags.is_empty() {
            return Err(ConfigError::Invalid("container_tags must not be empty".into()));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn robots_timeout(&self) -> Option<Duration> {
        self.robots_timeout_secs.map(Duration::from_secs)
    }
}
