use article_scrape::ScraperConfig;
use article_scrape::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "article-scrape")]
#[command(about = "Fetches one web article, respecting robots.txt, and prints its token-capped text")]
#[command(version)]
pub struct Args {
    /// URL of the article page to scrape
    #[arg(required_unless_present = "definition")]
    pub url: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of tokens kept from the article
    #[arg(long)]
    pub token_budget: Option<usize>,

    /// Page request timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// robots.txt request timeout in seconds
    #[arg(long)]
    pub robots_timeout: Option<u64>,

    /// User agent sent with requests and matched against robots.txt
    #[arg(short, long)]
    pub user_agent: Option<String>,

    /// Print the tool's function-calling definition and exit
    #[arg(long)]
    pub definition: bool,
}

impl Args {
    /// Layer the configuration: file (or defaults), environment, then flags
    pub fn load_config(&self) -> Result<ScraperConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => ScraperConfig::from_file(path)?,
            None => ScraperConfig::default(),
        };
        let mut config = base.with_env_overrides()?;

        if let Some(budget) = self.token_budget {
            config.token_budget = budget;
        }
        if let Some(timeout) = self.timeout {
            config.fetch_timeout_secs = timeout;
        }
        if let Some(timeout) = self.robots_timeout {
            config.robots_timeout_secs = Some(timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }

        config.validate()?;
        Ok(config)
    }
}
