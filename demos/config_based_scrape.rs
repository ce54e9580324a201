use article_scrape::{ArticleScraper, ScraperConfig};
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to scraper configuration file
    #[arg(short, long, default_value = "demos/scraper_config.json")]
    config: PathBuf,

    /// Override the token budget
    #[arg(short, long)]
    token_budget: Option<usize>,

    /// Article URLs to scrape, one after another
    #[arg(required = true)]
    urls: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();

    // Load configuration from file
    let mut config = ScraperConfig::from_file(&args.config)?;
    if let Some(budget) = args.token_budget {
        config.token_budget = budget;
    }

    println!("Scraper configuration:");
    println!("  User agent: {}", config.user_agent);
    println!("  Page timeout: {}s", config.fetch_timeout_secs);
    println!("  Token budget: {}", config.token_budget);
    println!("  Encoding: {:?}", config.encoding);
    println!("  Class keywords: {}", config.content_keywords.join(", "));

    let scraper = ArticleScraper::new(config)?;

    for url in &args.urls {
        println!("\n--- {} ---", url);
        let output = scraper.run_tool(url).await;
        if let Some(text) = output.scraped_text() {
            println!("Scraped {} characters", text.len());
        }
        println!("{}", output);
    }

    Ok(())
}
