use article_scrape::{ArticleScraper, tool};
use clap::Parser;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    if args.definition {
        println!("{}", serde_json::to_string_pretty(&tool::definition())?);
        return Ok(());
    }

    let Some(url) = args.url.as_deref() else {
        return Err("a URL is required".into());
    };

    let config = args.load_config()?;
    ::log::debug!("Using configuration: {:?}", config);

    let scraper = ArticleScraper::new(config)?;

    let start_time = std::time::Instant::now();
    let output = scraper.run_tool(url).await;
    ::log::info!(
        "Finished {} in {:.2} seconds",
        url,
        start_time.elapsed().as_secs_f64()
    );

    println!("{}", output);
    Ok(())
}
