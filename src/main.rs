use clap::Parser;
use most_cited::tool::ERROR_PREFIX;
use most_cited::{Fetcher, HttpRenderer, MostCitedTool, ScraperConfig};
use std::error::Error;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    ::log::info!("Searching {} for: {}", config.base_url, args.query);
    let start_time = std::time::Instant::now();

    let output = if args.http {
        match HttpRenderer::new(&config) {
            Ok(renderer) => {
                MostCitedTool::new(Fetcher::new(config, renderer))
                    .call(&args.query)
                    .await
            }
            Err(e) => format!("{ERROR_PREFIX}{e}"),
        }
    } else {
        ::log::info!(
            "Rendering with WebDriver at {} (set WEBDRIVER_URL to change it)",
            config.webdriver_url
        );
        most_cited::find_most_cited(config, &args.query).await
    };

    ::log::info!(
        "Lookup complete in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );
    println!("{output}");
}

/// Config file (or defaults), then environment, then command-line flags
fn load_config(args: &Args) -> Result<ScraperConfig, Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => ScraperConfig::from_file(path)?,
        None => ScraperConfig::default(),
    };

    let mut config = config.with_env_overrides();
    if let Some(webdriver_url) = &args.webdriver_url {
        config.webdriver_url = webdriver_url.clone();
    }
    if let Some(proxy) = &args.proxy {
        config.proxy = Some(proxy.clone());
    }
    Ok(config)
}
