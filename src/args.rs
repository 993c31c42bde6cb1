use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "most-cited")]
#[command(about = "Find the most cited article about a topic")]
#[command(version)]
pub struct Args {
    /// Topic to search for
    pub query: String,

    /// Path to a JSON scraper configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver URL (overrides config and WEBDRIVER_URL)
    #[arg(short, long)]
    pub webdriver_url: Option<String>,

    /// Outbound proxy (overrides config and PROXY)
    #[arg(short, long)]
    pub proxy: Option<String>,

    /// Fetch with a plain HTTP client instead of a browser
    #[arg(long)]
    pub http: bool,
}
