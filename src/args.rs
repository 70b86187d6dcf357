use clap::Parser;
use news_harvest::{HarvestConfig, HarvestError, SettleStrategy};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "news-harvest")]
#[command(about = "Harvests a paginated image-news listing into a dated CSV report")]
#[command(version)]
pub struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of listing pages to visit
    #[arg(short, long)]
    pub pages: Option<u32>,

    /// Directory for the CSV report
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// WebDriver endpoint (overrides WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Fixed wait after each navigation, in milliseconds
    #[arg(long, conflicts_with = "wait_for_selector")]
    pub settle_ms: Option<u64>,

    /// Wait up to this many seconds for listing items instead of a fixed delay
    #[arg(long)]
    pub wait_for_selector: Option<u64>,

    /// Only write the CSV report; skip spreadsheet and chat delivery
    #[arg(long)]
    pub no_publish: bool,

    /// Send the CSV file to chats as an attachment
    #[arg(long)]
    pub attach_csv: bool,
}

impl Args {
    /// Builds the run configuration: file (or defaults), then env, then flags
    pub fn harvest_config(&self) -> Result<HarvestConfig, HarvestError> {
        let mut config = match &self.config {
            Some(path) => HarvestConfig::from_file(path)?,
            None => HarvestConfig::default(),
        };
        config.apply_env();

        if let Some(pages) = self.pages {
            config.total_pages = pages;
        }
        if let Some(dir) = &self.output_dir {
            config.export.output_dir = dir.clone();
        }
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url = url.clone();
        }
        if let Some(millis) = self.settle_ms {
            config.settle = SettleStrategy::Delay { millis };
        }
        if let Some(timeout_secs) = self.wait_for_selector {
            config.settle = SettleStrategy::Selector { timeout_secs };
        }

        Ok(config)
    }
}
