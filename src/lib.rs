// Re-export modules
pub mod config;
pub mod error;
pub mod export;
pub mod pagination;
pub mod parsers;
pub mod publish;
pub mod renderers;
pub mod results;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use config::{HarvestConfig, SettleStrategy};
pub use error::HarvestError;
pub use results::{Dataset, HarvestReport, NewsRecord, RunArtifacts};

use renderers::{PageRenderer, WebRenderer};
use std::path::PathBuf;
use url::Url;

/// Main builder for a harvest run over a paginated news listing
pub struct Harvest {
    config: HarvestConfig,
}

impl Harvest {
    /// Create a new Harvest builder with the given configuration
    pub fn new(config: HarvestConfig) -> Self {
        Self { config }
    }

    /// Set the number of listing pages to visit
    pub fn with_total_pages(mut self, total_pages: u32) -> Self {
        self.config.total_pages = total_pages;
        self
    }

    /// Set the directory the CSV report is written into
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.config.export.output_dir = output_dir.into();
        self
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Check everything that can fail before a browser is started
    fn preflight(&self) -> Result<(), HarvestError> {
        self.config.validate()?;
        Url::parse(&self.config.listing_url)?;
        parsers::ListingExtractor::new(&self.config.selectors)?;
        Ok(())
    }

    /// Harvest with a WebDriver browser and export the report dated today
    pub async fn run(&self) -> Result<RunArtifacts, HarvestError> {
        self.preflight()?;
        let renderer = WebRenderer::connect(&self.config).await?;
        self.run_with(renderer, &utils::run_date()).await
    }

    /// Harvest through `renderer`, then write the report and preview.
    ///
    /// Nothing is written when harvesting fails.
    pub async fn run_with<R: PageRenderer>(
        &self,
        renderer: R,
        date: &str,
    ) -> Result<RunArtifacts, HarvestError> {
        let report = pagination::paginate(renderer, &self.config).await?;
        let csv_path = export::write_csv(&report.dataset, &self.config.export, date)?;
        let preview = export::preview(&report.dataset, self.config.preview_len);

        Ok(RunArtifacts {
            report,
            csv_path,
            preview,
            date: date.to_string(),
        })
    }
}
