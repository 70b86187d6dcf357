use crate::error::HarvestError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Configuration for a harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Listing URL without the page parameter
    #[serde(default = "default_listing_url")]
    pub listing_url: String,

    /// Number of listing pages to visit, starting at page 1
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Request a headless browser session
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// WebDriver page-load timeout in seconds (session default when unset)
    #[serde(default)]
    pub page_load_timeout_secs: Option<u64>,

    /// How to wait for dynamic content after navigation
    #[serde(default)]
    pub settle: SettleStrategy,

    /// CSS selectors locating listing items and their fields
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// Where and how the CSV report is written
    #[serde(default)]
    pub export: ExportOptions,

    /// Number of records shown in the notification preview
    #[serde(default = "default_preview_len")]
    pub preview_len: usize,

    /// Human title used for the spreadsheet and chat message
    #[serde(default = "default_report_title")]
    pub report_title: String,
}

/// Post-navigation settling behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SettleStrategy {
    /// Sleep for a fixed time after navigation
    Delay { millis: u64 },
    /// Poll until an item container is present, failing after the timeout
    Selector { timeout_secs: u64 },
}

impl Default for SettleStrategy {
    fn default() -> Self {
        SettleStrategy::Delay { millis: 2000 }
    }
}

/// CSS selectors for the listing markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// One match per listing item
    #[serde(default = "default_container_selector")]
    pub container: String,

    /// Title node, scoped to the container
    #[serde(default = "default_title_selector")]
    pub title: String,

    /// Publication date node, scoped to the container
    #[serde(default = "default_date_selector")]
    pub date: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            container: default_container_selector(),
            title: default_title_selector(),
            date: default_date_selector(),
        }
    }
}

/// CSV report settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Directory the report is written into
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File name prefix, followed by `_<date>.csv`
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Column labels for (title, published)
    #[serde(default = "default_headers")]
    pub headers: [String; 2],
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_prefix: default_file_prefix(),
            headers: default_headers(),
        }
    }
}

impl HarvestConfig {
    /// Create a configuration for the given listing URL with default values
    pub fn new(listing_url: &str) -> Self {
        Self {
            listing_url: listing_url.to_string(),
            total_pages: default_total_pages(),
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            page_load_timeout_secs: None,
            settle: SettleStrategy::default(),
            selectors: SelectorConfig::default(),
            export: ExportOptions::default(),
            preview_len: default_preview_len(),
            report_title: default_report_title(),
        }
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HarvestError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, HarvestError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Override the WebDriver URL with the `WEBDRIVER_URL` environment variable if set
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), HarvestError> {
        if self.total_pages == 0 {
            return Err(HarvestError::InvalidConfig(
                "total_pages must be at least 1".to_string(),
            ));
        }
        if self.export.file_prefix.trim().is_empty() {
            return Err(HarvestError::InvalidConfig(
                "export.file_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self::new(&default_listing_url())
    }
}

fn default_listing_url() -> String {
    "https://www.tdm.com.mo/zh-hant/news-list?type=image&category=27".to_string()
}

fn default_total_pages() -> u32 {
    3
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_container_selector() -> String {
    "div.function-bar.px-0.py-3".to_string()
}

fn default_title_selector() -> String {
    "h4.overflow-text-3".to_string()
}

fn default_date_selector() -> String {
    "div.date".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_prefix() -> String {
    "tdm_image_news".to_string()
}

fn default_headers() -> [String; 2] {
    ["標題".to_string(), "日期時間".to_string()]
}

fn default_preview_len() -> usize {
    5
}

fn default_report_title() -> String {
    "TDM報告".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = HarvestConfig::from_json("{}").unwrap();
        assert_eq!(config.total_pages, 3);
        assert_eq!(config.preview_len, 5);
        assert_eq!(config.settle, SettleStrategy::Delay { millis: 2000 });
        assert_eq!(config.selectors.container, "div.function-bar.px-0.py-3");
        assert_eq!(config.export.headers, ["標題".to_string(), "日期時間".to_string()]);
        assert!(config.headless);
    }

    #[test]
    fn test_settle_selector_mode() {
        let json = r#"{"total_pages": 5, "settle": {"mode": "selector", "timeout_secs": 15}}"#;
        let config = HarvestConfig::from_json(json).unwrap();
        assert_eq!(config.total_pages, 5);
        assert_eq!(config.settle, SettleStrategy::Selector { timeout_secs: 15 });
    }

    #[test]
    fn test_validate_rejects_zero_pages() {
        let mut config = HarvestConfig::default();
        config.total_pages = 0;
        assert!(matches!(
            config.validate(),
            Err(HarvestError::InvalidConfig(_))
        ));

        config.total_pages = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let result = HarvestConfig::from_json("{\"total_pages\": \"three\"}");
        assert!(matches!(result, Err(HarvestError::Json(_))));
    }
}
