use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Boxed source error carried by browser-facing variants
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Errors that abort a harvest run.
///
/// Every variant is fatal: once one of these surfaces from the pagination
/// driver no dataset exists for the run. Containers with missing fields and
/// pages without any items are not errors and never show up here.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// No WebDriver endpoint accepted a new session
    #[error("could not start a browser session at {url}: {reason}")]
    Session { url: String, reason: String },

    /// A listing page could not be loaded
    #[error("failed to load {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The listing containers never appeared within the readiness window
    #[error("listing content at {url} not ready after {waited:?}")]
    NotReady { url: String, waited: Duration },

    /// Any other WebDriver command failure (reading source, closing)
    #[error("browser error while {context}: {source}")]
    Browser {
        context: &'static str,
        #[source]
        source: BoxError,
    },

    /// Listing base URL could not be parsed
    #[error("invalid listing url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A configured CSS selector failed to compile
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The CSV report could not be written
    #[error("failed to write report {path:?}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HarvestError {
    /// Whether this error belongs to the page-could-not-be-loaded class
    pub fn is_navigation_failure(&self) -> bool {
        matches!(self, Self::Navigation { .. } | Self::NotReady { .. })
    }
}
