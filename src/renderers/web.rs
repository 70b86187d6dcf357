use crate::config::{HarvestConfig, SettleStrategy};
use crate::error::HarvestError;
use crate::renderers::PageRenderer;
use fantoccini::error::CmdError;
use fantoccini::wd::{Capabilities, TimeoutConfiguration};
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Value, json};
use std::time::Duration;
use url::Url;

/// Reads the HTTP status of the current document from the Navigation Timing API
const RESPONSE_STATUS_SCRIPT: &str =
    "return performance.getEntriesByType('navigation')[0]?.responseStatus ?? null";

/// Page renderer backed by a WebDriver browser session
pub struct WebRenderer {
    client: Client,
    settle: SettleStrategy,
    container_css: String,
}

impl WebRenderer {
    /// Opens a browser session for the whole run.
    ///
    /// # Arguments
    ///
    /// * `config` - Harvest configuration (WebDriver URL, headless flag, settle strategy)
    pub async fn connect(config: &HarvestConfig) -> Result<Self, HarvestError> {
        let client = connect_to_webdriver(&config.webdriver_url, config.headless).await?;

        if let Some(secs) = config.page_load_timeout_secs {
            let timeouts = TimeoutConfiguration::new(None, Some(Duration::from_secs(secs)), None);
            let updated = client.update_timeouts(timeouts).await;
            if let Err(e) = updated {
                // The session is ours until it is handed out, so release it here
                if let Err(close_err) = client.close().await {
                    ::log::warn!("Failed to close browser session: {}", close_err);
                }
                return Err(HarvestError::Browser {
                    context: "setting page load timeout",
                    source: Box::new(e),
                });
            }
        }

        Ok(Self {
            client,
            settle: config.settle,
            container_css: config.selectors.container.clone(),
        })
    }

    /// Fails the navigation when the browser landed on an HTTP error page
    async fn check_response_status(&self, url: &Url) -> Result<(), HarvestError> {
        match self.client.execute(RESPONSE_STATUS_SCRIPT, vec![]).await {
            Ok(status) => check_status(url, &status),
            Err(e) => {
                // Browsers without the API still render; the page is judged by its content
                ::log::debug!("Could not read response status of {}: {}", url, e);
                Ok(())
            }
        }
    }

    /// Waits for dynamic content according to the settle strategy
    async fn wait_for_content(&self, url: &Url) -> Result<(), HarvestError> {
        match self.settle {
            SettleStrategy::Delay { millis } => {
                ::log::trace!("Settling {} for {} ms", url, millis);
                tokio::time::sleep(Duration::from_millis(millis)).await;
                Ok(())
            }
            SettleStrategy::Selector { timeout_secs } => {
                let waited = Duration::from_secs(timeout_secs);
                match self
                    .client
                    .wait()
                    .at_most(waited)
                    .for_element(Locator::Css(&self.container_css))
                    .await
                {
                    Ok(_) => Ok(()),
                    Err(CmdError::WaitTimeout) => Err(HarvestError::NotReady {
                        url: url.to_string(),
                        waited,
                    }),
                    Err(e) => Err(HarvestError::Navigation {
                        url: url.to_string(),
                        source: Box::new(e),
                    }),
                }
            }
        }
    }
}

impl PageRenderer for WebRenderer {
    async fn render(&mut self, url: &Url) -> Result<String, HarvestError> {
        let started = std::time::Instant::now();
        ::log::debug!("Navigating to {}", url);

        if let Err(e) = self.client.goto(url.as_str()).await {
            log_navigation_error(&e, "accessing", url);
            return Err(HarvestError::Navigation {
                url: url.to_string(),
                source: Box::new(e),
            });
        }

        self.check_response_status(url).await?;
        self.wait_for_content(url).await?;

        let source = self
            .client
            .source()
            .await
            .map_err(|e| HarvestError::Browser {
                context: "reading page source",
                source: Box::new(e),
            })?;

        ::log::debug!(
            "Rendered {} ({} bytes) in {:.2} seconds",
            url,
            source.len(),
            started.elapsed().as_secs_f64()
        );
        Ok(source)
    }

    async fn close(self) -> Result<(), HarvestError> {
        self.client
            .close()
            .await
            .map_err(|e| HarvestError::Browser {
                context: "closing the browser session",
                source: Box::new(e),
            })
    }
}

/// Capabilities asking Chrome or Firefox for a headless window
fn session_capabilities(headless: bool) -> Capabilities {
    let mut caps = Capabilities::new();
    if headless {
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": ["--headless=new", "--disable-gpu", "--no-sandbox"] }),
        );
        caps.insert(
            "moz:firefoxOptions".to_string(),
            json!({ "args": ["-headless"] }),
        );
    }
    caps
}

/// Connects to the WebDriver instance, trying common local endpoints if the configured one fails
async fn connect_to_webdriver(webdriver_url: &str, headless: bool) -> Result<Client, HarvestError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(session_capabilities(headless));

    let first_error = match builder.connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e.to_string()
        }
    };

    let fallback_urls = [
        "http://localhost:9515", // ChromeDriver default
        "http://localhost:4444", // geckodriver / Selenium default
        "http://127.0.0.1:4444", // Try with IP instead of localhost
    ];

    for url in fallback_urls.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = builder.connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(HarvestError::Session {
        url: webdriver_url.to_string(),
        reason: first_error,
    })
}

/// Maps the document's HTTP status to a navigation result.
///
/// `null` and `0` mean the browser did not report a status, which is accepted.
/// Anything outside 2xx is a navigation failure.
fn check_status(url: &Url, status: &Value) -> Result<(), HarvestError> {
    match status.as_u64() {
        None | Some(0) | Some(200..=299) => Ok(()),
        Some(code) => {
            ::log::error!("Failed accessing {}: HTTP {}", url, code);
            Err(HarvestError::Navigation {
                url: url.to_string(),
                source: format!("HTTP status {}", code).into(),
            })
        }
    }
}

/// Logs a failed WebDriver navigation, separating lost sessions from page errors
fn log_navigation_error(error: &CmdError, context: &str, url: &Url) {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost browser session while {} {}", context, url);
    } else {
        ::log::error!("Failed {} {}: {}", context, url, error);
    }
}
