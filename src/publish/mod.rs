//! Downstream delivery of a finished run: spreadsheet, Drive folder and chat.
//!
//! Collaborators only see the exported artifacts, never the browser session.
//! Each one is enabled by the presence of its credentials.

pub mod sheets;
pub mod telegram;

pub use sheets::{PublishedSheet, SheetsPublisher};
pub use telegram::TelegramNotifier;

use crate::config::HarvestConfig;
use crate::results::RunArtifacts;
use thiserror::Error;

/// Errors raised while handing a run to external services
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("{service} returned {status}: {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} response missing {field}")]
    MissingField {
        service: &'static str,
        field: &'static str,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
}

/// Credentials and switches for the downstream collaborators
#[derive(Debug, Clone, Default)]
pub struct PublishConfig {
    /// OAuth bearer token with Sheets and Drive scopes
    pub google_access_token: Option<String>,
    /// Drive folder the spreadsheet is moved into
    pub drive_folder_id: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_ids: Vec<String>,
    /// Also send the CSV file to every chat
    pub attach_csv: bool,
}

impl PublishConfig {
    /// Reads `GOOGLE_ACCESS_TOKEN`, `GDRIVE_FOLDER_ID`, `TELEGRAM_BOT_TOKEN`
    /// and `TELEGRAM_CHAT_ID` from the environment
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        Self {
            google_access_token: non_empty("GOOGLE_ACCESS_TOKEN"),
            drive_folder_id: non_empty("GDRIVE_FOLDER_ID"),
            telegram_bot_token: non_empty("TELEGRAM_BOT_TOKEN"),
            telegram_chat_ids: non_empty("TELEGRAM_CHAT_ID")
                .map(|raw| parse_chat_ids(&raw))
                .unwrap_or_default(),
            attach_csv: false,
        }
    }
}

/// Splits a comma separated chat id list, dropping blank entries
pub fn parse_chat_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Publishes a finished run to every configured collaborator.
///
/// The spreadsheet goes first so the chat message can point at it.
pub async fn publish(
    run: &RunArtifacts,
    harvest: &HarvestConfig,
    config: &PublishConfig,
) -> Result<(), PublishError> {
    let http = reqwest::Client::new();
    let mut sheet = None;

    match &config.google_access_token {
        Some(token) => {
            let sheets = SheetsPublisher::new(http.clone(), token);
            let title = format!("{} {}", harvest.report_title, run.date);
            let rows = run.report.dataset.to_rows(&harvest.export.headers);
            let created = sheets.create_sheet(&title, &rows).await?;

            if let Some(folder_id) = &config.drive_folder_id {
                sheets.move_to_folder(&created.id, folder_id).await?;
            }
            sheet = Some(created);
        }
        None => ::log::info!("GOOGLE_ACCESS_TOKEN not set, skipping spreadsheet upload"),
    }

    match &config.telegram_bot_token {
        Some(token) if !config.telegram_chat_ids.is_empty() => {
            let notifier = TelegramNotifier::new(http, token, config.telegram_chat_ids.clone());
            let text = telegram::summary_message(
                &harvest.report_title,
                &run.date,
                &run.preview,
                sheet.as_ref().and_then(|s| s.url.as_deref()),
                sheet.is_some(),
            );
            let attachment = config.attach_csv.then_some(run.csv_path.as_path());
            notifier.notify(&text, attachment).await?;
        }
        _ => ::log::info!("Telegram bot token or chat ids not set, skipping chat notification"),
    }

    Ok(())
}
