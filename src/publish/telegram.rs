use crate::publish::PublishError;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use std::path::Path;

const TELEGRAM_API: &str = "https://api.telegram.org";

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends run summaries to one or more Telegram chats through the Bot API
pub struct TelegramNotifier {
    http: reqwest::Client,
    token: String,
    chat_ids: Vec<String>,
}

impl TelegramNotifier {
    pub fn new(http: reqwest::Client, token: &str, chat_ids: Vec<String>) -> Self {
        Self {
            http,
            token: token.to_string(),
            chat_ids,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", TELEGRAM_API, self.token, method)
    }

    /// Sends `text` to every chat, followed by the attachment when given
    pub async fn notify(&self, text: &str, attachment: Option<&Path>) -> Result<(), PublishError> {
        let document = match attachment {
            Some(path) => Some((file_name(path), tokio::fs::read(path).await?)),
            None => None,
        };

        for chat_id in &self.chat_ids {
            self.send_message(chat_id, text).await?;
            if let Some((name, bytes)) = &document {
                self.send_document(chat_id, name, bytes.clone()).await?;
            }
            ::log::info!("Notified Telegram chat {}", chat_id);
        }
        Ok(())
    }

    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), PublishError> {
        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await?;
        check(response).await
    }

    pub async fn send_document(
        &self,
        chat_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), PublishError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("document", part);

        let response = self
            .http
            .post(self.method_url("sendDocument"))
            .multipart(form)
            .send()
            .await?;
        check(response).await
    }
}

/// Telegram answers with `ok: false` and a description on failure
async fn check(response: reqwest::Response) -> Result<(), PublishError> {
    let status = response.status();
    let body = response.text().await?;
    match serde_json::from_str::<TelegramResponse>(&body) {
        Ok(parsed) if status.is_success() && parsed.ok => Ok(()),
        Ok(parsed) => Err(PublishError::Api {
            service: "telegram",
            status: status.as_u16(),
            body: parsed.description.unwrap_or(body),
        }),
        Err(_) => Err(PublishError::Api {
            service: "telegram",
            status: status.as_u16(),
            body,
        }),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report.csv".to_string())
}

/// Chat message announcing a finished run with its preview lines
pub fn summary_message(
    report_title: &str,
    date: &str,
    preview: &str,
    sheet_url: Option<&str>,
    uploaded: bool,
) -> String {
    let mut text = if uploaded {
        format!("📢 {} {} 已完成，已上傳 Google Drive。", report_title, date)
    } else {
        format!("📢 {} {} 已完成。", report_title, date)
    };
    if let Some(url) = sheet_url {
        text.push('\n');
        text.push_str(url);
    }
    text.push_str("\n\n📄 最新新聞摘要：\n");
    text.push_str(preview);
    text
}
