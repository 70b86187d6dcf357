use crate::publish::PublishError;
use serde::Deserialize;
use serde_json::json;
use url::Url;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DRIVE_FILES_API: &str = "https://www.googleapis.com/drive/v3/files";

/// A spreadsheet created for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedSheet {
    pub id: String,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedSpreadsheet {
    spreadsheet_id: Option<String>,
    spreadsheet_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileParents {
    #[serde(default)]
    parents: Vec<String>,
}

/// Google Sheets and Drive client authorised with a bearer token
pub struct SheetsPublisher {
    http: reqwest::Client,
    token: String,
}

impl SheetsPublisher {
    pub fn new(http: reqwest::Client, token: &str) -> Self {
        Self {
            http,
            token: token.to_string(),
        }
    }

    /// Creates a spreadsheet titled `title` and writes `rows` from cell A1
    pub async fn create_sheet(
        &self,
        title: &str,
        rows: &[Vec<String>],
    ) -> Result<PublishedSheet, PublishError> {
        let response = self
            .http
            .post(SHEETS_API)
            .bearer_auth(&self.token)
            .json(&json!({ "properties": { "title": title } }))
            .send()
            .await?;
        let created: CreatedSpreadsheet = check("sheets", response).await?.json().await?;
        let id = created.spreadsheet_id.ok_or(PublishError::MissingField {
            service: "sheets",
            field: "spreadsheetId",
        })?;
        ::log::info!("Created spreadsheet {} ({})", title, id);

        let response = self
            .http
            .put(values_url(&id)?)
            .bearer_auth(&self.token)
            .json(&json!({ "majorDimension": "ROWS", "values": rows }))
            .send()
            .await?;
        check("sheets", response).await?;
        ::log::info!("Wrote {} rows to spreadsheet {}", rows.len(), id);

        Ok(PublishedSheet {
            id,
            url: created.spreadsheet_url,
        })
    }

    /// Moves a Drive file into `folder_id`, detaching it from its current parents
    pub async fn move_to_folder(&self, file_id: &str, folder_id: &str) -> Result<(), PublishError> {
        let response = self
            .http
            .get(parents_url(file_id)?)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let current: FileParents = check("drive", response).await?.json().await?;

        let response = self
            .http
            .patch(move_url(file_id, folder_id, &current.parents)?)
            .bearer_auth(&self.token)
            .send()
            .await?;
        check("drive", response).await?;

        ::log::info!("Moved spreadsheet {} into folder {}", file_id, folder_id);
        Ok(())
    }
}

/// Turns a non-success response into an API error carrying the body
async fn check(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, PublishError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    ::log::error!("{} request failed with {}: {}", service, status, body);
    Err(PublishError::Api {
        service,
        status: status.as_u16(),
        body,
    })
}

fn values_url(spreadsheet_id: &str) -> Result<Url, PublishError> {
    let url = Url::parse_with_params(
        &format!("{}/{}/values/A1", SHEETS_API, spreadsheet_id),
        &[("valueInputOption", "RAW")],
    )?;
    Ok(url)
}

fn parents_url(file_id: &str) -> Result<Url, PublishError> {
    let url = Url::parse_with_params(
        &format!("{}/{}", DRIVE_FILES_API, file_id),
        &[("fields", "parents")],
    )?;
    Ok(url)
}

fn move_url(file_id: &str, folder_id: &str, previous: &[String]) -> Result<Url, PublishError> {
    let url = Url::parse_with_params(
        &format!("{}/{}", DRIVE_FILES_API, file_id),
        &[
            ("addParents", folder_id),
            ("removeParents", previous.join(",").as_str()),
            ("fields", "id, parents"),
        ],
    )?;
    Ok(url)
}
