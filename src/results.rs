use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One listing item: its headline and the raw publication text shown beside it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRecord {
    /// Trimmed headline text
    pub title: String,

    /// Trimmed date/time text as displayed, not parsed
    pub published: String,
}

impl NewsRecord {
    /// Create a new record instance
    pub fn new(title: impl Into<String>, published: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            published: published.into(),
        }
    }
}

/// Ordered records of one run, page ascending then DOM order.
///
/// Only the pagination driver appends; everything downstream gets `&Dataset`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<NewsRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one page's records after everything collected so far
    pub(crate) fn append(&mut self, page_records: Vec<NewsRecord>) {
        self.records.extend(page_records);
    }

    pub fn records(&self) -> &[NewsRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NewsRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Header row followed by one `[title, published]` row per record
    pub fn to_rows(&self, headers: &[String; 2]) -> Vec<Vec<String>> {
        std::iter::once(headers.to_vec())
            .chain(
                self.records
                    .iter()
                    .map(|r| vec![r.title.clone(), r.published.clone()]),
            )
            .collect()
    }
}

impl FromIterator<NewsRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = NewsRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a NewsRecord;
    type IntoIter = std::slice::Iter<'a, NewsRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// What happened on a single listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub page: u32,
    pub url: String,
    /// Records kept from this page
    pub records: usize,
    /// Containers dropped for a missing title or date
    pub skipped: usize,
}

/// Outcome of a completed harvest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestReport {
    pub dataset: Dataset,
    pub pages: Vec<PageSummary>,
}

impl HarvestReport {
    pub fn skipped(&self) -> usize {
        self.pages.iter().map(|p| p.skipped).sum()
    }
}

/// Everything a finished run hands to downstream collaborators
#[derive(Debug, Clone)]
pub struct RunArtifacts {
    pub report: HarvestReport,
    /// Path of the written CSV report
    pub csv_path: PathBuf,
    /// Short text summary of the first records
    pub preview: String,
    /// Run date used in file and sheet names
    pub date: String,
}
