pub mod html;
pub mod listing;

#[cfg(test)]
mod tests;

pub use listing::ListingExtractor;

use crate::results::NewsRecord;

/// Why a container did not produce a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No title node, or a blank one
    MissingTitle,
    /// No date node, or a blank one
    MissingDate,
    /// Neither field was usable
    MissingBoth,
}

impl SkipReason {
    /// Classifies which fields were missing; `None` when both were found
    pub fn from_presence(has_title: bool, has_date: bool) -> Option<Self> {
        match (has_title, has_date) {
            (true, true) => None,
            (false, true) => Some(SkipReason::MissingTitle),
            (true, false) => Some(SkipReason::MissingDate),
            (false, false) => Some(SkipReason::MissingBoth),
        }
    }
}

/// Extraction result for a single listing container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerOutcome {
    Record(NewsRecord),
    Skipped(SkipReason),
}

/// Result of extracting one rendered listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageExtraction {
    /// Complete records in DOM order
    pub records: Vec<NewsRecord>,
    /// Skip reasons in DOM order
    pub skipped: Vec<SkipReason>,
}

impl PageExtraction {
    /// Folds per-container outcomes, keeping only full records
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = ContainerOutcome>) -> Self {
        let mut extraction = Self::default();
        for outcome in outcomes {
            match outcome {
                ContainerOutcome::Record(record) => extraction.records.push(record),
                ContainerOutcome::Skipped(reason) => extraction.skipped.push(reason),
            }
        }
        extraction
    }

    /// Number of containers seen on the page
    pub fn containers(&self) -> usize {
        self.records.len() + self.skipped.len()
    }
}
