use crate::config::SelectorConfig;
use crate::error::HarvestError;
use crate::parsers::html::{compile_selector, first_text};
use crate::parsers::{ContainerOutcome, PageExtraction, SkipReason};
use crate::results::NewsRecord;
use scraper::{ElementRef, Html, Selector};

/// Pulls news records out of a rendered listing page.
///
/// Title and date are looked up inside each container only, so a container
/// without a date never borrows one from its neighbour.
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    container: Selector,
    title: Selector,
    date: Selector,
}

impl ListingExtractor {
    /// Compiles the configured selectors once for the whole run
    pub fn new(selectors: &SelectorConfig) -> Result<Self, HarvestError> {
        Ok(Self {
            container: compile_selector(&selectors.container)?,
            title: compile_selector(&selectors.title)?,
            date: compile_selector(&selectors.date)?,
        })
    }

    /// Extracts every container of a page source, in DOM order
    pub fn extract(&self, html: &str) -> PageExtraction {
        let doc = Html::parse_document(html);
        let outcomes = doc
            .select(&self.container)
            .map(|container| self.extract_container(container));
        let extraction = PageExtraction::from_outcomes(outcomes);

        ::log::debug!(
            "Listing extractor found {} containers, kept {}, skipped {}",
            extraction.containers(),
            extraction.records.len(),
            extraction.skipped.len()
        );

        extraction
    }

    /// Extracts one container; a record only when both fields are present
    pub fn extract_container(&self, container: ElementRef<'_>) -> ContainerOutcome {
        let title = first_text(container, &self.title);
        let published = first_text(container, &self.date);

        match (title, published) {
            (Some(title), Some(published)) => {
                ContainerOutcome::Record(NewsRecord { title, published })
            }
            (title, published) => {
                let reason = SkipReason::from_presence(title.is_some(), published.is_some())
                    .unwrap_or(SkipReason::MissingBoth);
                ::log::trace!("Skipping listing container: {:?}", reason);
                ContainerOutcome::Skipped(reason)
            }
        }
    }
}
