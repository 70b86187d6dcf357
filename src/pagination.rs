use crate::config::HarvestConfig;
use crate::error::HarvestError;
use crate::parsers::ListingExtractor;
use crate::renderers::PageRenderer;
use crate::results::{Dataset, HarvestReport, PageSummary};
use crate::utils::page_url;
use url::Url;

/// Visits listing pages `1..=total_pages` in order and collects every record.
///
/// The renderer is owned for the duration of the run and closed exactly once,
/// whether the run completes or aborts. Any failure on any page aborts the
/// whole run without returning the records gathered so far.
pub async fn paginate<R: PageRenderer>(
    mut renderer: R,
    config: &HarvestConfig,
) -> Result<HarvestReport, HarvestError> {
    let outcome = visit_pages(&mut renderer, config).await;
    let closed = renderer.close().await;

    match (outcome, closed) {
        (Ok(report), Ok(())) => Ok(report),
        (Ok(report), Err(e)) => {
            ::log::warn!("Harvest finished but the browser session did not close: {}", e);
            Ok(report)
        }
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            ::log::warn!("Failed to close browser session after abort: {}", close_err);
            Err(e)
        }
    }
}

async fn visit_pages<R: PageRenderer>(
    renderer: &mut R,
    config: &HarvestConfig,
) -> Result<HarvestReport, HarvestError> {
    config.validate()?;
    let base = Url::parse(&config.listing_url)?;
    let extractor = ListingExtractor::new(&config.selectors)?;

    let mut dataset = Dataset::new();
    let mut pages = Vec::new();

    for page in 1..=config.total_pages {
        let url = page_url(&base, page);
        ::log::info!("Harvesting page {} of {}: {}", page, config.total_pages, url);

        let html = renderer.render(&url).await?;
        let extraction = extractor.extract(&html);

        if extraction.records.is_empty() {
            // An empty page does not end the listing; keep going
            ::log::info!("Page {} yielded no records", page);
        }

        let summary = PageSummary {
            page,
            url: url.to_string(),
            records: extraction.records.len(),
            skipped: extraction.skipped.len(),
        };
        ::log::debug!(
            "Page {}: kept {}, skipped {}",
            page,
            summary.records,
            summary.skipped
        );

        dataset.append(extraction.records);
        pages.push(summary);
    }

    ::log::info!(
        "Harvest complete - {} records from {} pages",
        dataset.len(),
        pages.len()
    );

    Ok(HarvestReport { dataset, pages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{preview, to_csv_bytes};
    use crate::results::NewsRecord;
    use crate::testing::{ScriptedRenderer, item, navigation_failure, page};

    fn config(total_pages: u32) -> HarvestConfig {
        let mut config = HarvestConfig::new("https://example.org/zh-hant/news-list?type=image");
        config.total_pages = total_pages;
        config
    }

    #[tokio::test]
    async fn test_two_page_scenario() {
        let renderer = ScriptedRenderer::new(vec![
            page(&[
                item("one", Some("06-01 09:00")),
                item("two", Some("06-01 10:00")),
                item("no date", None),
                item("three", Some("06-01 11:00")),
            ]),
            page(&[]),
        ]);
        let closed = renderer.closed.clone();

        let report = paginate(renderer, &config(2)).await.unwrap();

        let titles: Vec<&str> = report.dataset.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["one", "two", "three"]);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.pages[1].records, 0);

        let headers = ["title".to_string(), "published".to_string()];
        let csv = String::from_utf8(to_csv_bytes(&report.dataset, &headers)).unwrap();
        assert_eq!(csv.lines().count(), 4);
        assert_eq!(preview(&report.dataset, 5).lines().count(), 3);

        assert_eq!(*closed.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_pages_visited_in_order_and_concatenated() {
        let renderer = ScriptedRenderer::new(vec![
            page(&[item("p1-a", Some("1")), item("p1-b", Some("2"))]),
            page(&[]),
            page(&[item("p3-a", Some("3")), item("p1-a", Some("1"))]),
        ]);
        let visited = renderer.visited.clone();

        let report = paginate(renderer, &config(3)).await.unwrap();

        assert_eq!(
            report.dataset.records(),
            &[
                NewsRecord::new("p1-a", "1"),
                NewsRecord::new("p1-b", "2"),
                NewsRecord::new("p3-a", "3"),
                NewsRecord::new("p1-a", "1"),
            ]
        );
        assert_eq!(
            *visited.lock().unwrap(),
            vec![
                "https://example.org/zh-hant/news-list?type=image&page=1",
                "https://example.org/zh-hant/news-list?type=image&page=2",
                "https://example.org/zh-hant/news-list?type=image&page=3",
            ]
        );
        let page_numbers: Vec<u32> = report.pages.iter().map(|p| p.page).collect();
        assert_eq!(page_numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_failure_on_later_page_aborts_and_closes() {
        let renderer = ScriptedRenderer::new(vec![
            page(&[item("kept?", Some("1"))]),
            page(&[item("kept?", Some("2"))]),
            navigation_failure("https://example.org/zh-hant/news-list?type=image&page=3"),
        ]);
        let visited = renderer.visited.clone();
        let closed = renderer.closed.clone();

        let err = paginate(renderer, &config(3)).await.unwrap_err();

        assert!(err.is_navigation_failure());
        assert_eq!(visited.lock().unwrap().len(), 3);
        assert_eq!(*closed.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failure_stops_further_navigation() {
        let renderer = ScriptedRenderer::new(vec![
            navigation_failure("https://example.org/zh-hant/news-list?type=image&page=1"),
            page(&[item("never", Some("1"))]),
        ]);
        let visited = renderer.visited.clone();

        assert!(paginate(renderer, &config(2)).await.is_err());
        assert_eq!(visited.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_pages_rejected_before_navigation() {
        let renderer = ScriptedRenderer::new(vec![page(&[item("x", Some("1"))])]);
        let visited = renderer.visited.clone();
        let closed = renderer.closed.clone();

        let err = paginate(renderer, &config(0)).await.unwrap_err();

        assert!(matches!(err, HarvestError::InvalidConfig(_)));
        assert!(visited.lock().unwrap().is_empty());
        assert_eq!(*closed.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_huge_page_count_fails_on_first_page() {
        let renderer = ScriptedRenderer::new(vec![navigation_failure(
            "https://example.org/zh-hant/news-list?type=image&page=1",
        )]);
        let visited = renderer.visited.clone();

        let err = paginate(renderer, &config(u32::MAX)).await.unwrap_err();

        assert!(err.is_navigation_failure());
        assert_eq!(visited.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_record_has_empty_fields() {
        let renderer = ScriptedRenderer::new(vec![page(&[
            item("  ", Some("1")),
            item("ok", Some("   ")),
            item("fine", Some("2")),
        ])]);

        let report = paginate(renderer, &config(1)).await.unwrap();

        assert_eq!(report.dataset.len(), 1);
        assert!(
            report
                .dataset
                .iter()
                .all(|r| !r.title.is_empty() && !r.published.is_empty())
        );
    }
}
