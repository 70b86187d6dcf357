use crate::config::SelectorConfig;
use crate::error::HarvestError;
use crate::parsers::{ListingExtractor, SkipReason};

/// Trimmed-down copy of a rendered image-news listing page
const LISTING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="zh-hant">
<head><title>圖片新聞</title></head>
<body>
  <nav><div class="date">2025-06-02</div></nav>
  <section class="news-list">
    <div class="col-md-4">
      <a href="/zh-hant/news-detail/1001"><img src="/img/1001.jpg"></a>
      <div class="function-bar px-0 py-3">
        <a href="/zh-hant/news-detail/1001">
          <h4 class="overflow-text-3">
            特首出席回歸紀念活動
          </h4>
        </a>
        <div class="date"> 2025-06-01 18:30 </div>
      </div>
    </div>
    <div class="col-md-4">
      <div class="function-bar px-0 py-3">
        <a href="/zh-hant/news-detail/1002">
          <h4 class="overflow-text-3">氹仔<br>新公園啟用</h4>
        </a>
        <div class="date">2025-06-01 16:05</div>
      </div>
    </div>
    <div class="col-md-4">
      <div class="function-bar px-0 py-3">
        <h4 class="overflow-text-3">Placeholder without date</h4>
        <span class="share">分享</span>
      </div>
    </div>
    <div class="col-md-4">
      <div class="function-bar px-0">
        <h4 class="overflow-text-3">Different layout, not a listing item</h4>
        <div class="date">2025-06-01 12:00</div>
      </div>
    </div>
  </section>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_listing_page() {
        let extractor = ListingExtractor::new(&SelectorConfig::default()).unwrap();
        let extraction = extractor.extract(LISTING_PAGE);

        assert_eq!(extraction.records.len(), 2);
        assert_eq!(extraction.records[0].title, "特首出席回歸紀念活動");
        assert_eq!(extraction.records[0].published, "2025-06-01 18:30");
        assert_eq!(extraction.records[1].title, "氹仔\n新公園啟用");
        assert_eq!(extraction.records[1].published, "2025-06-01 16:05");
        assert_eq!(extraction.skipped, vec![SkipReason::MissingDate]);
    }

    #[test]
    fn test_custom_selectors() {
        let selectors = SelectorConfig {
            container: "div.function-bar".to_string(),
            title: "h4".to_string(),
            date: ".date".to_string(),
        };
        let extractor = ListingExtractor::new(&selectors).unwrap();
        let extraction = extractor.extract(LISTING_PAGE);

        // The looser container selector also matches the fourth block
        assert_eq!(extraction.records.len(), 3);
        assert_eq!(
            extraction.records[2].title,
            "Different layout, not a listing item"
        );
    }

    #[test]
    fn test_invalid_selector_config() {
        let selectors = SelectorConfig {
            title: "h4..broken".to_string(),
            ..SelectorConfig::default()
        };
        match ListingExtractor::new(&selectors) {
            Err(HarvestError::Selector { selector, .. }) => assert_eq!(selector, "h4..broken"),
            other => panic!("expected selector error, got {:?}", other.map(|_| ())),
        }
    }
}
