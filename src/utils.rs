use chrono::{Local, NaiveDate};
use url::Url;

/// Listing URL for one page: the base URL with its `page` query pair set.
///
/// Every other query pair keeps its position and value.
pub fn page_url(base: &Url, page: u32) -> Url {
    let pairs: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("page", &page.to_string());
    url
}

/// Today's date in the local timezone, as used in report names
pub fn run_date() -> String {
    format_date(Local::now().date_naive())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Report file name for a run, e.g. `tdm_image_news_2025-06-01.csv`
pub fn export_file_name(prefix: &str, date: &str) -> String {
    format!("{}_{}.csv", sanitize_filename(prefix), date)
}

/// Replace characters that are invalid in file names
pub fn sanitize_filename(name: &str) -> String {
    let name = name
        .trim()
        .replace(['/', '\\', ':', '?', '&', '=', '#', '%', '*', '"', '<', '>', '|'], "_");

    // Limit filename length
    if name.chars().count() > 100 {
        name.chars().take(100).collect()
    } else {
        name
    }
}
