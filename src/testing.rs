//! Test doubles shared by the driver and pipeline tests.

use crate::error::HarvestError;
use crate::renderers::PageRenderer;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use url::Url;

/// Serves scripted page sources in order and records what it was asked for
pub struct ScriptedRenderer {
    pages: VecDeque<Result<String, HarvestError>>,
    pub visited: Arc<Mutex<Vec<String>>>,
    pub closed: Arc<Mutex<usize>>,
}

impl ScriptedRenderer {
    pub fn new(pages: Vec<Result<String, HarvestError>>) -> Self {
        Self {
            pages: pages.into(),
            visited: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(Mutex::new(0)),
        }
    }
}

impl PageRenderer for ScriptedRenderer {
    async fn render(&mut self, url: &Url) -> Result<String, HarvestError> {
        self.visited.lock().unwrap().push(url.to_string());
        self.pages
            .pop_front()
            .unwrap_or_else(|| Ok("<html><body></body></html>".to_string()))
    }

    async fn close(self) -> Result<(), HarvestError> {
        *self.closed.lock().unwrap() += 1;
        Ok(())
    }
}

/// One listing container, optionally without its title or date node
pub fn container(title: Option<&str>, date: Option<&str>) -> String {
    let mut html = String::from(r#"<div class="function-bar px-0 py-3">"#);
    if let Some(title) = title {
        html.push_str(&format!(r#"<h4 class="overflow-text-3">{}</h4>"#, title));
    }
    if let Some(date) = date {
        html.push_str(&format!(r#"<div class="date">{}</div>"#, date));
    }
    html.push_str("</div>");
    html
}

/// One listing container with a title, optionally without its date node
pub fn item(title: &str, date: Option<&str>) -> String {
    container(Some(title), date)
}

/// Page source holding the given containers
pub fn page_source(items: &[String]) -> String {
    format!("<html><body>{}</body></html>", items.concat())
}

/// A rendered page holding the given containers
pub fn page(items: &[String]) -> Result<String, HarvestError> {
    Ok(page_source(items))
}

pub fn navigation_failure(url: &str) -> Result<String, HarvestError> {
    Err(HarvestError::Navigation {
        url: url.to_string(),
        source: "connection refused".into(),
    })
}
