use crate::error::HarvestError;
use url::Url;

/// A browser session that can turn a listing URL into rendered page source.
///
/// One renderer serves every page of a run. Implementations keep their
/// session state (cookies, viewport) between calls to `render`.
#[allow(async_fn_in_trait)]
pub trait PageRenderer {
    /// Navigate to `url`, wait for dynamic content and return the page source
    async fn render(&mut self, url: &Url) -> Result<String, HarvestError>;

    /// Release the underlying session
    async fn close(self) -> Result<(), HarvestError>;
}
