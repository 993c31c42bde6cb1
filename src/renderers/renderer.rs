use crate::error::FetchError;
use crate::results::RawPage;
use std::future::Future;
use url::Url;

/// Something that can turn a URL into fully rendered markup.
///
/// Implementations must release whatever session or connection they acquire
/// before returning, on success and on error.
pub trait Renderer {
    /// Render `url` and return its markup once result nodes are in place
    fn render(&self, url: &Url) -> impl Future<Output = Result<RawPage, FetchError>> + Send;
}
