use boib_core::{DocumentFormat, TaxonomyError, UrlError};
use thiserror::Error;

use crate::layout::LayoutError;
use crate::{DecodeError, FetchError};

/// Failures while building the bulletin tree. All of them abort the query.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to fetch {url}: {source}")]
    Fetch { url: String, source: FetchError },
    #[error("failed to decode {url}: {source}")]
    Decode { url: String, source: DecodeError },
    #[error("unexpected page layout at {url}: {source}")]
    Layout { url: String, source: LayoutError },
    #[error("calendar page {url} has no container for month {month}")]
    MissingMonth { url: String, month: u32 },
    #[error("calendar entry {label:?} at {url} has no day number")]
    MissingDay { url: String, label: String },
    #[error("{year}-{month:02}-{day:02} is not a valid date")]
    InvalidDate { year: i32, month: u32, day: u32 },
    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),
    #[error(transparent)]
    Url(#[from] UrlError),
}

impl ExtractError {
    pub(crate) fn layout(url: &url::Url, source: LayoutError) -> Self {
        ExtractError::Layout {
            url: url.to_string(),
            source,
        }
    }

    /// True when the page shape itself was not recognised.
    pub fn is_layout_not_recognized(&self) -> bool {
        matches!(
            self,
            ExtractError::Layout {
                source: LayoutError::NotRecognized(_),
                ..
            }
        )
    }
}

/// Per-article download failures; the pipeline recovers from both.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("article has no {0} url")]
    FormatUnavailable(DocumentFormat),
    #[error("document {url} unavailable: {reason}")]
    DocumentUnavailable { url: String, reason: String },
}
