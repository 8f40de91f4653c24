//! BOIB engine: page fetching, layout parsing, extraction and document download.
mod decode;
mod download;
mod error;
mod extract;
mod fetch;
pub mod layout;
mod site;
pub mod storage;
mod types;

pub use decode::{decode_html, decode_page, DecodeError, DecodedPage};
pub use download::{
    downloader_for, ArticleDownloader, DownloadPipeline, DownloadReport, HtmlDownloader,
    PdfDownloader,
};
pub use error::{DownloadError, ExtractError};
pub use extract::{ArticleExtractor, BulletinExtractor, PageLoader, SectionExtractor};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use site::{SiteConfig, CAIB_BASE_DOMAIN};
pub use storage::{LocalFsSink, ObjectStoreSink, S3Settings, StorageError, StorageSink};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
