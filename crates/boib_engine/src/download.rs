use std::sync::Arc;

use boib_core::{article_identifier, document_path, Article, Bulletin, DocumentFormat};
use boib_logging::{boib_debug, boib_info, boib_warn};

use crate::decode::decode_page;
use crate::layout::edict_content;
use crate::storage::{StorageError, StorageSink};
use crate::{DownloadError, Fetcher};

/// Fetches the document of an article in one specific format.
#[async_trait::async_trait]
pub trait ArticleDownloader: Send + Sync {
    fn format(&self) -> DocumentFormat;

    /// Document bytes, `FormatUnavailable` when the article has no URL for this
    /// format, `DocumentUnavailable` when the fetch itself fails.
    async fn download(&self, article: &Article) -> Result<Vec<u8>, DownloadError>;
}

/// Stores the PDF export byte for byte.
pub struct PdfDownloader {
    fetcher: Arc<dyn Fetcher>,
}

impl PdfDownloader {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait::async_trait]
impl ArticleDownloader for PdfDownloader {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    async fn download(&self, article: &Article) -> Result<Vec<u8>, DownloadError> {
        let url = article
            .url(DocumentFormat::Pdf)
            .ok_or(DownloadError::FormatUnavailable(DocumentFormat::Pdf))?;
        let output = self
            .fetcher
            .fetch(url.as_str())
            .await
            .map_err(|err| DownloadError::DocumentUnavailable {
                url: url.to_string(),
                reason: err.to_string(),
            })?;
        Ok(output.bytes)
    }
}

/// Stores the edict body of the HTML export.
pub struct HtmlDownloader {
    fetcher: Arc<dyn Fetcher>,
}

impl HtmlDownloader {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait::async_trait]
impl ArticleDownloader for HtmlDownloader {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Html
    }

    async fn download(&self, article: &Article) -> Result<Vec<u8>, DownloadError> {
        let url = article
            .url(DocumentFormat::Html)
            .ok_or(DownloadError::FormatUnavailable(DocumentFormat::Html))?;
        let unavailable = |reason: String| DownloadError::DocumentUnavailable {
            url: url.to_string(),
            reason,
        };
        let output = self
            .fetcher
            .fetch(url.as_str())
            .await
            .map_err(|err| unavailable(err.to_string()))?;
        let page = decode_page(&output).map_err(|err| unavailable(err.to_string()))?;
        let content = edict_content(&page.html).map_err(|err| unavailable(err.to_string()))?;
        Ok(content.into_bytes())
    }
}

pub fn downloader_for(
    format: DocumentFormat,
    fetcher: Arc<dyn Fetcher>,
) -> Box<dyn ArticleDownloader> {
    match format {
        DocumentFormat::Pdf => Box::new(PdfDownloader::new(fetcher)),
        DocumentFormat::Html => Box::new(HtmlDownloader::new(fetcher)),
    }
}

/// What happened to the articles of one or more bulletins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Storage paths written, in article order.
    pub written: Vec<String>,
    /// Articles with no URL in any configured format.
    pub exhausted: usize,
    /// Articles whose document fetch failed.
    pub unavailable: usize,
}

impl DownloadReport {
    pub fn merge(&mut self, other: DownloadReport) {
        self.written.extend(other.written);
        self.exhausted += other.exhausted;
        self.unavailable += other.unavailable;
    }

    pub fn skipped(&self) -> usize {
        self.exhausted + self.unavailable
    }
}

enum ArticleOutcome {
    Written(String),
    Exhausted,
    Unavailable,
}

/// Downloads every article of a bulletin into a storage sink.
pub struct DownloadPipeline {
    downloaders: Vec<Box<dyn ArticleDownloader>>,
    sink: Arc<dyn StorageSink>,
}

impl DownloadPipeline {
    /// Pipeline trying `formats` in order; repeated formats are ignored.
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        sink: Arc<dyn StorageSink>,
        formats: &[DocumentFormat],
    ) -> Self {
        let mut ordered: Vec<DocumentFormat> = Vec::with_capacity(formats.len());
        for format in formats {
            if !ordered.contains(format) {
                ordered.push(*format);
            }
        }
        let downloaders = ordered
            .into_iter()
            .map(|format| downloader_for(format, fetcher.clone()))
            .collect();
        Self::with_downloaders(downloaders, sink)
    }

    pub fn with_downloaders(
        downloaders: Vec<Box<dyn ArticleDownloader>>,
        sink: Arc<dyn StorageSink>,
    ) -> Self {
        Self { downloaders, sink }
    }

    pub fn formats(&self) -> Vec<DocumentFormat> {
        self.downloaders.iter().map(|d| d.format()).collect()
    }

    /// Article failures are counted and skipped; only storage failures abort.
    pub async fn download(&self, bulletin: &Bulletin) -> Result<DownloadReport, StorageError> {
        let mut report = DownloadReport::default();
        for article in bulletin.articles() {
            match self.download_article(bulletin, article).await? {
                ArticleOutcome::Written(path) => report.written.push(path),
                ArticleOutcome::Exhausted => report.exhausted += 1,
                ArticleOutcome::Unavailable => report.unavailable += 1,
            }
        }
        boib_info!(
            "bulletin {} {:?}: {} documents stored, {} skipped",
            bulletin.date,
            bulletin.number,
            report.written.len(),
            report.skipped()
        );
        Ok(report)
    }

    pub async fn download_all(
        &self,
        bulletins: &[Bulletin],
    ) -> Result<DownloadReport, StorageError> {
        let mut total = DownloadReport::default();
        for bulletin in bulletins {
            total.merge(self.download(bulletin).await?);
        }
        Ok(total)
    }

    async fn download_article(
        &self,
        bulletin: &Bulletin,
        article: &Article,
    ) -> Result<ArticleOutcome, StorageError> {
        for downloader in &self.downloaders {
            match downloader.download(article).await {
                Ok(content) => {
                    let id = article_identifier(article);
                    let path = document_path(bulletin, &id, downloader.format());
                    self.sink.write(&path, &content).await?;
                    return Ok(ArticleOutcome::Written(path));
                }
                Err(DownloadError::FormatUnavailable(format)) => {
                    boib_debug!("article {:?} has no {} url", article.number, format);
                }
                Err(err @ DownloadError::DocumentUnavailable { .. }) => {
                    boib_warn!("skipping article {:?}: {}", article.number, err);
                    return Ok(ArticleOutcome::Unavailable);
                }
            }
        }
        Ok(ArticleOutcome::Exhausted)
    }
}
