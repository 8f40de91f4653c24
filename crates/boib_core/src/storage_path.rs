use chrono::Datelike;

use crate::{Article, Bulletin, DocumentFormat};

/// Directory used for bulletins whose number could not be read.
pub const UNNUMBERED_BULLETIN: &str = "unnumbered";

/// Registry number of the article, or a fresh UUIDv4 when it has none.
pub fn article_identifier(article: &Article) -> String {
    match article.number {
        Some(number) => number.to_string(),
        None => uuid::Uuid::new_v4().to_string(),
    }
}

/// Storage key `<year>/<MM>/<DD>/<bulletin>/<article>.<ext>`.
pub fn document_path(bulletin: &Bulletin, article_id: &str, format: DocumentFormat) -> String {
    let number = bulletin
        .number
        .map(|number| number.to_string())
        .unwrap_or_else(|| UNNUMBERED_BULLETIN.to_string());
    format!(
        "{year}/{month:02}/{day:02}/{number}/{article_id}.{ext}",
        year = bulletin.date.year(),
        month = bulletin.date.month(),
        day = bulletin.date.day(),
        ext = format.extension(),
    )
}
