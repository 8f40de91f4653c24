//! Pure page-shape parsers.
//!
//! Every function here takes page text and returns owned data, so no parsed
//! tree is ever held across an await point by the extractors.
mod bulletin;
mod calendar;
mod document;
mod listing;

pub use bulletin::{parse_bulletin_page, BulletinLayout, BulletinPage, SectionLink};
pub use calendar::{parse_calendar, CalendarEntry, CalendarMonth};
pub use document::edict_content;
pub use listing::{detect_article_layout, parse_articles, ArticleLayout};

use boib_core::UrlError;
use scraper::{ElementRef, Selector};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("invalid selector {css:?}: {message}")]
    Selector { css: &'static str, message: String },
    #[error("expected element missing: {0}")]
    MissingElement(&'static str),
    #[error("page layout not recognized: {0}")]
    NotRecognized(&'static str),
    #[error(transparent)]
    Url(#[from] UrlError),
}

fn selector(css: &'static str) -> Result<Selector, LayoutError> {
    Selector::parse(css).map_err(|err| LayoutError::Selector {
        css,
        message: format!("{err:?}"),
    })
}

fn first<'a>(
    scope: ElementRef<'a>,
    css: &'static str,
) -> Result<Option<ElementRef<'a>>, LayoutError> {
    let sel = selector(css)?;
    Ok(scope.select(&sel).next())
}

fn require<'a>(scope: ElementRef<'a>, css: &'static str) -> Result<ElementRef<'a>, LayoutError> {
    first(scope, css)?.ok_or(LayoutError::MissingElement(css))
}

fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// Element text with runs of whitespace collapsed to single spaces.
fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn href<'a>(anchor: ElementRef<'a>, what: &'static str) -> Result<&'a str, LayoutError> {
    anchor
        .value()
        .attr("href")
        .ok_or(LayoutError::MissingElement(what))
}
