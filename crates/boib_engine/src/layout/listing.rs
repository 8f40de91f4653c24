use std::collections::BTreeMap;

use boib_core::{first_integer, resolve_url, Article, DocumentFormat};
use scraper::{ElementRef, Html};
use url::Url;

use super::{first, has_class, href, non_empty, require, selector, text_of, LayoutError};

const PDF_LINK: &str = r#"a.pdf, a[aria-label="Exportar a PDF"]"#;
const HTML_LINK: &str = r#"a[aria-label="Exportar a HTML"]"#;

/// Shape of a section listing page, decided once per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleLayout {
    /// Articles nested under organization subheadings of one main group.
    Grouped,
    /// A single bare card without organization or registry markup.
    Legacy,
    /// One organization card per article with PDF and HTML exports.
    Standard,
}

impl ArticleLayout {
    pub fn extract(self, doc: &Html, base: &Url) -> Result<Vec<Article>, LayoutError> {
        match self {
            ArticleLayout::Grouped => grouped_articles(doc, base),
            ArticleLayout::Legacy => Ok(vec![legacy_article(doc, base)?]),
            ArticleLayout::Standard => standard_articles(doc, base),
        }
    }
}

pub fn detect_article_layout(doc: &Html) -> Result<ArticleLayout, LayoutError> {
    let root = doc.root_element();
    if first(root, "div.grupoPrincipal")?.is_some() {
        return Ok(ArticleLayout::Grouped);
    }

    let cards = selector("div.caja")?;
    let structured = first(root, ".organisme, .registre")?.is_some();
    if !structured && doc.select(&cards).count() == 1 {
        return Ok(ArticleLayout::Legacy);
    }
    Ok(ArticleLayout::Standard)
}

/// Articles of a section listing page, in page order.
pub fn parse_articles(html: &str, base: &Url) -> Result<Vec<Article>, LayoutError> {
    let doc = Html::parse_document(html);
    detect_article_layout(&doc)?.extract(&doc, base)
}

pub(super) fn legacy_article(doc: &Html, base: &Url) -> Result<Article, LayoutError> {
    let card = require(doc.root_element(), "div.caja")?;
    let pdf = require(card, PDF_LINK)?;
    let urls = BTreeMap::from([(
        DocumentFormat::Pdf,
        resolve_url(base, href(pdf, "legacy pdf href")?)?,
    )]);
    Ok(Article::new(None, None, None, urls))
}

fn standard_articles(doc: &Html, base: &Url) -> Result<Vec<Article>, LayoutError> {
    let listing = require(doc.root_element(), "ul.llistat")?;
    let cards = selector("div.caja")?;

    listing
        .select(&cards)
        .map(|card| -> Result<Article, LayoutError> {
            let organization = first(card, "h3.organisme")?.map(text_of).and_then(non_empty);
            let summary = match first(card, "ul.resolucions")? {
                Some(resolutions) => summary_of(resolutions)?,
                None => summary_of(card)?,
            };

            let mut urls = BTreeMap::new();
            let pdf = require(card, PDF_LINK)?;
            urls.insert(
                DocumentFormat::Pdf,
                resolve_url(base, href(pdf, "pdf export href")?)?,
            );
            if let Some(html) = first(card, HTML_LINK)? {
                urls.insert(
                    DocumentFormat::Html,
                    resolve_url(base, href(html, "html export href")?)?,
                );
            }

            Ok(Article::new(registry_number(card)?, organization, summary, urls))
        })
        .collect()
}

fn grouped_articles(doc: &Html, base: &Url) -> Result<Vec<Article>, LayoutError> {
    let group = require(doc.root_element(), "div.grupoPrincipal")?;
    let heading = text_of(require(group, "h2")?);
    let prefix = heading
        .split_once(" - ")
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or(heading);
    let listing = require(group, "ul.llistat")?;

    let mut subheading: Option<String> = None;
    let mut articles = Vec::new();
    for element in listing.descendants().filter_map(ElementRef::wrap) {
        let name = element.value().name();
        if matches!(name, "h3" | "h4") && !inside_card(element) {
            subheading = non_empty(text_of(element));
        } else if name == "div" && has_class(element, "caja") {
            let organization = match subheading.as_deref() {
                Some(sub) => format!("{prefix} {sub}"),
                None => prefix.clone(),
            };
            let pdf = require(element, PDF_LINK)?;
            let urls = BTreeMap::from([(
                DocumentFormat::Pdf,
                resolve_url(base, href(pdf, "grouped pdf href")?)?,
            )]);
            articles.push(Article::new(
                registry_number(element)?,
                Some(organization),
                summary_of(element)?,
                urls,
            ));
        }
    }
    Ok(articles)
}

fn inside_card(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().name() == "div" && has_class(ancestor, "caja"))
}

fn registry_number(card: ElementRef<'_>) -> Result<Option<u32>, LayoutError> {
    Ok(first(card, ".registre")?.and_then(|label| first_integer(&text_of(label))))
}

/// First paragraph that is not the registry label.
fn summary_of(scope: ElementRef<'_>) -> Result<Option<String>, LayoutError> {
    let paragraphs = selector("p")?;
    Ok(scope
        .select(&paragraphs)
        .find(|p| !has_class(*p, "registre"))
        .map(text_of)
        .and_then(non_empty))
}
