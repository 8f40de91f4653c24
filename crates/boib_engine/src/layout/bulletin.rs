use std::sync::LazyLock;

use boib_core::{resolve_url, section_type_from_label, Article, SectionType};
use regex::Regex;
use scraper::Html;
use url::Url;

use super::listing::legacy_article;
use super::{first, href, require, selector, text_of, LayoutError};

static BULLETIN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"N[úu]m(?:ero)?\.?\s*(\d+)").expect("valid regex"));

/// Link to one section listing of a bulletin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLink {
    pub kind: SectionType,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulletinLayout {
    /// Current layout: a list of links to section listings.
    Sections(Vec<SectionLink>),
    /// Older layout: the bulletin page itself holds one document card.
    Legacy(Article),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletinPage {
    pub number: Option<u32>,
    pub layout: BulletinLayout,
}

pub fn parse_bulletin_page(html: &str, base: &Url) -> Result<BulletinPage, LayoutError> {
    let doc = Html::parse_document(html);
    let root = doc.root_element();

    let layout = if let Some(list) = first(root, "ul.primerosHijos")? {
        let links = selector(r#"a[rel="section"]"#)?;
        let sections = list
            .select(&links)
            .map(|anchor| -> Result<SectionLink, LayoutError> {
                let title = text_of(require(anchor, "em")?);
                Ok(SectionLink {
                    kind: section_type_from_label(&title),
                    url: resolve_url(base, href(anchor, "section href")?)?,
                })
            })
            .collect::<Result<Vec<_>, LayoutError>>()?;
        BulletinLayout::Sections(sections)
    } else if doc.select(&selector("div.caja")?).count() == 1 {
        BulletinLayout::Legacy(legacy_article(&doc, base)?)
    } else {
        return Err(LayoutError::NotRecognized(
            "bulletin page has neither section links nor a single content card",
        ));
    };

    Ok(BulletinPage {
        number: bulletin_number(&doc),
        layout,
    })
}

fn bulletin_number(doc: &Html) -> Option<u32> {
    doc.root_element().text().find_map(|chunk| {
        BULLETIN_NUMBER
            .captures(chunk)
            .and_then(|caps| caps.get(1))
            .and_then(|digits| digits.as_str().parse().ok())
    })
}
