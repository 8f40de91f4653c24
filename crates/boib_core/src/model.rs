use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BulletinType {
    Ordinary,
    Extraordinary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectionType {
    General,
    Personnel,
    Others,
    Announcements,
    /// Free-form sections of older bulletins.
    Legacy,
}

/// Document formats an article can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Html,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 2] = [DocumentFormat::Pdf, DocumentFormat::Html];

    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Html => "html",
        }
    }

    /// Parses `pdf`/`html`, ignoring ASCII case and surrounding whitespace.
    pub fn from_extension(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for BulletinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BulletinType::Ordinary => write!(f, "ORDINARY"),
            BulletinType::Extraordinary => write!(f, "EXTRAORDINARY"),
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SectionType::General => "GENERAL",
            SectionType::Personnel => "PERSONNEL",
            SectionType::Others => "OTHERS",
            SectionType::Announcements => "ANNOUNCEMENTS",
            SectionType::Legacy => "LEGACY",
        };
        f.write_str(label)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One published notice inside a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    /// Registry number; older and some grouped listings carry none.
    pub number: Option<u32>,
    pub organization: Option<String>,
    pub summary: Option<String>,
    pub urls: BTreeMap<DocumentFormat, Url>,
}

impl Article {
    pub fn new(
        number: Option<u32>,
        organization: Option<String>,
        summary: Option<String>,
        urls: BTreeMap<DocumentFormat, Url>,
    ) -> Self {
        Self {
            number,
            organization,
            summary,
            urls,
        }
    }

    pub fn url(&self, format: DocumentFormat) -> Option<&Url> {
        self.urls.get(&format)
    }

    pub fn is_downloadable(&self) -> bool {
        !self.urls.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    #[serde(rename = "type")]
    pub kind: SectionType,
    pub url: Url,
    pub articles: Vec<Article>,
}

impl Section {
    pub fn new(kind: SectionType, url: Url, articles: Vec<Article>) -> Self {
        Self {
            kind,
            url,
            articles,
        }
    }
}

/// One gazette issue with its fully extracted section tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bulletin {
    pub number: Option<u32>,
    #[serde(rename = "type")]
    pub kind: BulletinType,
    pub date: NaiveDate,
    pub url: Url,
    pub sections: Vec<Section>,
}

impl Bulletin {
    pub fn new(
        number: Option<u32>,
        kind: BulletinType,
        date: NaiveDate,
        url: Url,
        sections: Vec<Section>,
    ) -> Self {
        Self {
            number,
            kind,
            date,
            url,
            sections,
        }
    }

    /// Articles of every section in page order.
    pub fn articles(&self) -> impl Iterator<Item = &Article> {
        self.sections.iter().flat_map(|section| section.articles.iter())
    }

    pub fn article_count(&self) -> usize {
        self.sections.iter().map(|section| section.articles.len()).sum()
    }
}
