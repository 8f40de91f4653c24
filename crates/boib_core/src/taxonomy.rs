//! Mapping of raw page labels onto domain enums.

use thiserror::Error;

use crate::{BulletinType, SectionType};

/// Month headings of the yearly calendar, in calendar order.
pub const CATALAN_MONTHS: [&str; 12] = [
    "gener", "febrer", "març", "abril", "maig", "juny", "juliol", "agost", "setembre",
    "octubre", "novembre", "desembre",
];

const SECTION_TITLES: [(&str, SectionType); 4] = [
    ("Disposicions generals", SectionType::General),
    ("Autoritats i personal", SectionType::Personnel),
    (
        "Altres disposicions i actes administratius",
        SectionType::Others,
    ),
    ("Anuncis", SectionType::Announcements),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxonomyError {
    #[error("unknown bulletin type for anchor classes {labels:?}")]
    UnknownBulletinType { labels: Vec<String> },
    #[error("unknown month name {0:?}")]
    UnknownMonth(String),
}

/// Resolves a calendar anchor's CSS classes to a bulletin type.
///
/// An unrecognised class set is an error: the type drives how the rest of the
/// bulletin is read, so a new layout has to be noticed rather than guessed.
pub fn bulletin_type_from_labels<I, S>(labels: I) -> Result<BulletinType, TaxonomyError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let labels: Vec<String> = labels
        .into_iter()
        .map(|label| label.as_ref().to_string())
        .collect();
    if labels.iter().any(|label| label == "ordinario") {
        Ok(BulletinType::Ordinary)
    } else if labels.iter().any(|label| label == "extraordinario") {
        Ok(BulletinType::Extraordinary)
    } else {
        Err(TaxonomyError::UnknownBulletinType { labels })
    }
}

/// Resolves a section heading; anything unknown is a legacy section.
pub fn section_type_from_label(text: &str) -> SectionType {
    SECTION_TITLES
        .iter()
        .find(|(title, _)| *title == text)
        .map(|(_, kind)| *kind)
        .unwrap_or(SectionType::Legacy)
}

/// Returns the 1-based month number of a Catalan month heading.
pub fn month_from_name(name: &str) -> Result<u32, TaxonomyError> {
    let trimmed = name.trim();
    CATALAN_MONTHS
        .iter()
        .position(|month| *month == trimmed)
        .map(|index| index as u32 + 1)
        .ok_or_else(|| TaxonomyError::UnknownMonth(name.to_string()))
}
