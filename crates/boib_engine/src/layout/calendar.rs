use boib_core::leading_integer;
use scraper::Html;

use super::{href, require, selector, text_of, LayoutError};

/// One month table of the yearly calendar page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonth {
    pub heading: String,
    pub entries: Vec<CalendarEntry>,
}

/// One bulletin link inside a day cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEntry {
    /// Visible label, e.g. `5` or `5*E` for a same-day extraordinary edition.
    pub label: String,
    pub classes: Vec<String>,
    pub href: String,
}

impl CalendarEntry {
    /// Day of month from the leading digits of the label.
    pub fn day(&self) -> Option<u32> {
        leading_integer(&self.label)
    }
}

/// Month containers in page order with every bulletin anchor they hold.
pub fn parse_calendar(html: &str) -> Result<Vec<CalendarMonth>, LayoutError> {
    let doc = Html::parse_document(html);
    let month_sel = selector("div.calendario_anual_mes")?;
    let anchor_sel = selector("div.boib a")?;

    doc.select(&month_sel)
        .map(|container| -> Result<CalendarMonth, LayoutError> {
            let heading = text_of(require(container, "h3")?);
            let entries = container
                .select(&anchor_sel)
                .map(|anchor| -> Result<CalendarEntry, LayoutError> {
                    Ok(CalendarEntry {
                        label: text_of(anchor),
                        classes: anchor.value().classes().map(str::to_string).collect(),
                        href: href(anchor, "calendar entry href")?.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, LayoutError>>()?;
            Ok(CalendarMonth { heading, entries })
        })
        .collect()
}
