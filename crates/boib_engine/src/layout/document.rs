use scraper::Html;

use super::{first, LayoutError};

/// Outer HTML of the edict body, or the whole page when the container is absent.
pub fn edict_content(html: &str) -> Result<String, LayoutError> {
    let doc = Html::parse_document(html);
    Ok(match first(doc.root_element(), "div#contenidoEdicto")? {
        Some(content) => content.html(),
        None => doc.root_element().html(),
    })
}
