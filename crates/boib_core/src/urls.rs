use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use url::Url;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("empty link reference")]
    Empty,
    #[error("cannot resolve {reference:?} against {base}: {message}")]
    Unresolvable {
        reference: String,
        base: String,
        message: String,
    },
}

/// Resolves a page link against the site base.
///
/// References that already carry a scheme are returned unchanged, so resolving
/// a resolved URL is a no-op.
pub fn resolve_url(base: &Url, reference: &str) -> Result<Url, UrlError> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }
    if let Ok(url) = Url::parse(trimmed) {
        return Ok(url);
    }
    base.join(trimmed).map_err(|err| UrlError::Unresolvable {
        reference: trimmed.to_string(),
        base: base.to_string(),
        message: err.to_string(),
    })
}

/// First run of digits in `text`, e.g. `12` in `"Registre 12/2024"`.
pub fn first_integer(text: &str) -> Option<u32> {
    DIGITS.find(text)?.as_str().parse().ok()
}

/// Digits at the very start of `text` (after whitespace), e.g. `5` in `"5*E"`.
pub fn leading_integer(text: &str) -> Option<u32> {
    DIGITS
        .find(text.trim_start())
        .filter(|digits| digits.start() == 0)?
        .as_str()
        .parse()
        .ok()
}
