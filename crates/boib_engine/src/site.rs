use boib_core::{resolve_url, UrlError};
use url::Url;

pub const CAIB_BASE_DOMAIN: &str = "https://www.caib.es";

/// Where the bulletin site lives; every relative link resolves against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub base_domain: Url,
}

impl SiteConfig {
    pub fn new(base_domain: Url) -> Self {
        Self { base_domain }
    }

    pub fn parse(base_domain: &str) -> Result<Self, UrlError> {
        let base = Url::parse(base_domain).map_err(|err| UrlError::Unresolvable {
            reference: base_domain.to_string(),
            base: String::new(),
            message: err.to_string(),
        })?;
        Ok(Self::new(base))
    }

    pub fn calendar_url(&self, year: i32) -> Result<Url, UrlError> {
        self.resolve(&format!(
            "/eboibfront/calendariAnual.do?lang=ca&p_any={year}"
        ))
    }

    pub fn resolve(&self, reference: &str) -> Result<Url, UrlError> {
        resolve_url(&self.base_domain, reference)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::parse(CAIB_BASE_DOMAIN).expect("static base domain")
    }
}
