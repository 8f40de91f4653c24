//! Cascading extraction: bulletins, then sections, then articles.
//!
//! Each level fetches its own page, hands the text to a pure parser in
//! [`crate::layout`], and only then awaits the level below, so the traversal is
//! strictly depth-first and in page order.
use std::sync::Arc;

use boib_core::{
    bulletin_type_from_labels, month_from_name, Article, Bulletin, DateQuery, Section,
    SectionType,
};
use boib_logging::{boib_debug, boib_info, boib_warn};
use chrono::NaiveDate;
use url::Url;

use crate::decode::decode_page;
use crate::layout::{
    parse_articles, parse_bulletin_page, parse_calendar, BulletinLayout, CalendarEntry,
};
use crate::{ExtractError, Fetcher, SiteConfig};

/// Fetches a page and decodes it to text.
#[derive(Clone)]
pub struct PageLoader {
    fetcher: Arc<dyn Fetcher>,
}

impl PageLoader {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn load(&self, url: &Url) -> Result<String, ExtractError> {
        let output = self
            .fetcher
            .fetch(url.as_str())
            .await
            .map_err(|source| ExtractError::Fetch {
                url: url.to_string(),
                source,
            })?;
        let page = decode_page(&output).map_err(|source| ExtractError::Decode {
            url: url.to_string(),
            source,
        })?;
        Ok(page.html)
    }
}

#[derive(Clone)]
pub struct ArticleExtractor {
    loader: PageLoader,
    site: SiteConfig,
}

impl ArticleExtractor {
    pub fn new(fetcher: Arc<dyn Fetcher>, site: SiteConfig) -> Self {
        Self {
            loader: PageLoader::new(fetcher),
            site,
        }
    }

    /// Articles of one section listing page, in page order.
    pub async fn extract(&self, section_url: &Url) -> Result<Vec<Article>, ExtractError> {
        let html = self.loader.load(section_url).await?;
        let articles = parse_articles(&html, &self.site.base_domain)
            .map_err(|err| ExtractError::layout(section_url, err))?;
        boib_debug!("{} articles in {}", articles.len(), section_url);
        Ok(articles)
    }
}

#[derive(Clone)]
pub struct SectionExtractor {
    loader: PageLoader,
    site: SiteConfig,
    articles: ArticleExtractor,
}

impl SectionExtractor {
    pub fn new(fetcher: Arc<dyn Fetcher>, site: SiteConfig) -> Self {
        let articles = ArticleExtractor::new(fetcher.clone(), site.clone());
        Self::with_article_extractor(fetcher, site, articles)
    }

    pub fn with_article_extractor(
        fetcher: Arc<dyn Fetcher>,
        site: SiteConfig,
        articles: ArticleExtractor,
    ) -> Self {
        Self {
            loader: PageLoader::new(fetcher),
            site,
            articles,
        }
    }

    /// Sections of one bulletin page with their articles.
    pub async fn extract(&self, bulletin_url: &Url) -> Result<Vec<Section>, ExtractError> {
        let (_, sections) = self.read_bulletin(bulletin_url).await?;
        Ok(sections)
    }

    /// Bulletin number and sections from a single fetch of the bulletin page.
    pub async fn read_bulletin(
        &self,
        bulletin_url: &Url,
    ) -> Result<(Option<u32>, Vec<Section>), ExtractError> {
        let html = self.loader.load(bulletin_url).await?;
        let page = parse_bulletin_page(&html, &self.site.base_domain)
            .map_err(|err| ExtractError::layout(bulletin_url, err))?;

        let sections = match page.layout {
            BulletinLayout::Sections(links) => {
                let mut sections = Vec::with_capacity(links.len());
                for link in links {
                    let articles = self.articles.extract(&link.url).await?;
                    sections.push(Section::new(link.kind, link.url, articles));
                }
                sections
            }
            BulletinLayout::Legacy(article) => {
                boib_debug!("legacy bulletin layout at {}", bulletin_url);
                vec![Section::new(
                    SectionType::Legacy,
                    bulletin_url.clone(),
                    vec![article],
                )]
            }
        };
        Ok((page.number, sections))
    }
}

/// Entry point of the extraction pipeline.
#[derive(Clone)]
pub struct BulletinExtractor {
    loader: PageLoader,
    site: SiteConfig,
    sections: SectionExtractor,
}

struct SelectedEntry {
    entry: CalendarEntry,
    month: u32,
    day: u32,
}

impl BulletinExtractor {
    pub fn new(fetcher: Arc<dyn Fetcher>, site: SiteConfig) -> Self {
        let sections = SectionExtractor::new(fetcher.clone(), site.clone());
        Self::with_section_extractor(fetcher, site, sections)
    }

    pub fn with_section_extractor(
        fetcher: Arc<dyn Fetcher>,
        site: SiteConfig,
        sections: SectionExtractor,
    ) -> Self {
        Self {
            loader: PageLoader::new(fetcher),
            site,
            sections,
        }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Fully populated bulletins for the query, in calendar page order.
    pub async fn extract(&self, query: &DateQuery) -> Result<Vec<Bulletin>, ExtractError> {
        let year = query.year_value();
        let calendar_url = self.site.calendar_url(year)?;
        let selected = self.select_entries(&calendar_url, query).await?;
        boib_info!(
            "{} bulletin entries selected from {}",
            selected.len(),
            calendar_url
        );

        let mut bulletins = Vec::with_capacity(selected.len());
        for SelectedEntry { entry, month, day } in selected {
            let kind = bulletin_type_from_labels(&entry.classes)?;
            let date = NaiveDate::from_ymd_opt(year, month, day)
                .ok_or(ExtractError::InvalidDate { year, month, day })?;
            let url = self.site.resolve(&entry.href)?;

            let (number, sections) = self.sections.read_bulletin(&url).await?;
            if number.is_none() {
                boib_warn!("no bulletin number found on {}", url);
            }
            boib_info!(
                "bulletin {} {} {:?}: {} sections",
                date,
                kind,
                number,
                sections.len()
            );
            bulletins.push(Bulletin::new(number, kind, date, url, sections));
        }
        Ok(bulletins)
    }

    /// Bulletins published on `date`.
    pub async fn extract_date(&self, date: NaiveDate) -> Result<Vec<Bulletin>, ExtractError> {
        self.extract(&DateQuery::from_date(date)).await
    }

    /// Bulletins published today, by the local clock.
    pub async fn extract_today(&self) -> Result<Vec<Bulletin>, ExtractError> {
        self.extract_date(chrono::Local::now().date_naive()).await
    }

    async fn select_entries(
        &self,
        calendar_url: &Url,
        query: &DateQuery,
    ) -> Result<Vec<SelectedEntry>, ExtractError> {
        let html = self.loader.load(calendar_url).await?;
        let mut months =
            parse_calendar(&html).map_err(|err| ExtractError::layout(calendar_url, err))?;

        if let Some(month) = query.month_value() {
            let index = month as usize - 1;
            if index >= months.len() {
                return Err(ExtractError::MissingMonth {
                    url: calendar_url.to_string(),
                    month,
                });
            }
            months = vec![months.swap_remove(index)];
        }

        let mut selected = Vec::new();
        for container in months {
            let mut days = Vec::with_capacity(container.entries.len());
            for entry in container.entries {
                let day = entry.day().ok_or_else(|| ExtractError::MissingDay {
                    url: calendar_url.to_string(),
                    label: entry.label.clone(),
                })?;
                if query.day_value().is_none_or(|wanted| wanted == day) {
                    days.push((entry, day));
                }
            }
            if days.is_empty() {
                continue;
            }

            let month = month_from_name(&container.heading)?;
            selected.extend(
                days.into_iter()
                    .map(|(entry, day)| SelectedEntry { entry, month, day }),
            );
        }
        Ok(selected)
    }
}
