#![allow(dead_code)]

use std::sync::{Arc, Once};

use boib_core::CATALAN_MONTHS;
use boib_engine::{BulletinExtractor, FetchSettings, Fetcher, ReqwestFetcher, SiteConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One calendar anchor: (css class, visible label, href).
pub type Entry<'a> = (&'a str, &'a str, &'a str);

/// Yearly calendar with all twelve month containers; `entries` fills some of them.
pub fn year_calendar(entries: &[(u32, Vec<Entry<'_>>)]) -> String {
    let mut html = String::from("<html><body>");
    for (index, name) in CATALAN_MONTHS.iter().enumerate() {
        let month = index as u32 + 1;
        html.push_str(&format!(
            r#"<div class="calendario_anual_mes"><h3>{name}</h3><table><tr>"#
        ));
        for (_, cells) in entries.iter().filter(|(m, _)| *m == month) {
            for (class, label, href) in cells {
                html.push_str(&format!(
                    r#"<td><div class="boib"><a class="{class}" href="{href}">{label}</a></div></td>"#
                ));
            }
        }
        html.push_str("</tr></table></div>");
    }
    html.push_str("</body></html>");
    html
}

pub fn bulletin_page(number: Option<u32>, sections: &[(&str, &str)]) -> String {
    let heading = number
        .map(|n| format!("<h2>BOIB Núm. {n}</h2>"))
        .unwrap_or_default();
    let links: String = sections
        .iter()
        .map(|(title, href)| {
            format!(r#"<li><a rel="section" href="{href}"><em>{title}</em></a></li>"#)
        })
        .collect();
    format!(r#"<html><body>{heading}<ul class="primerosHijos">{links}</ul></body></html>"#)
}

pub fn legacy_bulletin_page(number: u32, pdf_href: &str) -> String {
    format!(
        r#"<html><body><h2>Núm. {number}</h2><ul class="llistat"><li><div class="caja">
        <a class="pdf" href="{pdf_href}">Descarregar</a></div></li></ul></body></html>"#
    )
}

/// Standard listing card: (organization, summary, registry, pdf href, html href).
pub type Card<'a> = (&'a str, &'a str, Option<u32>, &'a str, Option<&'a str>);

pub fn standard_listing(cards: &[Card<'_>]) -> String {
    let mut html = String::from(r#"<html><body><ul class="llistat">"#);
    for (organization, summary, registry, pdf, html_href) in cards {
        let registry = registry
            .map(|n| format!(r#"<p class="registre">Núm. registre {n}</p>"#))
            .unwrap_or_default();
        let html_link = html_href
            .map(|href| format!(r#"<li><a aria-label="Exportar a HTML" href="{href}">HTML</a></li>"#))
            .unwrap_or_default();
        html.push_str(&format!(
            r#"<li><div class="caja"><h3 class="organisme">{organization}</h3>
            <ul class="resolucions"><li><p>{summary}</p>{registry}</li></ul>
            <ul class="documents"><li><a aria-label="Exportar a PDF" href="{pdf}">PDF</a></li>{html_link}</ul>
            </div></li>"#
        ));
    }
    html.push_str("</ul></body></html>");
    html
}

pub fn grouped_listing(heading: &str, items: &[GroupedItem<'_>]) -> String {
    let mut html = format!(
        r#"<html><body><div class="grupoPrincipal"><h2>{heading}</h2><ul class="llistat">"#
    );
    for item in items {
        match item {
            GroupedItem::Heading(text) => html.push_str(&format!("<li><h3>{text}</h3></li>")),
            GroupedItem::Card { summary, pdf } => html.push_str(&format!(
                r#"<li><div class="caja"><p>{summary}</p><a class="pdf" href="{pdf}">pdf</a></div></li>"#
            )),
        }
    }
    html.push_str("</ul></div></body></html>");
    html
}

pub enum GroupedItem<'a> {
    Heading(&'a str),
    Card { summary: &'a str, pdf: &'a str },
}

pub fn html_response(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into().into_bytes(), "text/html; charset=utf-8")
}

pub async fn mount_page(server: &MockServer, page_path: &str, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_response(body))
        .mount(server)
        .await;
}

pub async fn mount_calendar(server: &MockServer, year: i32, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path("/eboibfront/calendariAnual.do"))
        .and(query_param("p_any", year.to_string()))
        .respond_with(html_response(body))
        .mount(server)
        .await;
}

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(boib_logging::initialize_for_tests);
}

pub fn fetcher() -> Arc<dyn Fetcher> {
    init_logging();
    Arc::new(ReqwestFetcher::new(FetchSettings::default()))
}

pub fn site(server: &MockServer) -> SiteConfig {
    SiteConfig::parse(&server.uri()).unwrap()
}

pub fn extractor(server: &MockServer) -> BulletinExtractor {
    BulletinExtractor::new(fetcher(), site(server))
}
