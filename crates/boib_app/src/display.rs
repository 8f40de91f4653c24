//! Terminal rendering of extracted bulletins and download reports.

use std::fmt::Write;

use boib_core::{Article, Bulletin, DocumentFormat};
use boib_engine::DownloadReport;

/// Flat listing: bulletin, then its sections, then their articles.
pub fn render_listing(bulletins: &[Bulletin]) -> String {
    let mut out = String::new();
    if bulletins.is_empty() {
        out.push_str("No bulletins found.\n");
        return out;
    }
    for bulletin in bulletins {
        let number = bulletin
            .number
            .map(|n| format!("Núm. {n}"))
            .unwrap_or_else(|| "Núm. ?".to_string());
        let _ = writeln!(
            out,
            "{} {} {} ({} articles) {}",
            bulletin.date,
            bulletin.kind,
            number,
            bulletin.article_count(),
            bulletin.url
        );
        for section in &bulletin.sections {
            let _ = writeln!(out, "  {} {}", section.kind, section.url);
            for article in &section.articles {
                let _ = writeln!(out, "    {}", article_line(article));
            }
        }
    }
    out
}

fn article_line(article: &Article) -> String {
    let number = article
        .number
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".to_string());
    let formats: Vec<&str> = DocumentFormat::ALL
        .into_iter()
        .filter(|format| article.url(*format).is_some())
        .map(DocumentFormat::extension)
        .collect();
    let mut line = format!("[{number}]");
    if let Some(organization) = article.organization.as_deref() {
        let _ = write!(line, " {organization}");
    }
    if let Some(summary) = article.summary.as_deref() {
        let _ = write!(line, ": {summary}");
    }
    if formats.is_empty() {
        line.push_str(" (no documents)");
    } else {
        let _ = write!(line, " ({})", formats.join(", "));
    }
    line
}

pub fn render_json(bulletins: &[Bulletin]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(bulletins)
}

pub fn render_report(report: &DownloadReport) -> String {
    let mut out = String::new();
    for path in &report.written {
        let _ = writeln!(out, "stored {path}");
    }
    let _ = writeln!(
        out,
        "{} documents stored, {} articles without documents, {} unavailable",
        report.written.len(),
        report.exhausted,
        report.unavailable
    );
    out
}
