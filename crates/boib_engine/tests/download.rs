mod common;

use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;

use boib_core::{Article, Bulletin, BulletinType, DocumentFormat, Section, SectionType};
use boib_engine::{DownloadPipeline, LocalFsSink, ObjectStoreSink, StorageError, StorageSink};
use chrono::NaiveDate;
use common::{fetcher, html_response, mount_page};
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PDF: DocumentFormat = DocumentFormat::Pdf;
const HTML: DocumentFormat = DocumentFormat::Html;

fn url(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{route}", server.uri())).unwrap()
}

fn article(number: Option<u32>, urls: Vec<(DocumentFormat, Url)>) -> Article {
    let urls: BTreeMap<_, _> = urls.into_iter().collect();
    Article::new(number, Some("CONSELL".into()), None, urls)
}

fn pdf_article(server: &MockServer, number: u32, route: &str) -> Article {
    article(Some(number), vec![(PDF, url(server, route))])
}

fn bulletin(server: &MockServer, articles: Vec<Article>) -> Bulletin {
    let section = Section::new(SectionType::General, url(server, "/s1"), articles);
    Bulletin::new(
        Some(30),
        BulletinType::Ordinary,
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        url(server, "/b"),
        vec![section],
    )
}

async fn mount_pdf(server: &MockServer, route: &str, body: &'static [u8]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/pdf"))
        .mount(server)
        .await;
}

fn local_pipeline(dir: &TempDir, formats: &[DocumentFormat]) -> DownloadPipeline {
    let sink: Arc<dyn StorageSink> = Arc::new(LocalFsSink::new(dir.path()));
    DownloadPipeline::new(fetcher(), sink, formats)
}

#[tokio::test]
async fn pdf_is_stored_under_date_and_bulletin_number() {
    let server = MockServer::start().await;
    mount_pdf(&server, "/pdf/1234", b"%PDF-1.4 body").await;
    let dir = TempDir::new().unwrap();

    let bulletin = bulletin(&server, vec![pdf_article(&server, 1234, "/pdf/1234")]);
    let report = local_pipeline(&dir, &[PDF, HTML]).download(&bulletin).await.unwrap();

    assert_eq!(report.written, vec!["2024/03/05/30/1234.pdf".to_string()]);
    let stored = fs::read(dir.path().join("2024/03/05/30/1234.pdf")).unwrap();
    assert_eq!(stored, b"%PDF-1.4 body");
}

#[tokio::test]
async fn html_only_article_falls_through_to_html() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/html/77",
        r#"<html><body><nav>menu</nav><div id="contenidoEdicto"><p>Edicte 77</p></div></body></html>"#,
    )
    .await;
    let dir = TempDir::new().unwrap();

    let html_only = article(Some(77), vec![(HTML, url(&server, "/html/77"))]);
    let bulletin = bulletin(&server, vec![html_only]);
    let report = local_pipeline(&dir, &[PDF, HTML]).download(&bulletin).await.unwrap();

    assert_eq!(report.written, vec!["2024/03/05/30/77.html".to_string()]);
    assert_eq!(report.skipped(), 0);
    let stored = fs::read_to_string(dir.path().join("2024/03/05/30/77.html")).unwrap();
    assert!(stored.contains("Edicte 77"));
    assert!(!stored.contains("menu"));
}

#[tokio::test]
async fn preference_order_decides_the_format() {
    let server = MockServer::start().await;
    mount_pdf(&server, "/pdf/5", b"pdf").await;
    mount_page(&server, "/html/5", r#"<div id="contenidoEdicto">html</div>"#).await;
    let dir = TempDir::new().unwrap();

    let both = vec![(PDF, url(&server, "/pdf/5")), (HTML, url(&server, "/html/5"))];
    let bulletin = bulletin(&server, vec![article(Some(5), both)]);
    let report = local_pipeline(&dir, &[HTML, PDF]).download(&bulletin).await.unwrap();

    assert_eq!(report.written, vec!["2024/03/05/30/5.html".to_string()]);
    assert!(!dir.path().join("2024/03/05/30/5.pdf").exists());
}

#[tokio::test]
async fn article_without_urls_is_skipped_quietly() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let bulletin = bulletin(&server, vec![article(None, Vec::new())]);
    let report = local_pipeline(&dir, &[PDF, HTML]).download(&bulletin).await.unwrap();

    assert!(report.written.is_empty());
    assert_eq!(report.exhausted, 1);
    assert_eq!(report.unavailable, 0);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn unavailable_document_skips_article_without_trying_other_formats() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pdf/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/html/404"))
        .respond_with(html_response("<div id=\"contenidoEdicto\">x</div>"))
        .expect(0)
        .mount(&server)
        .await;
    mount_pdf(&server, "/pdf/2", b"second").await;
    let dir = TempDir::new().unwrap();

    let broken = article(
        Some(1),
        vec![(PDF, url(&server, "/pdf/404")), (HTML, url(&server, "/html/404"))],
    );
    let fine = pdf_article(&server, 2, "/pdf/2");
    let bulletin = bulletin(&server, vec![broken, fine]);
    let report = local_pipeline(&dir, &[PDF, HTML]).download(&bulletin).await.unwrap();

    assert_eq!(report.unavailable, 1);
    assert_eq!(report.written, vec!["2024/03/05/30/2.pdf".to_string()]);
    server.verify().await;
}

#[tokio::test]
async fn unnumbered_articles_get_unique_identifiers() {
    let server = MockServer::start().await;
    mount_pdf(&server, "/pdf/legacy", b"legacy").await;
    let dir = TempDir::new().unwrap();

    let legacy = || article(None, vec![(PDF, url(&server, "/pdf/legacy"))]);
    let bulletin = bulletin(&server, vec![legacy(), legacy()]);
    let report = local_pipeline(&dir, &[PDF]).download(&bulletin).await.unwrap();

    assert_eq!(report.written.len(), 2);
    assert_ne!(report.written[0], report.written[1]);
    assert!(report
        .written
        .iter()
        .all(|p| p.starts_with("2024/03/05/30/") && p.ends_with(".pdf")));
}

#[tokio::test]
async fn download_all_sums_reports() {
    let server = MockServer::start().await;
    mount_pdf(&server, "/pdf/1", b"one").await;
    let dir = TempDir::new().unwrap();

    let first = bulletin(&server, vec![pdf_article(&server, 1, "/pdf/1")]);
    let second = bulletin(&server, vec![article(Some(9), Vec::new())]);
    let report = local_pipeline(&dir, &[PDF, HTML])
        .download_all(&[first, second])
        .await
        .unwrap();

    assert_eq!(report.written.len(), 1);
    assert_eq!(report.exhausted, 1);
}

#[tokio::test]
async fn storage_failure_is_propagated() {
    let server = MockServer::start().await;
    mount_pdf(&server, "/pdf/1", b"one").await;
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let sink: Arc<dyn StorageSink> = Arc::new(LocalFsSink::new(&blocker));
    let pipeline = DownloadPipeline::new(fetcher(), sink, &[PDF]);
    let bulletin = bulletin(&server, vec![pdf_article(&server, 1, "/pdf/1")]);

    let err = pipeline.download(&bulletin).await.unwrap_err();
    assert!(matches!(err, StorageError::Persist(_)), "unexpected error {err:?}");
}

#[tokio::test]
async fn object_store_sink_writes_below_prefix() {
    let server = MockServer::start().await;
    mount_pdf(&server, "/pdf/1234", b"object").await;

    let store = Arc::new(InMemory::new());
    let sink: Arc<dyn StorageSink> = Arc::new(ObjectStoreSink::new(store.clone(), Some("/boib/")));
    let pipeline = DownloadPipeline::new(fetcher(), sink, &[PDF]);
    let bulletin = bulletin(&server, vec![pdf_article(&server, 1234, "/pdf/1234")]);

    pipeline.download(&bulletin).await.unwrap();

    let stored = store
        .get(&ObjectPath::from("boib/2024/03/05/30/1234.pdf"))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    assert_eq!(stored.as_ref(), b"object");
}

#[tokio::test]
async fn local_sink_rejects_escaping_paths() {
    let dir = TempDir::new().unwrap();
    let sink = LocalFsSink::new(dir.path());
    let err = sink.write("../outside.pdf", b"x").await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidPath(_)));
}

#[tokio::test]
async fn local_sink_last_write_wins() {
    let dir = TempDir::new().unwrap();
    let sink = LocalFsSink::new(dir.path());
    sink.write("2024/01/02/1/1.pdf", b"first").await.unwrap();
    sink.write("2024/01/02/1/1.pdf", b"second").await.unwrap();
    let stored = fs::read(dir.path().join("2024/01/02/1/1.pdf")).unwrap();
    assert_eq!(stored, b"second");
}
