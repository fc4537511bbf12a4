use harvest::{
    extractor::{ExtractorKind, WordPressOptions},
    fetcher::{FetchOptions, HttpFetcher},
    normalizer::Normalizer,
    pipeline::{Pipeline, read_url_list},
    record::{Assembler, SiteProfile, record_id},
    store::{JsonlStore, RecordStore},
};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const STORAGE_TIPS: &str = "Store flour in an airtight container in a cool, dark cupboard. \
Whole wheat flour keeps longer in the freezer because its oils go rancid at room temperature. \
Label each jar with the date you opened the bag.";

fn post(title: &str, body_html: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8"><title>{title} - Pantry Notes</title></head>
        <body><article><h1 class="entry-title">{title}</h1>
        <div class="entry-content">{body_html}
        <div class="comments-area"><p>Leave a Reply</p></div></div></article></body></html>"#
    )
}

async fn mount_page(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

fn pipeline(output: &Path) -> Pipeline {
    let extractor = ExtractorKind::WordPress
        .build(WordPressOptions::default())
        .unwrap();
    Pipeline::new(
        Arc::new(HttpFetcher::new(&FetchOptions::default()).unwrap()),
        extractor,
        Normalizer::default(),
        Assembler::new(SiteProfile::new("pantrynotes.example")),
        Arc::new(JsonlStore::new(output)),
    )
    .with_concurrency(2)
}

fn read_lines(output: &Path) -> Vec<Value> {
    std::fs::read_to_string(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_scrape_writes_anonymized_records() {
    let server = MockServer::start().await;
    let body = format!(
        r#"<p>{STORAGE_TIPS}</p>
        <figure><img src="/uploads/jars.jpg" width="600"><figcaption>Jars on a shelf</figcaption></figure>
        <p>Questions? Email pantry@example.com or call 555-123-4567 😀</p>"#
    );
    mount_page(&server, "/flour", post("Storing Flour", &body)).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");
    let url = format!("{}/flour", server.uri());

    let summary = pipeline(&output).run(&[url.clone()]).await.unwrap();
    assert_eq!(summary.scraped, 1);

    let lines = read_lines(&output);
    assert_eq!(lines.len(), 1);
    let record = &lines[0];
    let info = &record["meta"]["data_info"];

    assert_eq!(record["ID"], record_id(&url));
    assert_eq!(info["url"], url.as_str());
    assert_eq!(info["source"], "pantrynotes.example");
    assert_eq!(info["title"], "Storing Flour");

    let content = info["content"].as_str().unwrap();
    let image = format!("[image: {}/uploads/jars.jpg]", server.uri());
    assert!(content.contains(&image));
    assert!(content.contains("Caption: Jars on a shelf"));
    assert!(content.contains("Email xxxxxxxxxxxxxxxxxx or call xxxxxxxxxxxx"));
    assert!(!content.contains('😀'));
    assert!(!content.contains("Leave a Reply"));
    assert_eq!(
        record["Text"].as_str().unwrap(),
        format!("Storing Flour\n{content}")
    );
}

#[tokio::test]
async fn test_short_pages_are_skipped() {
    let server = MockServer::start().await;
    mount_page(&server, "/short", post("Quick Note", "<p>Too short to keep.</p>")).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");
    let url = format!("{}/short", server.uri());

    let summary = pipeline(&output).run(&[url]).await.unwrap();
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.scraped, 0);
    assert!(!output.exists() || read_lines(&output).is_empty());
}

#[tokio::test]
async fn test_resume_only_processes_new_urls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(post("A", &format!("<p>{STORAGE_TIPS}</p>")), "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/b", post("B", &format!("<p>{STORAGE_TIPS}</p>"))).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");
    let input = dir.path().join("urls.txt");
    let a = format!("{}/a", server.uri());
    let b = format!("{}/b", server.uri());

    std::fs::write(&input, format!("{a}\n")).unwrap();
    let first = pipeline(&output)
        .run(&read_url_list(&input).await.unwrap())
        .await
        .unwrap();
    assert_eq!(first.scraped, 1);

    // a malformed line left behind by an interrupted run
    let mut existing = std::fs::read_to_string(&output).unwrap();
    existing.push_str("{\"truncated\": \n");
    std::fs::write(&output, existing).unwrap();

    std::fs::write(&input, format!("{a}\n{b}\n{b}\n")).unwrap();
    let second = pipeline(&output)
        .run(&read_url_list(&input).await.unwrap())
        .await
        .unwrap();
    assert_eq!(second.already_done, 1);
    assert_eq!(second.attempted, 1);
    assert_eq!(second.scraped, 1);

    let seen = JsonlStore::new(&output).seen_urls().await.unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen.contains(&a) && seen.contains(&b));
}

#[tokio::test]
async fn test_failures_do_not_abort_batch() {
    let server = MockServer::start().await;
    mount_page(&server, "/good", post("Good", &format!("<p>{STORAGE_TIPS}</p>"))).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;
    mount_page(&server, "/tag", "<html><head><title>Tag</title></head><body></body></html>".to_string()).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");
    let urls = vec![
        format!("{}/gone", server.uri()),
        format!("{}/tag", server.uri()),
        format!("{}/good", server.uri()),
    ];

    let summary = pipeline(&output).run(&urls).await.unwrap();
    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.scraped, 1);
    assert_eq!(read_lines(&output).len(), 1);
}
