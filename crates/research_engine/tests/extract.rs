use std::sync::Arc;

use pretty_assertions::assert_eq;
use research_engine::{
    decode_html, extract_main_text, ContentExtractor, ExtractionStatus, FetchSettings,
    ReqwestFetcher, MAX_CONTENT_CHARS, MIN_PARAGRAPH_TEXT_CHARS,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LONG_A: &str = "Ownership is a set of rules that govern how a Rust program manages memory at runtime.";
const LONG_B: &str = "Borrowing lets code refer to a value without taking ownership of it, checked at compile time.";
const LONG_C: &str = "Lifetimes describe how long references stay valid so that dangling pointers cannot be created.";

fn extractor() -> ContentExtractor {
    ContentExtractor::new(
        Arc::new(ReqwestFetcher::new(FetchSettings::default())),
        MAX_CONTENT_CHARS,
    )
}

#[test]
fn decode_respects_charset_header() {
    let bytes = b"caf\xe9"; // iso-8859-1
    let decoded = decode_html(bytes, Some("text/html; charset=ISO-8859-1"));
    assert_eq!(decoded.html, "café");
    assert!(!decoded.had_errors);
}

#[test]
fn decode_handles_utf8_bom() {
    let decoded = decode_html(b"\xEF\xBB\xBFhello", Some("text/html"));
    assert_eq!(decoded.html, "hello");
    assert_eq!(decoded.encoding_label, "UTF-8");
}

#[test]
fn decode_is_lossy_on_malformed_bytes() {
    let decoded = decode_html(b"ok \xff\xfe end", Some("text/html; charset=utf-8"));
    assert!(decoded.had_errors);
    assert!(decoded.html.starts_with("ok "));
    assert!(decoded.html.ends_with(" end"));
}

#[test]
fn long_paragraphs_in_main_are_joined_by_newlines() {
    let html = format!(
        "<html><body><nav><p>{LONG_C}</p></nav><main><p>{LONG_A}</p><p>short one</p><p>{LONG_B}</p><p>{LONG_C}</p></main></body></html>"
    );
    let text = extract_main_text(&html, MAX_CONTENT_CHARS);
    assert_eq!(text, format!("{LONG_A}\n{LONG_B}\n{LONG_C}"));
}

#[test]
fn article_is_used_when_main_is_absent() {
    let html = format!(
        "<html><body><div><p>{LONG_C}</p></div><article><p>{LONG_A}</p><p>{LONG_B}</p><p>{LONG_A}</p></article></body></html>"
    );
    let text = extract_main_text(&html, MAX_CONTENT_CHARS);
    assert!(!text.contains(LONG_C));
    assert!(text.starts_with(LONG_A));
}

#[test]
fn body_is_used_when_no_semantic_region_exists() {
    let html = format!("<html><body><div><p>{LONG_A}</p><p>{LONG_B}</p><p>{LONG_C}</p></div></body></html>");
    let text = extract_main_text(&html, MAX_CONTENT_CHARS);
    assert_eq!(text, format!("{LONG_A}\n{LONG_B}\n{LONG_C}"));
}

#[test]
fn paragraph_text_strips_inner_whitespace_per_node() {
    let html = format!(
        "<html><body><main><p>  {LONG_A}  <em> emphasis </em></p><p>{LONG_B}</p><p>{LONG_C}</p></main></body></html>"
    );
    let text = extract_main_text(&html, MAX_CONTENT_CHARS);
    assert!(text.starts_with(&format!("{LONG_A}emphasis\n")));
}

#[test]
fn sparse_paragraphs_fall_back_to_region_text() {
    let html = format!(
        "<html><body><main><h1>Heading</h1><p>{LONG_A}</p><ul><li>item one</li><li>item two</li></ul><script>ignored()</script></main></body></html>"
    );
    assert!(LONG_A.len() < MIN_PARAGRAPH_TEXT_CHARS);
    let text = extract_main_text(&html, MAX_CONTENT_CHARS);
    assert_eq!(text, format!("Heading\n{LONG_A}\nitem one\nitem two"));
}

#[test]
fn page_without_paragraphs_uses_block_text() {
    let html = "<html><body><div>Alpha</div><div>Beta <span>gamma</span></div></body></html>";
    assert_eq!(extract_main_text(html, MAX_CONTENT_CHARS), "Alpha\nBeta gamma");
}

#[test]
fn output_is_capped() {
    let paragraph = "x".repeat(300);
    let html = format!("<html><body><main>{}</main></body></html>", format!("<p>{paragraph}</p>").repeat(30));
    let text = extract_main_text(&html, MAX_CONTENT_CHARS);
    assert_eq!(text.chars().count(), MAX_CONTENT_CHARS);
}

#[test]
fn empty_document_yields_empty_text() {
    assert_eq!(extract_main_text("", MAX_CONTENT_CHARS), "");
}

#[tokio::test]
async fn extractor_returns_ok_text_for_successful_page() {
    let server = MockServer::start().await;
    let html = format!("<html><body><article><p>{LONG_A}</p><p>{LONG_B}</p><p>{LONG_C}</p></article></body></html>");
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"))
        .mount(&server)
        .await;

    let url = format!("{}/page", server.uri());
    let scraped = extractor().extract(&url).await;
    assert_eq!(scraped.status, ExtractionStatus::Ok);
    assert_eq!(scraped.source_url, url);
    assert!(scraped.text.contains(LONG_B));
}

#[tokio::test]
async fn extractor_reports_failure_with_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let url = format!("{}/gone", server.uri());
    let scraped = extractor().extract(&url).await;
    match scraped.status {
        ExtractionStatus::Failed(reason) => {
            assert!(reason.contains(&url), "reason should name the url: {reason}");
            assert!(reason.contains("500"));
        }
        ExtractionStatus::Ok => panic!("expected failure"),
    }
    assert!(scraped.text.is_empty());
}

#[tokio::test]
async fn extractor_reports_connection_failure() {
    // Nothing listens on port 9 of localhost in test environments.
    let url = "http://127.0.0.1:9/unreachable";
    let scraped = extractor().extract(url).await;
    assert!(!scraped.is_ok());
    assert!(matches!(&scraped.status, ExtractionStatus::Failed(reason) if reason.contains(url)));
}

#[tokio::test]
async fn empty_successful_page_is_ok_and_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("", "text/html"))
        .mount(&server)
        .await;

    let scraped = extractor().extract(&format!("{}/empty", server.uri())).await;
    assert_eq!(scraped.status, ExtractionStatus::Ok);
    assert_eq!(scraped.text, "");
}

#[tokio::test]
async fn plain_text_page_is_ok_not_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doc.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!("{LONG_A}\n\n   {LONG_B}   \n"),
            "text/plain; charset=utf-8",
        ))
        .mount(&server)
        .await;

    let scraped = extractor().extract(&format!("{}/doc.txt", server.uri())).await;
    assert_eq!(scraped.status, ExtractionStatus::Ok);
    assert_eq!(scraped.text, format!("{LONG_A}\n{LONG_B}"));
}
