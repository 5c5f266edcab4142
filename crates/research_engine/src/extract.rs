use std::sync::Arc;

use research_logging::{research_debug, research_warn};
use scraper::{ElementRef, Html, Selector};

use crate::decode::decode_html;
use crate::fetch::Fetcher;
use crate::text::block_text;
use crate::ScrapedContent;

/// Character cap applied to every excerpt before it reaches a prompt.
pub const MAX_CONTENT_CHARS: usize = 4000;
/// Paragraphs at or below this many characters are treated as chrome.
pub const MIN_PARAGRAPH_CHARS: usize = 50;
/// Paragraph text shorter than this falls back to whole-region text.
pub const MIN_PARAGRAPH_TEXT_CHARS: usize = 200;

/// Regions tried in order when locating the main content.
const REGION_SELECTORS: [&str; 3] = ["main", "article", "body"];

/// Turns a page fetch into a bounded plain-text excerpt.
///
/// Never fails: transport and status errors come back as a `Failed`
/// excerpt whose reason names the URL.
pub struct ContentExtractor {
    fetcher: Arc<dyn Fetcher>,
    max_chars: usize,
}

impl ContentExtractor {
    pub fn new(fetcher: Arc<dyn Fetcher>, max_chars: usize) -> Self {
        Self { fetcher, max_chars }
    }

    pub async fn extract(&self, url: &str) -> ScrapedContent {
        let output = match self.fetcher.fetch(url).await {
            Ok(output) => output,
            Err(err) => {
                research_warn!("extraction failed for {}: {} ({})", url, err.kind, err.message);
                return ScrapedContent::failed(url, format!("failed to fetch {url}: {}", err.kind));
            }
        };

        let content_type = output.metadata.content_type.as_deref();
        let decoded = decode_html(&output.bytes, content_type);
        let text = if is_markup(content_type) {
            extract_main_text(&decoded.html, self.max_chars)
        } else {
            plain_text(&decoded.html, self.max_chars)
        };
        research_debug!(
            "extracted {} chars from {} ({})",
            text.chars().count(),
            url,
            decoded.encoding_label
        );
        ScrapedContent::ok(url, text)
    }
}

/// Main-content text of an HTML document, truncated to `max_chars` characters.
///
/// - region: first of `<main>`, `<article>`, `<body>`, else the document root
/// - paragraphs longer than [`MIN_PARAGRAPH_CHARS`], one per line
/// - if that yields fewer than [`MIN_PARAGRAPH_TEXT_CHARS`], all region text
pub fn extract_main_text(html: &str, max_chars: usize) -> String {
    let doc = Html::parse_document(html);
    let region = main_region(&doc).unwrap_or_else(|| doc.root_element());

    let paragraphs = paragraph_text(region);
    let text = if paragraphs.chars().count() < MIN_PARAGRAPH_TEXT_CHARS {
        block_text(region)
    } else {
        paragraphs
    };
    truncate_chars(&text, max_chars)
}

fn main_region(doc: &Html) -> Option<ElementRef<'_>> {
    REGION_SELECTORS.iter().find_map(|css| {
        Selector::parse(css)
            .ok()
            .and_then(|sel| doc.select(&sel).next())
    })
}

fn paragraph_text(region: ElementRef) -> String {
    let Ok(sel) = Selector::parse("p") else {
        return String::new();
    };
    region
        .select(&sel)
        .map(|p| {
            p.text()
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .collect::<String>()
        })
        .filter(|text| text.chars().count() > MIN_PARAGRAPH_CHARS)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Missing content types are treated as HTML.
fn is_markup(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return true;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase();
    essence.is_empty() || essence.contains("html") || essence.ends_with("xml")
}

/// Non-markup bodies keep their lines, with whitespace collapsed.
fn plain_text(body: &str, max_chars: usize) -> String {
    let text = body
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    truncate_chars(&text, max_chars)
}

pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
