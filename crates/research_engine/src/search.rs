use std::collections::HashSet;
use std::time::Duration;

use reqwest::header::ACCEPT;
use research_logging::{research_debug, research_info};
use scraper::{Html, Selector};
use url::Url;

use crate::fetch::BROWSER_USER_AGENT;
use crate::SearchResult;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("invalid search endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("search request timed out")]
    Timeout,
    #[error("search provider returned http status {0}")]
    HttpStatus(u16),
    #[error("search request failed: {0}")]
    Network(String),
    #[error("could not parse search results: {0}")]
    Parse(String),
}

/// Ranked web search.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError>;
}

#[derive(Debug, Clone)]
pub struct DuckDuckGoSettings {
    pub endpoint: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for DuckDuckGoSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://html.duckduckgo.com/html/".to_string(),
            request_timeout: Duration::from_secs(15),
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

/// Scrapes the DuckDuckGo HTML endpoint, which needs no API key.
#[derive(Debug, Clone)]
pub struct DuckDuckGoSearch {
    settings: DuckDuckGoSettings,
    http: reqwest::Client,
}

impl DuckDuckGoSearch {
    pub fn new(settings: DuckDuckGoSettings) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|err| SearchError::Network(err.to_string()))?;
        Ok(Self { settings, http })
    }
}

#[async_trait::async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        let url = Url::parse_with_params(&self.settings.endpoint, &[("q", query)])
            .map_err(|err| SearchError::InvalidEndpoint(err.to_string()))?;

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "text/html")
            .send()
            .await
            .map_err(map_search_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::HttpStatus(status.as_u16()));
        }
        let body = response.text().await.map_err(map_search_error)?;

        let results = parse_results(&body, limit)?;
        research_info!("search returned {} results (limit {})", results.len(), limit);
        Ok(results)
    }
}

fn map_search_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        SearchError::Timeout
    } else {
        SearchError::Network(err.to_string())
    }
}

/// Parse a DuckDuckGo HTML results page into at most `limit` results.
///
/// Ads, results without a title, non-http(s) targets and repeated URLs are skipped.
pub fn parse_results(html: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
    let parse = |css: &str| Selector::parse(css).map_err(|err| SearchError::Parse(err.to_string()));
    let result_sel = parse(".result")?;
    let link_sel = parse("a.result__a")?;
    let snippet_sel = parse(".result__snippet")?;

    let doc = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut results = Vec::new();

    for block in doc.select(&result_sel) {
        if results.len() >= limit {
            break;
        }
        if block.value().classes().any(|class| class == "result--ad") {
            continue;
        }
        let Some(link) = block.select(&link_sel).next() else {
            continue;
        };
        let title = collapse_whitespace(&link.text().collect::<String>());
        let Some(url) = link.value().attr("href").and_then(resolve_result_url) else {
            continue;
        };
        if title.is_empty() || !seen.insert(url.clone()) {
            continue;
        }
        let snippet = block
            .select(&snippet_sel)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .filter(|text| !text.is_empty());

        research_debug!("search result {}: {}", results.len() + 1, url);
        results.push(SearchResult {
            title,
            url,
            snippet,
        });
    }

    Ok(results)
}

/// Result links are often redirects like `//duckduckgo.com/l/?uddg=<encoded>&rut=...`.
fn resolve_result_url(href: &str) -> Option<String> {
    let base = Url::parse("https://duckduckgo.com/").ok()?;
    let url = base.join(href.trim()).ok()?;
    let is_redirect = url
        .host_str()
        .is_some_and(|host| host.ends_with("duckduckgo.com"))
        && url.path() == "/l/";
    let target = if is_redirect {
        let (_, encoded) = url.query_pairs().find(|(key, _)| key == "uddg")?;
        Url::parse(&encoded).ok()?
    } else {
        url
    };
    matches!(target.scheme(), "http" | "https").then(|| target.to_string())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
