#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use research_engine::{
    ExtractionProgress, FailureKind, FetchError, FetchMetadata, FetchOutput, Fetcher,
    GenerateError, PipelineSettings, ProgressSink, ResearchPipeline, SearchError,
    SearchProvider, SearchResult, TextGenerator,
};

pub fn paragraph_page(topic: &str) -> String {
    let para = format!("This paragraph explains {topic} in enough detail to pass the length filter.");
    format!("<html><body><main><p>{para}</p><p>{para}</p><p>{para}</p></main></body></html>")
}

pub fn results(n: usize) -> Vec<SearchResult> {
    (1..=n)
        .map(|i| SearchResult {
            title: format!("Result {i}"),
            url: format!("https://site{i}.example.com/page"),
            snippet: None,
        })
        .collect()
}

pub struct FakeSearch {
    response: Result<Vec<SearchResult>, SearchError>,
    pub calls: Mutex<Vec<(String, usize)>>,
}

impl FakeSearch {
    pub fn returning(results: Vec<SearchResult>) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(results),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: SearchError) -> Arc<Self> {
        Arc::new(Self {
            response: Err(err),
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl SearchProvider for FakeSearch {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        self.calls.lock().unwrap().push((query.to_string(), limit));
        self.response.clone()
    }
}

/// Serves canned HTML per URL; unknown URLs fail with a 404.
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, Result<String, FailureKind>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), Ok(html.into()));
        self
    }

    pub fn with_failure(mut self, url: &str, kind: FailureKind) -> Self {
        self.pages.insert(url.to_string(), Err(kind));
        self
    }

    pub fn serving_all(results: &[SearchResult]) -> Self {
        results.iter().fold(Self::default(), |fetcher, result| {
            fetcher.with_page(&result.url, paragraph_page(&result.title))
        })
    }

    pub fn fetched(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(Ok(html)) => Ok(FetchOutput {
                bytes: html.clone().into_bytes(),
                metadata: FetchMetadata {
                    original_url: url.to_string(),
                    final_url: url.to_string(),
                    redirect_count: 0,
                    content_type: Some("text/html; charset=utf-8".to_string()),
                    byte_len: html.len() as u64,
                },
            }),
            Some(Err(kind)) => Err(FetchError::new(kind.clone(), kind.to_string())),
            None => Err(FetchError::new(FailureKind::HttpStatus(404), "not found")),
        }
    }
}

pub struct FakeGenerator {
    response: Result<String, GenerateError>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: GenerateError) -> Arc<Self> {
        Arc::new(Self {
            response: Err(err),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str, _api_key: &str) -> Result<String, GenerateError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.response.clone()
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ExtractionProgress>>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<ExtractionProgress> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, progress: ExtractionProgress) {
        self.events.lock().unwrap().push(progress);
    }
}

pub fn no_delay() -> PipelineSettings {
    PipelineSettings {
        request_delay: Duration::ZERO,
        ..PipelineSettings::default()
    }
}

pub fn pipeline(
    search: Arc<FakeSearch>,
    fetcher: Arc<FakeFetcher>,
    generator: Arc<FakeGenerator>,
    settings: PipelineSettings,
) -> ResearchPipeline {
    ResearchPipeline::new(search, fetcher, generator, settings)
}
