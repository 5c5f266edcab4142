use std::sync::Arc;
use std::time::Duration;

use research_logging::{research_info, research_warn};

use crate::extract::{ContentExtractor, MAX_CONTENT_CHARS};
use crate::fetch::Fetcher;
use crate::generate::{GenerateError, TextGenerator};
use crate::prompt::summary_prompt;
use crate::search::SearchProvider;
use crate::{ExtractionProgress, SearchResult};

/// Shown instead of a summary when no source yielded any text.
pub const NOTHING_FETCHED_MESSAGE: &str =
    "Could not fetch content from any of the sources. Try a different query or try again later.";

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub max_results: usize,
    /// Pause between consecutive page fetches.
    pub request_delay: Duration,
    pub max_chars: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_results: 4,
            request_delay: Duration::from_millis(500),
            max_chars: MAX_CONTENT_CHARS,
        }
    }
}

/// Receives extraction progress while a pipeline run is active.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, progress: ExtractionProgress);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLink {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    pub summary: String,
    /// Every discovered result in discovery order, fetched or not.
    pub sources: Vec<SourceLink>,
    /// `summary` holds a generation error text.
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResearchOutcome {
    NoResults,
    NothingFetched { sources: Vec<SourceLink> },
    Summarized(SummaryResult),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("no api key configured")]
    MissingCredential,
    #[error("api key problem: {0}")]
    Credential(GenerateError),
}

/// Discovery, sequential extraction, then one generation call.
pub struct ResearchPipeline {
    search: Arc<dyn SearchProvider>,
    extractor: ContentExtractor,
    generator: Arc<dyn TextGenerator>,
    settings: PipelineSettings,
}

impl ResearchPipeline {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn Fetcher>,
        generator: Arc<dyn TextGenerator>,
        settings: PipelineSettings,
    ) -> Self {
        let extractor = ContentExtractor::new(fetcher, settings.max_chars);
        Self {
            search,
            extractor,
            generator,
            settings,
        }
    }

    pub async fn summarize(
        &self,
        query: &str,
        api_key: &str,
        sink: &dyn ProgressSink,
    ) -> Result<ResearchOutcome, PipelineError> {
        if api_key.trim().is_empty() {
            return Err(PipelineError::MissingCredential);
        }

        let results = match self.search.search(query, self.settings.max_results).await {
            Ok(results) => results,
            Err(err) => {
                research_warn!("search failed for {:?}: {}", query, err);
                Vec::new()
            }
        };
        if results.is_empty() {
            research_info!("no search results for {:?}", query);
            return Ok(ResearchOutcome::NoResults);
        }

        let sources: Vec<SourceLink> = results
            .iter()
            .map(|result| SourceLink {
                title: result.title.clone(),
                url: result.url.clone(),
            })
            .collect();

        let Some(context) = self.collect_context(&results, sink).await else {
            research_warn!("all {} sources failed for {:?}", results.len(), query);
            return Ok(ResearchOutcome::NothingFetched { sources });
        };

        let prompt = summary_prompt(query, &context);
        let (summary, degraded) = match self.generator.generate(&prompt, api_key).await {
            Ok(summary) => (summary, false),
            Err(err) if err.is_credential_fault() => {
                return Err(PipelineError::Credential(err));
            }
            Err(err) => {
                research_warn!("summary generation failed: {}", err);
                (
                    format!("An error occurred while generating the summary: {err}"),
                    true,
                )
            }
        };

        Ok(ResearchOutcome::Summarized(SummaryResult {
            summary,
            sources,
            degraded,
        }))
    }

    /// Fetches each result in order, one at a time, pausing between requests.
    ///
    /// Every successful fetch contributes a source block, even with empty
    /// text. `None` means every fetch failed.
    async fn collect_context(
        &self,
        results: &[SearchResult],
        sink: &dyn ProgressSink,
    ) -> Option<String> {
        let total = results.len();
        let mut context = String::new();
        let mut fetched = 0usize;

        for (idx, result) in results.iter().enumerate() {
            if idx > 0 && !self.settings.request_delay.is_zero() {
                tokio::time::sleep(self.settings.request_delay).await;
            }
            sink.emit(ExtractionProgress {
                index: idx + 1,
                total,
                title: result.title.clone(),
                url: result.url.clone(),
            });

            let scraped = self.extractor.extract(&result.url).await;
            if !scraped.is_ok() {
                continue;
            }
            fetched += 1;
            context.push_str(&format!(
                "--- Source {} ({}) ---\n{}\n\n",
                idx + 1,
                result.title,
                scraped.text
            ));
        }

        (fetched > 0).then_some(context)
    }
}
