//! Research engine: page fetching, content extraction, search, generation,
//! and the research and quiz pipelines built on them.
mod config;
mod decode;
mod engine;
mod extract;
mod fetch;
mod generate;
mod pipeline;
mod prompt;
mod quiz;
mod search;
mod text;
mod types;

pub use config::EngineConfig;
pub use decode::{decode_html, DecodedHtml};
pub use engine::{EngineError, EngineHandle};
pub use extract::{
    extract_main_text, ContentExtractor, MAX_CONTENT_CHARS, MIN_PARAGRAPH_CHARS,
    MIN_PARAGRAPH_TEXT_CHARS,
};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, BROWSER_USER_AGENT};
pub use generate::{GeminiClient, GeminiSettings, GenerateError, TextGenerator};
pub use pipeline::{
    PipelineError, PipelineSettings, ProgressSink, ResearchOutcome, ResearchPipeline, SourceLink,
    SummaryResult, NOTHING_FETCHED_MESSAGE,
};
pub use prompt::{quiz_prompt, summary_prompt};
pub use quiz::{parse_quiz, QuizError, QuizGenerator};
pub use research_core::Quiz;
pub use search::{parse_results, DuckDuckGoSearch, DuckDuckGoSettings, SearchError, SearchProvider};
pub use types::{
    EngineEvent, ExtractionProgress, ExtractionStatus, FailureKind, FetchError, FetchMetadata,
    FetchOutput, JobId, ScrapedContent, SearchResult,
};
