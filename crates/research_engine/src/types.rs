use std::fmt;

use research_core::Quiz;

use crate::pipeline::{PipelineError, ResearchOutcome};
use crate::quiz::QuizError;

pub type JobId = u64;

/// Emitted before each source is fetched; `index` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionProgress {
    pub index: usize,
    pub total: usize,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress {
        job_id: JobId,
        progress: ExtractionProgress,
    },
    ResearchCompleted {
        job_id: JobId,
        result: Result<ResearchOutcome, PipelineError>,
    },
    QuizCompleted {
        job_id: JobId,
        result: Result<Quiz, QuizError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStatus {
    Ok,
    Failed(String),
}

/// Plain-text excerpt of one page. Transient: consumed by a single pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedContent {
    pub source_url: String,
    pub text: String,
    pub status: ExtractionStatus,
}

impl ScrapedContent {
    pub(crate) fn ok(url: &str, text: String) -> Self {
        Self {
            source_url: url.to_string(),
            text,
            status: ExtractionStatus::Ok,
        }
    }

    pub(crate) fn failed(url: &str, reason: String) -> Self {
        Self {
            source_url: url.to_string(),
            text: String::new(),
            status: ExtractionStatus::Failed(reason),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ExtractionStatus::Ok
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
