use crate::{HistoryId, Quiz, Source};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User entered or replaced the generative-service API key.
    ApiKeyChanged(String),
    /// User edited the query input.
    QueryChanged(String),
    /// User submitted the current query.
    SearchSubmitted,
    /// Engine started fetching source `index` of `total` (1-based).
    ResearchProgress {
        index: usize,
        total: usize,
        title: String,
    },
    /// Engine finished a research run.
    ResearchFinished {
        result: ResearchResult,
        completed_utc: String,
    },
    /// User asked for a quiz on a history item.
    QuizRequested { history_id: HistoryId },
    /// Engine finished quiz generation; `None` means the generation was unusable.
    QuizFinished {
        history_id: HistoryId,
        quiz: Option<Quiz>,
    },
    /// User picked an option for a history item's quiz.
    AnswerSubmitted { history_id: HistoryId, choice: String },
    /// User dismissed the current notice.
    NoticeDismissed,
    /// Fallback for placeholder wiring.
    NoOp,
}

/// Outcome of one research run as seen by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResearchResult {
    /// Discovery returned nothing.
    NoResults,
    /// Every source failed to produce text.
    NothingFetched { sources: Vec<Source> },
    /// A summary was produced; `degraded` summaries carry an error text.
    Summarized {
        summary: String,
        sources: Vec<Source>,
        degraded: bool,
    },
    /// A fault that is not a soft failure, such as a rejected credential.
    Failed { message: String },
}
