use crate::HistoryId;

/// Side effects requested by `update`; the shell executes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RunResearch {
        query: String,
        api_key: String,
    },
    GenerateQuiz {
        history_id: HistoryId,
        api_key: String,
        query: String,
        summary: String,
    },
}
