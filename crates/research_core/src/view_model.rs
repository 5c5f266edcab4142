use crate::{Activity, Grade, HistoryId, Notice, Progress, Quiz, Source};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub api_key_configured: bool,
    pub query_input: String,
    pub activity: Option<Activity>,
    pub progress: Option<Progress>,
    /// Most recent first.
    pub history: Vec<HistoryRowView>,
    pub notice: Option<Notice>,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn row(&self, history_id: HistoryId) -> Option<&HistoryRowView> {
        self.history.iter().find(|row| row.history_id == history_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRowView {
    /// 1-based display position.
    pub position: usize,
    pub history_id: HistoryId,
    pub query: String,
    pub summary: String,
    pub sources: Vec<Source>,
    pub completed_utc: String,
    pub degraded: bool,
    pub quiz: Option<Quiz>,
    pub grade: Option<GradeView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeView {
    pub choice: String,
    pub grade: Grade,
}
