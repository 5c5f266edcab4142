use std::collections::BTreeMap;

use crate::view_model::{AppViewModel, GradeView, HistoryRowView};
use crate::{Grade, Quiz};

/// Session-unique key of a history item, assigned in creation order.
pub type HistoryId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub title: String,
    pub url: String,
}

/// One completed search-and-summarize run. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub id: HistoryId,
    pub query: String,
    pub summary: String,
    pub sources: Vec<Source>,
    pub completed_utc: String,
    /// The summary is a generation error text rather than a model summary.
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activity {
    Searching { query: String },
    GeneratingQuiz { history_id: HistoryId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub index: usize,
    pub total: usize,
    pub title: String,
}

/// Status line shown after a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    MissingApiKey,
    EmptyQuery,
    NoResults { query: String },
    NothingFetched { query: String },
    Summarized { history_id: HistoryId, degraded: bool },
    ResearchFailed { query: String, message: String },
    QuizReady { history_id: HistoryId },
    QuizFailed { history_id: HistoryId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GradeRecord {
    choice: String,
    grade: Grade,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    api_key: String,
    query_input: String,
    /// Most recent first.
    history: Vec<HistoryItem>,
    quizzes: BTreeMap<HistoryId, Quiz>,
    grades: BTreeMap<HistoryId, GradeRecord>,
    next_history_id: HistoryId,
    activity: Option<Activity>,
    progress: Option<Progress>,
    notice: Option<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            next_history_id: 1,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let history = self
            .history
            .iter()
            .enumerate()
            .map(|(idx, item)| HistoryRowView {
                position: idx + 1,
                history_id: item.id,
                query: item.query.clone(),
                summary: item.summary.clone(),
                sources: item.sources.clone(),
                completed_utc: item.completed_utc.clone(),
                degraded: item.degraded,
                quiz: self.quizzes.get(&item.id).cloned(),
                grade: self.grades.get(&item.id).map(|record| GradeView {
                    choice: record.choice.clone(),
                    grade: record.grade,
                }),
            })
            .collect();

        AppViewModel {
            api_key_configured: self.api_key_configured(),
            query_input: self.query_input.clone(),
            activity: self.activity.clone(),
            progress: self.progress.clone(),
            history,
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn history(&self) -> &[HistoryItem] {
        &self.history
    }

    pub fn history_item(&self, id: HistoryId) -> Option<&HistoryItem> {
        self.history.iter().find(|item| item.id == id)
    }

    /// History id shown at a 1-based display position.
    pub fn history_id_at(&self, position: usize) -> Option<HistoryId> {
        position
            .checked_sub(1)
            .and_then(|idx| self.history.get(idx))
            .map(|item| item.id)
    }

    pub fn quiz(&self, id: HistoryId) -> Option<&Quiz> {
        self.quizzes.get(&id)
    }

    pub fn quizzes(&self) -> &BTreeMap<HistoryId, Quiz> {
        &self.quizzes
    }

    pub fn activity(&self) -> Option<&Activity> {
        self.activity.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.activity.is_some()
    }

    pub fn api_key_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub(crate) fn api_key(&self) -> &str {
        self.api_key.trim()
    }

    pub(crate) fn query_input(&self) -> &str {
        &self.query_input
    }

    pub(crate) fn set_api_key(&mut self, key: String) {
        self.api_key = key;
        if self.api_key_configured() && self.notice == Some(Notice::MissingApiKey) {
            self.notice = None;
        }
        self.mark_dirty();
    }

    pub(crate) fn set_query(&mut self, query: String) {
        if self.query_input != query {
            self.query_input = query;
            self.mark_dirty();
        }
    }

    pub(crate) fn begin(&mut self, activity: Activity) {
        self.activity = Some(activity);
        self.progress = None;
        self.notice = None;
        self.mark_dirty();
    }

    pub(crate) fn set_progress(&mut self, progress: Progress) {
        self.progress = Some(progress);
        self.mark_dirty();
    }

    /// Ends the current activity, returning it.
    pub(crate) fn finish_activity(&mut self) -> Option<Activity> {
        self.progress = None;
        self.mark_dirty();
        self.activity.take()
    }

    pub(crate) fn prepend_history(
        &mut self,
        query: String,
        summary: String,
        sources: Vec<Source>,
        completed_utc: String,
        degraded: bool,
    ) -> HistoryId {
        let id = self.next_history_id.max(1);
        self.next_history_id = id + 1;
        self.history.insert(
            0,
            HistoryItem {
                id,
                query,
                summary,
                sources,
                completed_utc,
                degraded,
            },
        );
        self.mark_dirty();
        id
    }

    pub(crate) fn store_quiz(&mut self, id: HistoryId, quiz: Quiz) {
        self.quizzes.insert(id, quiz);
        self.grades.remove(&id);
        self.mark_dirty();
    }

    pub(crate) fn record_grade(&mut self, id: HistoryId, choice: String, grade: Grade) {
        self.grades.insert(id, GradeRecord { choice, grade });
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, notice: Option<Notice>) {
        if self.notice != notice {
            self.notice = notice;
            self.mark_dirty();
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
