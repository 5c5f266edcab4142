//! Plain-text rendering of the session view model.

use std::fmt::Write;

use research_core::{Activity, AppViewModel, Grade, HistoryRowView, Notice, Progress};
use research_engine::NOTHING_FETCHED_MESSAGE;

/// Turns successive view models into the lines that changed since the last one.
#[derive(Debug, Default)]
pub struct Renderer {
    last_activity: Option<Activity>,
    last_progress: Option<Progress>,
}

impl Renderer {
    pub fn frame(&mut self, view: &AppViewModel) -> String {
        let mut out = String::new();

        if view.activity != self.last_activity {
            if let Some(activity) = &view.activity {
                out.push_str(&activity_line(activity, view));
                out.push('\n');
            }
            self.last_activity = view.activity.clone();
        }
        if view.progress != self.last_progress {
            if let Some(progress) = &view.progress {
                out.push_str(&progress_line(progress));
                out.push('\n');
            }
            self.last_progress = view.progress.clone();
        }
        if let Some(notice) = &view.notice {
            out.push_str(&notice_text(notice, view));
            out.push('\n');
        }

        out
    }
}

fn activity_line(activity: &Activity, view: &AppViewModel) -> String {
    match activity {
        Activity::Searching { query } => format!("Searching the web for {query:?}..."),
        Activity::GeneratingQuiz { history_id } => match view.row(*history_id) {
            Some(row) => format!("Generating a quiz for #{} {:?}...", row.position, row.query),
            None => "Generating a quiz...".to_string(),
        },
    }
}

pub fn progress_line(progress: &Progress) -> String {
    format!(
        "  ({}/{}) fetching {}",
        progress.index, progress.total, progress.title
    )
}

pub fn notice_text(notice: &Notice, view: &AppViewModel) -> String {
    match notice {
        Notice::MissingApiKey => {
            "Set an API key first: key <api-key> (or start with --api-key / GEMINI_API_KEY)."
                .to_string()
        }
        Notice::EmptyQuery => "Enter something to search for.".to_string(),
        Notice::NoResults { query } => {
            format!("No search results for {query:?}. Try a different query.")
        }
        Notice::NothingFetched { query } => format!("{query:?}: {NOTHING_FETCHED_MESSAGE}"),
        Notice::Summarized { history_id, degraded } => match view.row(*history_id) {
            Some(row) if *degraded => format!("Summary failed.\n\n{}", detail(row)),
            Some(row) => detail(row),
            None => "Summary finished.".to_string(),
        },
        Notice::ResearchFailed { query, message } => {
            format!("Search for {query:?} stopped: {message}")
        }
        Notice::QuizReady { history_id } => match view.row(*history_id) {
            Some(row) => quiz(row),
            None => "Quiz ready.".to_string(),
        },
        Notice::QuizFailed { .. } => {
            "Quiz generation failed. Try again with quiz <n>.".to_string()
        }
    }
}

pub fn history(view: &AppViewModel) -> String {
    if view.history.is_empty() {
        return "No searches yet.".to_string();
    }
    let mut out = String::new();
    for row in &view.history {
        let quiz_state = match (&row.quiz, &row.grade) {
            (None, _) => "",
            (Some(_), None) => "  [quiz]",
            (Some(_), Some(grade)) if grade.grade == Grade::Correct => "  [quiz: correct]",
            (Some(_), Some(_)) => "  [quiz: incorrect]",
        };
        let _ = writeln!(
            out,
            "{:>3}. {}  ({}){}",
            row.position, row.query, row.completed_utc, quiz_state
        );
    }
    out.trim_end().to_string()
}

pub fn detail(row: &HistoryRowView) -> String {
    let mut out = format!(
        "#{} {}  ({})\n\n{}\n",
        row.position,
        row.query,
        row.completed_utc,
        row.summary.trim()
    );
    if !row.sources.is_empty() {
        out.push_str("\nSources:\n");
        for (idx, source) in row.sources.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}\n     {}", idx + 1, source.title, source.url);
        }
    }
    if row.quiz.is_none() && !row.degraded {
        let _ = writeln!(out, "\nTry: quiz {}", row.position);
    }
    out.trim_end().to_string()
}

pub fn quiz(row: &HistoryRowView) -> String {
    let Some(quiz) = &row.quiz else {
        return format!("No quiz for #{} yet. Try: quiz {}", row.position, row.position);
    };
    let mut out = format!("Quiz for #{}: {}\n", row.position, quiz.question);
    for (idx, option) in quiz.options.iter().enumerate() {
        let _ = writeln!(out, "  {}) {}", idx + 1, option);
    }
    let _ = write!(out, "Answer with: answer {} <1-4>", row.position);
    out
}

pub fn grade(row: &HistoryRowView) -> String {
    let (Some(quiz), Some(grade)) = (&row.quiz, &row.grade) else {
        return String::new();
    };
    let verdict = match grade.grade {
        Grade::Correct => "Correct!".to_string(),
        Grade::Incorrect => format!("Incorrect. The correct answer is: {}", quiz.answer),
    };
    format!("{verdict}\nExplanation: {}", quiz.explanation)
}
