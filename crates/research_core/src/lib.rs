//! Research core: pure session state machine and view-model helpers.
mod effect;
mod msg;
mod quiz;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{Msg, ResearchResult};
pub use quiz::{Grade, Quiz, QuizShapeError, QUIZ_OPTION_COUNT};
pub use state::{Activity, AppState, HistoryId, HistoryItem, Notice, Progress, Source};
pub use update::update;
pub use view_model::{AppViewModel, GradeView, HistoryRowView};
