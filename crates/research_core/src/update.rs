use crate::{Activity, AppState, Effect, Msg, Notice, Progress, ResearchResult};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ApiKeyChanged(key) => {
            state.set_api_key(key);
            Vec::new()
        }
        Msg::QueryChanged(query) => {
            state.set_query(query);
            Vec::new()
        }
        Msg::SearchSubmitted => {
            // One action at a time: requests arriving mid-run are dropped.
            if state.is_busy() {
                return (state, Vec::new());
            }
            if !state.api_key_configured() {
                state.set_notice(Some(Notice::MissingApiKey));
                return (state, Vec::new());
            }
            let query = state.query_input().trim().to_string();
            if query.is_empty() {
                state.set_notice(Some(Notice::EmptyQuery));
                return (state, Vec::new());
            }
            let api_key = state.api_key().to_string();
            state.begin(Activity::Searching {
                query: query.clone(),
            });
            vec![Effect::RunResearch { query, api_key }]
        }
        Msg::ResearchProgress {
            index,
            total,
            title,
        } => {
            if matches!(state.activity(), Some(Activity::Searching { .. })) {
                state.set_progress(Progress {
                    index,
                    total,
                    title,
                });
            }
            Vec::new()
        }
        Msg::ResearchFinished {
            result,
            completed_utc,
        } => {
            let query = match state.activity() {
                Some(Activity::Searching { query }) => query.clone(),
                _ => return (state, Vec::new()),
            };
            state.finish_activity();
            let notice = match result {
                ResearchResult::NoResults => Notice::NoResults { query },
                ResearchResult::NothingFetched { .. } => Notice::NothingFetched { query },
                ResearchResult::Summarized {
                    summary,
                    sources,
                    degraded,
                } => {
                    let history_id =
                        state.prepend_history(query, summary, sources, completed_utc, degraded);
                    Notice::Summarized {
                        history_id,
                        degraded,
                    }
                }
                ResearchResult::Failed { message } => Notice::ResearchFailed { query, message },
            };
            state.set_notice(Some(notice));
            Vec::new()
        }
        Msg::QuizRequested { history_id } => {
            if state.is_busy() {
                return (state, Vec::new());
            }
            if !state.api_key_configured() {
                state.set_notice(Some(Notice::MissingApiKey));
                return (state, Vec::new());
            }
            let Some(item) = state.history_item(history_id) else {
                return (state, Vec::new());
            };
            let effect = Effect::GenerateQuiz {
                history_id,
                api_key: state.api_key().to_string(),
                query: item.query.clone(),
                summary: item.summary.clone(),
            };
            state.begin(Activity::GeneratingQuiz { history_id });
            vec![effect]
        }
        Msg::QuizFinished { history_id, quiz } => {
            match state.activity() {
                Some(Activity::GeneratingQuiz { history_id: active }) if *active == history_id => {}
                _ => return (state, Vec::new()),
            }
            state.finish_activity();
            let notice = match quiz {
                Some(quiz)
                    if quiz.check_shape().is_ok() && state.history_item(history_id).is_some() =>
                {
                    state.store_quiz(history_id, quiz);
                    Notice::QuizReady { history_id }
                }
                _ => Notice::QuizFailed { history_id },
            };
            state.set_notice(Some(notice));
            Vec::new()
        }
        Msg::AnswerSubmitted { history_id, choice } => {
            if let Some(grade) = state.quiz(history_id).map(|quiz| quiz.grade(&choice)) {
                state.record_grade(history_id, choice, grade);
            }
            Vec::new()
        }
        Msg::NoticeDismissed => {
            state.set_notice(None);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
