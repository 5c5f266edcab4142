use std::collections::HashMap;

use chrono::Utc;
use research_core::{Effect, HistoryId, Msg, Quiz, ResearchResult, Source};
use research_engine::{
    EngineEvent, EngineHandle, JobId, PipelineError, QuizError, ResearchOutcome, SourceLink,
};
use research_logging::{redact, research_info, research_warn};

/// What a submitted engine job was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingJob {
    Research,
    Quiz { history_id: HistoryId },
}

/// Executes effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    next_job_id: JobId,
    pending: HashMap<JobId, PendingJob>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            next_job_id: 1,
            pending: HashMap::new(),
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            let job_id = self.next_job_id;
            self.next_job_id += 1;
            match effect {
                Effect::RunResearch { query, api_key } => {
                    research_info!(
                        "RunResearch job_id={} query={:?} api_key={}",
                        job_id,
                        query,
                        redact(&api_key)
                    );
                    self.pending.insert(job_id, PendingJob::Research);
                    self.engine.research(job_id, query, api_key);
                }
                Effect::GenerateQuiz {
                    history_id,
                    api_key,
                    query,
                    summary,
                } => {
                    research_info!(
                        "GenerateQuiz job_id={} history_id={} api_key={}",
                        job_id,
                        history_id,
                        redact(&api_key)
                    );
                    self.pending
                        .insert(job_id, PendingJob::Quiz { history_id });
                    self.engine.generate_quiz(job_id, api_key, query, summary);
                }
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Blocks for the next engine event and maps it to a message.
    ///
    /// Returns `None` when the engine has stopped.
    pub fn next_msg(&mut self) -> Option<Msg> {
        let event = self.engine.recv()?;
        Some(self.map_event(event))
    }

    fn map_event(&mut self, event: EngineEvent) -> Msg {
        match event {
            EngineEvent::Progress { progress, .. } => Msg::ResearchProgress {
                index: progress.index,
                total: progress.total,
                title: progress.title,
            },
            EngineEvent::ResearchCompleted { job_id, result } => {
                self.pending.remove(&job_id);
                Msg::ResearchFinished {
                    result: research_result(result),
                    completed_utc: Utc::now().to_rfc3339(),
                }
            }
            EngineEvent::QuizCompleted { job_id, result } => match self.pending.remove(&job_id) {
                Some(PendingJob::Quiz { history_id }) => Msg::QuizFinished {
                    history_id,
                    quiz: quiz_result(result),
                },
                other => {
                    research_warn!("quiz result for unknown job {} ({:?})", job_id, other);
                    Msg::NoOp
                }
            },
        }
    }
}

fn sources(links: Vec<SourceLink>) -> Vec<Source> {
    links
        .into_iter()
        .map(|link| Source {
            title: link.title,
            url: link.url,
        })
        .collect()
}

pub(crate) fn research_result(result: Result<ResearchOutcome, PipelineError>) -> ResearchResult {
    match result {
        Ok(ResearchOutcome::NoResults) => ResearchResult::NoResults,
        Ok(ResearchOutcome::NothingFetched { sources: links }) => ResearchResult::NothingFetched {
            sources: sources(links),
        },
        Ok(ResearchOutcome::Summarized(summary)) => ResearchResult::Summarized {
            summary: summary.summary,
            sources: sources(summary.sources),
            degraded: summary.degraded,
        },
        Err(err) => {
            research_warn!("research failed: {}", err);
            ResearchResult::Failed {
                message: err.to_string(),
            }
        }
    }
}

pub(crate) fn quiz_result(result: Result<Quiz, QuizError>) -> Option<Quiz> {
    match result {
        Ok(quiz) => Some(quiz),
        Err(err) => {
            research_warn!("quiz generation failed: {}", err);
            None
        }
    }
}
