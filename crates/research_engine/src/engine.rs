use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use research_logging::{research_error, research_info};

use crate::fetch::ReqwestFetcher;
use crate::generate::{GeminiClient, GenerateError};
use crate::pipeline::{ProgressSink, ResearchPipeline};
use crate::quiz::QuizGenerator;
use crate::search::{DuckDuckGoSearch, SearchError};
use crate::{EngineConfig, EngineEvent, ExtractionProgress, JobId};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to set up search provider: {0}")]
    Search(#[from] SearchError),
    #[error("failed to set up generation client: {0}")]
    Generator(#[from] GenerateError),
}

enum EngineCommand {
    Research {
        job_id: JobId,
        query: String,
        api_key: String,
    },
    Quiz {
        job_id: JobId,
        api_key: String,
        query: String,
        summary: String,
    },
}

/// Runs pipeline and quiz jobs on a background thread, one at a time, in
/// submission order. Progress and results come back through `recv`.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let fetcher = Arc::new(ReqwestFetcher::new(config.fetch));
        let search = Arc::new(DuckDuckGoSearch::new(config.search)?);
        let generator = Arc::new(GeminiClient::new(config.gemini)?);
        let pipeline = ResearchPipeline::new(search, fetcher, generator.clone(), config.pipeline);
        let quiz = QuizGenerator::new(generator);
        Ok(Self::with_services(pipeline, quiz))
    }

    /// Engine over caller-supplied services.
    pub fn with_services(pipeline: ResearchPipeline, quiz: QuizGenerator) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    research_error!("engine runtime failed to start: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                runtime.block_on(handle_command(&pipeline, &quiz, command, &event_tx));
            }
            research_info!("engine command channel closed");
        });

        Self { cmd_tx, event_rx }
    }

    pub fn research(&self, job_id: JobId, query: impl Into<String>, api_key: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Research {
            job_id,
            query: query.into(),
            api_key: api_key.into(),
        });
    }

    pub fn generate_quiz(
        &self,
        job_id: JobId,
        api_key: impl Into<String>,
        query: impl Into<String>,
        summary: impl Into<String>,
    ) {
        let _ = self.cmd_tx.send(EngineCommand::Quiz {
            job_id,
            api_key: api_key.into(),
            query: query.into(),
            summary: summary.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks until the next event; `None` once the engine thread is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

struct ChannelProgressSink<'a> {
    job_id: JobId,
    tx: &'a mpsc::Sender<EngineEvent>,
}

impl ProgressSink for ChannelProgressSink<'_> {
    fn emit(&self, progress: ExtractionProgress) {
        let _ = self.tx.send(EngineEvent::Progress {
            job_id: self.job_id,
            progress,
        });
    }
}

async fn handle_command(
    pipeline: &ResearchPipeline,
    quiz: &QuizGenerator,
    command: EngineCommand,
    event_tx: &mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Research {
            job_id,
            query,
            api_key,
        } => {
            let sink = ChannelProgressSink { job_id, tx: event_tx };
            let result = pipeline.summarize(&query, &api_key, &sink).await;
            let _ = event_tx.send(EngineEvent::ResearchCompleted { job_id, result });
        }
        EngineCommand::Quiz {
            job_id,
            api_key,
            query,
            summary,
        } => {
            let result = quiz.generate(&api_key, &query, &summary).await;
            let _ = event_tx.send(EngineEvent::QuizCompleted { job_id, result });
        }
    }
}
