use crate::fetch::FetchSettings;
use crate::generate::GeminiSettings;
use crate::pipeline::PipelineSettings;
use crate::search::DuckDuckGoSettings;

/// Everything the engine needs to build its services.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub pipeline: PipelineSettings,
    pub search: DuckDuckGoSettings,
    pub gemini: GeminiSettings,
}
