//! Optional RON settings file for the shell.
//!
//! Every field has a default, so a file only needs the values it changes:
//!
//! ```ron
//! (
//!     search: (max_results: 6),
//!     gemini: (model: "gemini-1.5-pro"),
//! )
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use research_engine::EngineConfig;
use research_logging::research_info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    pub endpoint: String,
    pub max_results: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSection {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Pause between consecutive page requests.
    pub request_delay_ms: u64,
    /// Cap on extracted characters per page.
    pub max_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSection {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchSection,
    pub fetch: FetchSection,
    pub gemini: GeminiSection,
}

impl Default for SearchSection {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            endpoint: engine.search.endpoint,
            max_results: engine.pipeline.max_results,
            timeout_secs: engine.search.request_timeout.as_secs(),
        }
    }
}

impl Default for FetchSection {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            connect_timeout_secs: engine.fetch.connect_timeout.as_secs(),
            timeout_secs: engine.fetch.request_timeout.as_secs(),
            redirect_limit: engine.fetch.redirect_limit,
            max_bytes: engine.fetch.max_bytes,
            request_delay_ms: engine.pipeline.request_delay.as_millis() as u64,
            max_chars: engine.pipeline.max_chars,
        }
    }
}

impl Default for GeminiSection {
    fn default() -> Self {
        let gemini = EngineConfig::default().gemini;
        Self {
            base_url: gemini.base_url,
            model: gemini.model,
            timeout_secs: gemini.request_timeout.as_secs(),
        }
    }
}

impl AppConfig {
    /// Reads a settings file. A path that does not exist yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            research_info!("no config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            ron::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        research_info!("loaded config from {:?}", path);
        Ok(config)
    }

    pub fn engine_config(&self) -> EngineConfig {
        let mut engine = EngineConfig::default();

        engine.search.endpoint = self.search.endpoint.clone();
        engine.search.request_timeout = Duration::from_secs(self.search.timeout_secs);
        engine.pipeline.max_results = self.search.max_results;

        engine.fetch.connect_timeout = Duration::from_secs(self.fetch.connect_timeout_secs);
        engine.fetch.request_timeout = Duration::from_secs(self.fetch.timeout_secs);
        engine.fetch.redirect_limit = self.fetch.redirect_limit;
        engine.fetch.max_bytes = self.fetch.max_bytes;
        engine.pipeline.request_delay = Duration::from_millis(self.fetch.request_delay_ms);
        engine.pipeline.max_chars = self.fetch.max_chars;

        engine.gemini.base_url = self.gemini.base_url.clone();
        engine.gemini.model = self.gemini.model.clone();
        engine.gemini.request_timeout = Duration::from_secs(self.gemini.timeout_secs);

        engine
    }
}
