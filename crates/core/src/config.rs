/// Configuration types for the ReplyForge orchestration engine.
///
/// Configuration is typically constructed with `Default` for tests and the
/// CLI demo, or loaded from a YAML file in an integrating service.
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level engine configuration: retrieval, scheduler, and networking knobs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub consent: ConsentConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retrieval: RetrievalConfig::default(),
            scheduler: SchedulerConfig::default(),
            network: NetworkConfig::default(),
            consent: ConsentConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_file(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Chunking, top-k, and day-window knobs for the three retrieval sources.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Target chunk size, in characters, for every chunked document
    /// (tone mail, knowledge-base files, and uploaded documents alike).
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap, in characters, between consecutive chunks.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Number of chunks returned per retriever query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Day window for the tone index's sent-mail fetch.
    #[serde(default = "default_tone_window_days")]
    pub tone_window_days: u32,
}

fn default_chunk_size() -> usize {
    1000
}
fn default_chunk_overlap() -> usize {
    100
}
fn default_top_k() -> usize {
    3
}
fn default_tone_window_days() -> u32 {
    7
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
            tone_window_days: default_tone_window_days(),
        }
    }
}

/// Bounds on the scheduler's tool-calling loop.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum agent-step iterations before the loop is forced to stop.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Number of most-recent messages passed to the model each step.
    #[serde(default = "default_message_window")]
    pub message_window: usize,

    /// Default working-hours start (local, 24h clock).
    #[serde(default = "default_working_hours_start")]
    pub working_hours_start: u32,

    /// Default working-hours end (local, 24h clock).
    #[serde(default = "default_working_hours_end")]
    pub working_hours_end: u32,

    /// Lookahead window, in days, for slot proposals.
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: u32,
}

fn default_max_iterations() -> u32 {
    10
}
fn default_message_window() -> usize {
    5
}
fn default_working_hours_start() -> u32 {
    9
}
fn default_working_hours_end() -> u32 {
    18
}
fn default_lookahead_days() -> u32 {
    7
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            message_window: default_message_window(),
            working_hours_start: default_working_hours_start(),
            working_hours_end: default_working_hours_end(),
            lookahead_days: default_lookahead_days(),
        }
    }
}

/// Per-call timeout applied to every provider call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout_secs")]
    pub provider_timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            provider_timeout_secs: default_timeout_secs(),
        }
    }
}

/// Named consent scopes and the HMAC secret used to validate tokens.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsentConfig {
    #[serde(default = "default_primary_scope")]
    pub primary_scope: String,

    #[serde(default = "default_kb_scope")]
    pub kb_scope: String,

    /// HS256 signing secret. Defaults to a placeholder; an integrating
    /// service must override this from its own secret store.
    #[serde(default = "default_hmac_secret")]
    pub hmac_secret: String,
}

fn default_primary_scope() -> String {
    "vault.read.email".to_string()
}
fn default_kb_scope() -> String {
    "knowledge.base.read".to_string()
}
fn default_hmac_secret() -> String {
    "replace-me-with-a-real-secret".to_string()
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            primary_scope: default_primary_scope(),
            kb_scope: default_kb_scope(),
            hmac_secret: default_hmac_secret(),
        }
    }
}

/// Logging configuration, analogous to the reference platform's own
/// level/format knobs for `tracing-subscriber`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "compact".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
