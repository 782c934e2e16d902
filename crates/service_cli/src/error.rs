//! CLI error types.

use thiserror::Error;
use viability_pipeline::EngineError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input document could not be parsed as JSON.
    #[error("failed to parse input document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Reading stdin or a config file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The engine rejected or could not complete the analysis.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A KPI config file could not be parsed.
    #[error("failed to parse KPI config: {0}")]
    KpiConfig(#[from] toml::de::Error),
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
