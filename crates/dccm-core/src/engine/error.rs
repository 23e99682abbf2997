use thiserror::Error;

use super::config::ConfigError;
use crate::core::analysis::AnalysisError;
use crate::core::io::dccm::FormatError;
use crate::core::models::dataset::IndexError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid DCCM data: {source}")]
    Format {
        #[from]
        source: FormatError,
    },

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch dataset: {0}")]
    Fetch(String),

    #[error("Correlation analysis failed: {source}")]
    Analysis {
        #[from]
        source: AnalysisError,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
