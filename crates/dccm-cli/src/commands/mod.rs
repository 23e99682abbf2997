pub mod compute;
pub mod data;
pub mod extract;
pub mod inspect;

use dccmview::core::io::dccm::DccmFile;
use dccmview::core::models::dataset::CorrelationDataset;
use dccmview::engine::error::EngineError;
use std::path::Path;
use tracing::debug;

/// Reads the dataset bytes asynchronously and decodes them on the blocking pool.
///
/// Read failures are reported as [`EngineError::Fetch`] and decode failures as
/// [`EngineError::Format`], so the result can be handed to a load ticket as is.
pub(crate) async fn fetch_dataset(path: &Path) -> Result<CorrelationDataset, EngineError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| EngineError::Fetch(format!("{}: {}", path.display(), e)))?;
    debug!(bytes = bytes.len(), "Read dataset from {:?}", path);

    tokio::task::spawn_blocking(move || DccmFile::decode(&bytes))
        .await
        .map_err(|e| EngineError::Internal(format!("Decoder task failed: {}", e)))?
        .map_err(EngineError::from)
}
