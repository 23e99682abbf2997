use crate::cli::ComputeArgs;
use crate::config::builder::build_compute_config;
use crate::config::models::ComputeAppConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use dccmview::core::io::dccm::DccmFile;
use dccmview::core::io::traits::CorrelationFile;
use dccmview::core::io::xyz::XyzFile;
use dccmview::engine::progress::ProgressReporter;
use dccmview::workflows::compute::{self, output_file_name};
use std::path::PathBuf;
use tracing::info;

pub async fn run(args: ComputeArgs) -> Result<()> {
    let app_config = build_compute_config(&args)?;

    let handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(handler.get_callback());
    let written = compute_datasets(&app_config, &reporter).await?;

    for (window, path) in &written {
        println!("✓ Window {:>5}: {}", window, path.display());
    }
    Ok(())
}

/// Computes every configured window and writes one dataset file per window into the
/// output directory. Returns the written files in window order.
pub(crate) async fn compute_datasets(
    app_config: &ComputeAppConfig,
    reporter: &ProgressReporter<'_>,
) -> Result<Vec<(usize, PathBuf)>> {
    info!("Reading trajectory from {:?}", &app_config.input_path);
    let input_path = app_config.input_path.clone();
    let trajectory = tokio::task::spawn_blocking(move || XyzFile::read_from_path(&input_path))
        .await
        .map_err(|e| CliError::Other(anyhow::anyhow!("Trajectory reader task failed: {}", e)))?
        .map_err(|e| CliError::FileParsing {
            path: app_config.input_path.clone(),
            source: e.into(),
        })?;
    info!(
        frames = trajectory.num_frames(),
        atoms = trajectory.num_atoms(),
        "Trajectory loaded."
    );

    let result =
        tokio::task::block_in_place(|| compute::run(trajectory, &app_config.core_config, reporter))?;

    if result.datasets.is_empty() {
        return Err(CliError::Argument(format!(
            "None of the requested windows {:?} fits the trajectory",
            result.skipped_windows
        )));
    }

    tokio::fs::create_dir_all(&app_config.output_dir).await?;

    let mut written = Vec::with_capacity(result.datasets.len());
    for entry in &result.datasets {
        let path = app_config.output_dir.join(output_file_name(entry.window));
        tokio::task::block_in_place(|| DccmFile::write_to_path(&entry.dataset, &path)).map_err(
            |e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            },
        )?;
        info!(window = entry.window, "Wrote dataset to {:?}", &path);
        written.push((entry.window, path));
    }
    Ok(written)
}
