use super::fetch_dataset;
use crate::cli::ExtractArgs;
use crate::config::builder::build_extract_config;
use crate::config::models::ExtractAppConfig;
use crate::data::DataManager;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use dccmview::engine::controller::{LoadOutcome, SelectionRange, SliceSetController};
use dccmview::engine::progress::ProgressReporter;
use dccmview::engine::view::RenderBuffers;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSummary {
    pub range: SelectionRange,
    pub slices: usize,
    pub points: usize,
}

pub async fn run(args: ExtractArgs) -> Result<()> {
    let app_config = build_extract_config(&args)?;
    let data_manager = DataManager::new()?;
    let dataset_path = data_manager.resolve_dataset(&app_config.input)?;

    let handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(handler.get_callback());
    let summary = extract_to_csv(&app_config, &dataset_path, reporter).await?;

    println!(
        "✓ Exported {} points from {} slices to {}",
        summary.points,
        summary.slices,
        app_config.output_path.display()
    );
    println!(
        "  Selectable slices: {} to {}",
        summary.range.min, summary.range.max
    );
    Ok(())
}

pub(crate) async fn extract_to_csv(
    app_config: &ExtractAppConfig,
    dataset_path: &Path,
    reporter: ProgressReporter<'static>,
) -> Result<ExtractSummary> {
    let mut controller = SliceSetController::new(app_config.render)
        .with_range_callback(Box::new(|range: SelectionRange| {
            info!(min = range.min, max = range.max, "Selectable slice range updated.");
        }))
        .with_progress(reporter);

    let ticket = controller.begin_load();
    info!("Loading dataset from {:?}", dataset_path);
    let result = fetch_dataset(dataset_path).await;

    let outcome = tokio::task::block_in_place(|| controller.apply_load(ticket, result))?;
    let LoadOutcome::Applied { range } = outcome else {
        return Err(CliError::Data(format!(
            "Load of {} was superseded before it completed",
            dataset_path.display()
        )));
    };

    let buffers = controller.render_buffers();
    let output_path: PathBuf = app_config.output_path.clone();
    let points = tokio::task::block_in_place(|| write_points_csv(&buffers, &output_path))?;

    Ok(ExtractSummary {
        range,
        slices: buffers.len(),
        points,
    })
}

fn write_points_csv(buffers: &[RenderBuffers], path: &Path) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut count = 0;
    for row in buffers.iter().flat_map(|b| b.rows()) {
        writer.serialize(row)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}
