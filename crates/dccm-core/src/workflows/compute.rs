use crate::core::analysis::alignment::superpose;
use crate::core::analysis::correlation::correlation_dataset;
use crate::core::models::dataset::CorrelationDataset;
use crate::core::models::trajectory::Trajectory;
use crate::engine::config::ComputeConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

/// One packed dataset per requested window size.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedDataset {
    pub window: usize,
    pub dataset: CorrelationDataset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputeResult {
    pub datasets: Vec<WindowedDataset>,
    /// Windows larger than the trajectory; no dataset was produced for them.
    pub skipped_windows: Vec<usize>,
}

/// File name under which the dataset for `window` is stored.
pub fn output_file_name(window: usize) -> String {
    format!("dccm_data_{window}.bin")
}

/// Computes DCCM datasets for every window size in `config`.
///
/// When alignment is enabled, every frame is first superposed onto the reference
/// frame. Window sizes that exceed the number of frames are skipped with a warning.
#[instrument(skip_all, name = "compute_workflow")]
pub fn run(
    mut trajectory: Trajectory,
    config: &ComputeConfig,
    reporter: &ProgressReporter,
) -> Result<ComputeResult, EngineError> {
    info!(
        frames = trajectory.num_frames(),
        atoms = trajectory.num_atoms(),
        windows = ?config.windows,
        "Starting DCCM computation."
    );

    if config.align {
        reporter.report(Progress::PhaseStart { name: "Alignment" });
        superpose(&mut trajectory, config.reference_frame)?;
        reporter.report(Progress::PhaseFinish);
    }

    reporter.report(Progress::PhaseStart {
        name: "Correlation",
    });
    reporter.report(Progress::SlicesStart {
        total: config.windows.len() as u64,
    });

    let mut datasets = Vec::with_capacity(config.windows.len());
    let mut skipped_windows = Vec::new();
    for (idx, &window) in config.windows.iter().enumerate() {
        if window > trajectory.num_frames() {
            warn!(
                window,
                frames = trajectory.num_frames(),
                "Window is longer than the trajectory; skipping."
            );
            reporter.report(Progress::Message(format!(
                "Skipped window {window}: trajectory has only {} frames",
                trajectory.num_frames()
            )));
            skipped_windows.push(window);
        } else {
            let dataset = correlation_dataset(&trajectory, window)?;
            info!(
                window,
                slices = dataset.num_slices(),
                "Computed correlation dataset."
            );
            datasets.push(WindowedDataset { window, dataset });
        }
        reporter.report(Progress::SliceDone { slice_index: idx });
    }

    reporter.report(Progress::SlicesFinish);
    reporter.report(Progress::PhaseFinish);

    Ok(ComputeResult {
        datasets,
        skipped_windows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::ComputeConfigBuilder;
    use nalgebra::{Point3, Rotation3, Vector3};

    /// Two atoms breathing in and out along x; the whole system also rotates and
    /// translates from frame to frame.
    fn tumbling_trajectory(num_frames: usize) -> Trajectory {
        let mut traj = Trajectory::new(vec!["CA".into(), "CA".into(), "CA".into()]);
        for t in 0..num_frames {
            let d = if t % 2 == 0 { 1.0 } else { 1.5 };
            let local = [
                Point3::new(-d, 0.0, 0.0),
                Point3::new(d, 0.0, 0.0),
                Point3::new(0.0, 2.0, 0.0),
            ];
            let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), 0.3 * t as f64);
            let shift = Vector3::new(t as f64, -2.0 * t as f64, 0.5);
            traj.push_frame(local.iter().map(|p| rotation * *p + shift).collect())
                .unwrap();
        }
        traj
    }

    #[test]
    fn produces_one_dataset_per_window_and_skips_oversized_ones() {
        let config = ComputeConfigBuilder::new()
            .windows([2, 4, 100])
            .build()
            .unwrap();
        let result = run(tumbling_trajectory(8), &config, &ProgressReporter::new()).unwrap();

        let windows: Vec<usize> = result.datasets.iter().map(|d| d.window).collect();
        assert_eq!(windows, vec![2, 4]);
        assert_eq!(result.skipped_windows, vec![100]);
        assert_eq!(result.datasets[0].dataset.num_slices(), 4);
        assert_eq!(result.datasets[1].dataset.num_slices(), 2);
        assert_eq!(result.datasets[1].dataset.num_atoms(), 3);
    }

    #[test]
    fn aligned_breathing_atoms_are_anticorrelated() {
        let config = ComputeConfigBuilder::new().window(8).build().unwrap();
        let result = run(tumbling_trajectory(8), &config, &ProgressReporter::new()).unwrap();

        let dataset = &result.datasets[0].dataset;
        let value = f64::from(dataset.value(0, 0, 1).unwrap());
        assert!((value + 1.0).abs() < 1e-3, "got {value}");
    }

    #[test]
    fn missing_reference_frame_is_an_error() {
        let config = ComputeConfigBuilder::new()
            .window(2)
            .reference_frame(50)
            .build()
            .unwrap();
        let err = run(tumbling_trajectory(4), &config, &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, EngineError::Analysis { .. }));
    }

    #[test]
    fn output_file_name_embeds_window() {
        assert_eq!(output_file_name(25), "dccm_data_25.bin");
    }
}
