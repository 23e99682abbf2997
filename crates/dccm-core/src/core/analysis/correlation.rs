use super::AnalysisError;
use crate::core::models::dataset::CorrelationDataset;
use crate::core::models::trajectory::Trajectory;
use nalgebra::{DMatrix, Point3, Vector3};
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Added to each variance before normalizing, so atoms that never move yield zero
/// correlation instead of a division by zero.
pub const VARIANCE_EPSILON: f64 = 1e-10;

/// Dynamic cross-correlation of the atoms over one window of frames.
///
/// With `Δr_i(t)` the displacement of atom `i` from its mean position over the
/// window, `C_ik = <Δr_i · Δr_k>` and the returned entry is
/// `C_ik / sqrt((C_ii + ε)(C_kk + ε))`. The matrix is symmetric with a diagonal
/// of (almost exactly) one for every atom that moves.
pub fn correlation_matrix(window: &[Vec<Point3<f64>>]) -> Result<DMatrix<f64>, AnalysisError> {
    let first = window.first().ok_or(AnalysisError::EmptyWindow)?;
    let num_atoms = first.len();
    let num_frames = window.len();

    if let Some((frame, f)) = window
        .iter()
        .enumerate()
        .find(|(_, f)| f.len() != num_atoms)
    {
        return Err(AnalysisError::InconsistentFrame {
            frame,
            expected: num_atoms,
            actual: f.len(),
        });
    }

    let mut mean = vec![Vector3::<f64>::zeros(); num_atoms];
    for frame in window {
        for (m, p) in mean.iter_mut().zip(frame) {
            *m += p.coords;
        }
    }
    for m in &mut mean {
        *m /= num_frames as f64;
    }

    // Rows are atoms; columns run over (frame, axis) pairs.
    let fluctuations = DMatrix::from_fn(num_atoms, 3 * num_frames, |atom, column| {
        let (frame, axis) = (column / 3, column % 3);
        window[frame][atom].coords[axis] - mean[atom][axis]
    });
    let covariance = (&fluctuations * fluctuations.transpose()) / num_frames as f64;

    let scale: Vec<f64> = (0..num_atoms)
        .map(|i| (covariance[(i, i)] + VARIANCE_EPSILON).sqrt())
        .collect();

    Ok(DMatrix::from_fn(num_atoms, num_atoms, |i, k| {
        covariance[(i, k)] / (scale[i] * scale[k])
    }))
}

/// Splits the trajectory into consecutive windows of `window` frames and computes one
/// correlation matrix per window. Trailing frames that do not fill a window are
/// ignored.
#[instrument(skip(trajectory), fields(frames = trajectory.num_frames()))]
pub fn windowed_correlations(
    trajectory: &Trajectory,
    window: usize,
) -> Result<Vec<DMatrix<f64>>, AnalysisError> {
    if window == 0 || window > trajectory.num_frames() {
        return Err(AnalysisError::InvalidWindow {
            window,
            frames: trajectory.num_frames(),
        });
    }

    let windows: Vec<&[Vec<Point3<f64>>]> = trajectory.windows(window).collect();

    #[cfg(not(feature = "parallel"))]
    let iterator = windows.iter();

    #[cfg(feature = "parallel")]
    let iterator = windows.par_iter();

    let matrices = iterator
        .map(|frames| correlation_matrix(frames))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        window,
        slices = matrices.len(),
        dropped_frames = trajectory.num_frames() % window,
        "Computed windowed correlation matrices."
    );
    Ok(matrices)
}

/// Computes the windowed correlations and packs them into a dataset.
pub fn correlation_dataset(
    trajectory: &Trajectory,
    window: usize,
) -> Result<CorrelationDataset, AnalysisError> {
    let matrices = windowed_correlations(trajectory, window)?;
    Ok(CorrelationDataset::from_matrices(&matrices)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    fn oscillation(t: usize) -> f64 {
        [0.0, 1.0, 0.0, -1.0][t % 4]
    }

    /// Atom 0 and 1 move together along x, atom 2 moves opposite, atom 3 moves along y
    /// with a quarter-period phase shift, atom 4 is fixed.
    fn trajectory(num_frames: usize) -> Trajectory {
        let mut traj = Trajectory::new((0..5).map(|i| format!("A{i}")).collect());
        for t in 0..num_frames {
            let a = oscillation(t);
            let b = oscillation(t + 1);
            traj.push_frame(vec![
                Point3::new(a, 0.0, 0.0),
                Point3::new(10.0 + a, 0.0, 0.0),
                Point3::new(-a, 5.0, 0.0),
                Point3::new(0.0, b, 3.0),
                Point3::new(1.0, 1.0, 1.0),
            ])
            .unwrap();
        }
        traj
    }

    #[test]
    fn correlation_matrix_recovers_known_relationships() {
        let traj = trajectory(8);
        let m = correlation_matrix(traj.frames()).unwrap();

        assert!((m[(0, 0)] - 1.0).abs() < TOLERANCE);
        assert!((m[(0, 1)] - 1.0).abs() < TOLERANCE);
        assert!((m[(0, 2)] + 1.0).abs() < TOLERANCE);
        assert!(m[(0, 3)].abs() < TOLERANCE);
        assert_eq!(m[(0, 4)], 0.0);
        assert_eq!(m[(4, 4)], 0.0);
    }

    #[test]
    fn correlation_matrix_is_symmetric() {
        let traj = trajectory(12);
        let m = correlation_matrix(traj.frames()).unwrap();
        assert!((&m - m.transpose()).amax() < 1e-12);
    }

    #[test]
    fn correlation_matrix_rejects_empty_and_ragged_windows() {
        assert_eq!(correlation_matrix(&[]), Err(AnalysisError::EmptyWindow));

        let ragged = vec![vec![Point3::origin(); 2], vec![Point3::origin(); 3]];
        assert_eq!(
            correlation_matrix(&ragged),
            Err(AnalysisError::InconsistentFrame {
                frame: 1,
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn windowed_correlations_produce_one_matrix_per_full_window() {
        let traj = trajectory(10);
        let matrices = windowed_correlations(&traj, 4).unwrap();
        assert_eq!(matrices.len(), 2);
        assert!(matrices.iter().all(|m| m.nrows() == 5 && m.ncols() == 5));
    }

    #[test]
    fn windowed_correlations_reject_invalid_window() {
        let traj = trajectory(4);
        assert!(matches!(
            windowed_correlations(&traj, 0),
            Err(AnalysisError::InvalidWindow { .. })
        ));
        assert!(matches!(
            windowed_correlations(&traj, 5),
            Err(AnalysisError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn correlation_dataset_packs_every_window() {
        let traj = trajectory(8);
        let dataset = correlation_dataset(&traj, 4).unwrap();
        assert_eq!(dataset.num_slices(), 2);
        assert_eq!(dataset.num_atoms(), 5);
        assert!((f64::from(dataset.value(1, 2, 0).unwrap()) + 1.0).abs() < TOLERANCE);
    }
}
