use super::AnalysisError;
use crate::core::models::trajectory::Trajectory;
use nalgebra::{Matrix3, Point3, Vector3};
use tracing::debug;

fn centroid(points: &[Point3<f64>]) -> Point3<f64> {
    if points.is_empty() {
        return Point3::origin();
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / points.len() as f64)
}

/// Optimal rotation (Kabsch) taking the centered `mobile` points onto the centered
/// `reference` points. Returns `None` if the SVD does not produce both factors.
pub fn optimal_rotation(
    mobile: &[Point3<f64>],
    reference: &[Point3<f64>],
) -> Option<Matrix3<f64>> {
    let mobile_center = centroid(mobile);
    let reference_center = centroid(reference);

    let mut covariance = Matrix3::zeros();
    for (p, q) in mobile.iter().zip(reference) {
        covariance += (p - mobile_center) * (q - reference_center).transpose();
    }

    let svd = covariance.svd(true, true);
    let u = svd.u?;
    let v = svd.v_t?.transpose();

    // Flip the smallest axis when the best orthogonal fit is a reflection.
    let d = (v * u.transpose()).determinant().signum();
    let correction = Matrix3::from_diagonal(&Vector3::new(1.0, 1.0, d));
    Some(v * correction * u.transpose())
}

/// Rigidly superposes every frame onto `reference_frame`, removing global
/// translation and rotation so that correlations reflect internal motion only.
///
/// Each frame is centered, rotated by its optimal rotation, and moved onto the
/// reference centroid.
pub fn superpose(trajectory: &mut Trajectory, reference_frame: usize) -> Result<(), AnalysisError> {
    let frames = trajectory.num_frames();
    let reference = trajectory
        .frames()
        .get(reference_frame)
        .cloned()
        .ok_or(AnalysisError::MissingReference {
            reference: reference_frame,
            frames,
        })?;
    let reference_center = centroid(&reference);

    for (index, frame) in trajectory.frames_mut().iter_mut().enumerate() {
        let rotation = optimal_rotation(frame, &reference)
            .ok_or(AnalysisError::Superposition { frame: index })?;
        let center = centroid(frame);
        for point in frame.iter_mut() {
            *point = reference_center + rotation * (*point - center);
        }
    }

    debug!(frames, reference_frame, "Superposed trajectory onto reference frame.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Rotation3, Unit};

    const TOLERANCE: f64 = 1e-9;

    fn reference_points() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, 0.0, 0.0),
            Point3::new(1.5, 2.0, 0.0),
            Point3::new(0.0, 2.0, 1.0),
            Point3::new(-1.0, 0.5, 3.0),
        ]
    }

    fn moved(points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        let rotation = Rotation3::from_axis_angle(
            &Unit::new_normalize(Vector3::new(1.0, 2.0, -0.5)),
            1.1,
        );
        let shift = Vector3::new(4.0, -3.0, 10.0);
        points.iter().map(|p| rotation.transform_point(p) + shift).collect()
    }

    #[test]
    fn optimal_rotation_of_identical_sets_is_identity() {
        let points = reference_points();
        let rotation = optimal_rotation(&points, &points).unwrap();
        assert!((rotation - Matrix3::identity()).norm() < TOLERANCE);
    }

    #[test]
    fn superpose_undoes_rigid_motion() {
        let reference = reference_points();
        let mut trajectory = Trajectory::new(vec!["CA".to_string(); reference.len()]);
        trajectory.push_frame(reference.clone()).unwrap();
        trajectory.push_frame(moved(&reference)).unwrap();

        superpose(&mut trajectory, 0).unwrap();

        for (aligned, expected) in trajectory.frames()[1].iter().zip(&reference) {
            assert!((*aligned - *expected).norm() < 1e-8, "{aligned} != {expected}");
        }
    }

    #[test]
    fn superpose_returns_proper_rotation_for_mirrored_input() {
        let reference = reference_points();
        let mirrored: Vec<_> = reference.iter().map(|p| Point3::new(-p.x, p.y, p.z)).collect();
        let rotation = optimal_rotation(&mirrored, &reference).unwrap();
        assert!((rotation.determinant() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn superpose_rejects_missing_reference() {
        let mut trajectory = Trajectory::new(vec!["CA".to_string()]);
        trajectory.push_frame(vec![Point3::origin()]).unwrap();
        let err = superpose(&mut trajectory, 3).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MissingReference {
                reference: 3,
                frames: 1
            }
        );
    }
}
