use super::config::ThresholdSpec;
use crate::core::color::correlation_color;
use crate::core::models::point::PointRecord;
use nalgebra::{DMatrix, Point3};

/// Turns one expanded slice into point geometry.
///
/// Walks the full square matrix row-major (`i` outer, `j` inner), so both `(i, j)`
/// and `(j, i)` are emitted for off-diagonal pairs. Values inside the open band of
/// `thresholds` are skipped. Each kept value sits at
/// `(x0 + i * step_length, y0 + j * step_length, z0)`.
pub fn extract(
    matrix: &DMatrix<f64>,
    slice_index: usize,
    thresholds: &ThresholdSpec,
    origin: &Point3<f64>,
    step_length: f64,
) -> Vec<PointRecord> {
    let mut points = Vec::new();
    for i in 0..matrix.nrows() {
        for j in 0..matrix.ncols() {
            let value = matrix[(i, j)];
            if thresholds.excludes(value) {
                continue;
            }
            points.push(PointRecord {
                slice_index,
                residue_i: i,
                residue_j: j,
                value,
                color: correlation_color(value),
                position: Point3::new(
                    origin.x + i as f64 * step_length,
                    origin.y + j as f64 * step_length,
                    origin.z,
                ),
            });
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::point::Rgb;

    fn thresholds(negative: f64, positive: f64) -> ThresholdSpec {
        ThresholdSpec::new(negative, positive).unwrap()
    }

    #[test]
    fn boundary_values_are_kept_and_interior_values_skipped() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 0.39, 0.39, 0.40]);
        let points = extract(&m, 0, &thresholds(0.4, 0.4), &Point3::origin(), 1.0);

        let kept: Vec<(usize, usize)> = points.iter().map(|p| (p.residue_i, p.residue_j)).collect();
        assert_eq!(kept, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn points_are_emitted_row_major_with_both_triangles() {
        let m = DMatrix::from_row_slice(3, 3, &[1.0, -0.9, 0.0, -0.9, 1.0, 0.8, 0.0, 0.8, 1.0]);
        let points = extract(&m, 4, &thresholds(0.5, 0.5), &Point3::origin(), 1.0);

        let order: Vec<(usize, usize)> = points.iter().map(|p| (p.residue_i, p.residue_j)).collect();
        assert_eq!(
            order,
            vec![(0, 0), (0, 1), (1, 0), (1, 1), (1, 2), (2, 1), (2, 2)]
        );
        assert!(points.iter().all(|p| p.slice_index == 4));
    }

    #[test]
    fn positions_follow_origin_and_step() {
        let m = DMatrix::from_element(3, 3, 1.0);
        let origin = Point3::new(1.0, 0.05, -1.2);
        let points = extract(&m, 2, &thresholds(0.4, 0.4), &origin, 0.5);

        let p = points
            .iter()
            .find(|p| p.residue_i == 2 && p.residue_j == 1)
            .unwrap();
        assert!((p.position - Point3::new(2.0, 0.55, -1.2)).norm() < 1e-12);
    }

    #[test]
    fn colors_come_from_the_correlation_scale() {
        let m = DMatrix::from_row_slice(1, 2, &[0.75, -0.75]);
        let points = extract(&m, 0, &thresholds(0.0, 0.0), &Point3::origin(), 1.0);
        assert_eq!(points[0].color, Rgb::new(255, 0, 0));
        assert_eq!(points[1].color, Rgb::new(0, 0, 255));
    }

    #[test]
    fn full_band_keeps_only_extremes() {
        let m = DMatrix::from_row_slice(1, 4, &[-1.0, -0.99, 0.99, 1.0]);
        let points = extract(&m, 0, &thresholds(1.0, 1.0), &Point3::origin(), 1.0);
        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![-1.0, 1.0]);
    }
}
