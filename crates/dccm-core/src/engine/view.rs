use super::config::SliceLayout;
use crate::core::models::point::{PointMeta, PointRecord};
use serde::Serialize;

/// Draw size tag of a materialized slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointEmphasis {
    Selected,
    Unselected,
}

/// The points of one time slice, as produced by a single rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceView {
    pub slice_index: usize,
    pub emphasis: PointEmphasis,
    /// Rebuild generation that created this view.
    pub generation: u64,
    pub points: Vec<PointRecord>,
}

impl SliceView {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Flattens the view into renderer-ready buffers.
    pub fn render_buffers(&self, layout: &SliceLayout) -> RenderBuffers {
        let mut positions = Vec::with_capacity(self.points.len() * 3);
        let mut colors = Vec::with_capacity(self.points.len() * 3);
        let mut metadata = Vec::with_capacity(self.points.len());

        for point in &self.points {
            positions.extend([
                point.position.x as f32,
                point.position.y as f32,
                point.position.z as f32,
            ]);
            colors.extend(point.color.normalized());
            metadata.push(point.meta());
        }

        RenderBuffers {
            slice_index: self.slice_index,
            positions,
            colors,
            metadata,
            point_size: layout.point_size(self.emphasis),
        }
    }
}

/// Parallel flat arrays consumed by the renderer and by picking.
///
/// Point `k` occupies `positions[3k..3k+3]`, `colors[3k..3k+3]` and `metadata[k]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBuffers {
    pub slice_index: usize,
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub metadata: Vec<PointMeta>,
    pub point_size: f64,
}

impl RenderBuffers {
    pub fn num_points(&self) -> usize {
        self.metadata.len()
    }

    /// One flat record per point, in buffer order.
    pub fn rows(&self) -> impl Iterator<Item = PointRow> + '_ {
        self.metadata
            .iter()
            .zip(self.positions.chunks_exact(3))
            .zip(self.colors.chunks_exact(3))
            .map(|((meta, p), c)| PointRow {
                slice_index: meta.slice_index,
                residue_i: meta.residue_i,
                residue_j: meta.residue_j,
                value: meta.value,
                x: p[0],
                y: p[1],
                z: p[2],
                r: c[0],
                g: c[1],
                b: c[2],
                point_size: self.point_size,
            })
    }
}

/// A single point with its metadata, position, normalized color and draw size,
/// laid out for tabular export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointRow {
    pub slice_index: usize,
    pub residue_i: usize,
    pub residue_j: usize,
    pub value: f64,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub point_size: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::point::Rgb;
    use nalgebra::Point3;

    fn record(i: usize, j: usize, value: f64) -> PointRecord {
        PointRecord {
            slice_index: 2,
            residue_i: i,
            residue_j: j,
            value,
            color: Rgb::new(255, 0, 0),
            position: Point3::new(i as f64, j as f64, -1.5),
        }
    }

    #[test]
    fn render_buffers_are_parallel_arrays() {
        let view = SliceView {
            slice_index: 2,
            emphasis: PointEmphasis::Unselected,
            generation: 7,
            points: vec![record(0, 1, 0.9), record(3, 2, 0.8)],
        };
        let buffers = view.render_buffers(&SliceLayout::default());

        assert_eq!(buffers.num_points(), 2);
        assert_eq!(buffers.positions, vec![0.0, 1.0, -1.5, 3.0, 2.0, -1.5]);
        assert_eq!(buffers.colors, vec![1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(buffers.metadata[1].residue_i, 3);
        assert_eq!(buffers.metadata[1].residue_j, 2);
        assert_eq!(buffers.point_size, 0.022);
    }

    #[test]
    fn rows_pair_metadata_with_position_and_color() {
        let view = SliceView {
            slice_index: 2,
            emphasis: PointEmphasis::Selected,
            generation: 1,
            points: vec![record(0, 1, 0.9), record(3, 2, -0.8)],
        };
        let rows: Vec<PointRow> = view.render_buffers(&SliceLayout::default()).rows().collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1],
            PointRow {
                slice_index: 2,
                residue_i: 3,
                residue_j: 2,
                value: -0.8,
                x: 3.0,
                y: 2.0,
                z: -1.5,
                r: 1.0,
                g: 0.0,
                b: 0.0,
                point_size: 0.16,
            }
        );
    }

    #[test]
    fn empty_view_gives_empty_buffers() {
        let view = SliceView {
            slice_index: 0,
            emphasis: PointEmphasis::Selected,
            generation: 1,
            points: Vec::new(),
        };
        assert!(view.is_empty());
        let buffers = view.render_buffers(&SliceLayout::default());
        assert!(buffers.positions.is_empty() && buffers.colors.is_empty());
        assert_eq!(buffers.point_size, 0.16);
    }
}
