//! Computes dynamic cross-correlation matrices from coordinate trajectories.
//!
//! - [`alignment`] - rigid least-squares superposition of frames onto a reference
//! - [`correlation`] - windowed covariance of atomic fluctuations, normalized to `[-1, 1]`

pub mod alignment;
pub mod correlation;

use crate::core::models::dataset::ShapeError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Cannot compute correlations from an empty window")]
    EmptyWindow,

    #[error("Frame {frame} has {actual} atoms, expected {expected}")]
    InconsistentFrame {
        frame: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Window of {window} frames does not fit a trajectory of {frames} frames")]
    InvalidWindow { window: usize, frames: usize },

    #[error("Reference frame {reference} does not exist (trajectory has {frames} frames)")]
    MissingReference { reference: usize, frames: usize },

    #[error("Superposition of frame {frame} failed: singular value decomposition did not converge")]
    Superposition { frame: usize },

    #[error(transparent)]
    Shape(#[from] ShapeError),
}
