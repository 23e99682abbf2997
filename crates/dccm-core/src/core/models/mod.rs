//! Data models shared by the decoder, the analysis routines and the slice engine.
//!
//! - [`packed`] - index arithmetic for upper-triangular storage
//! - [`dataset`] - the immutable, slice-major [`dataset::CorrelationDataset`]
//! - [`point`] - emitted point geometry and its hit-testing metadata
//! - [`trajectory`] - multi-frame coordinates used to compute correlations
//! - [`ids`] - arena keys for materialized slice views

pub mod dataset;
pub mod ids;
pub mod packed;
pub mod point;
pub mod trajectory;
