//! # dccmview Core Library
//!
//! Decoding, analysis and point extraction for dynamic cross-correlation matrices
//! (DCCM) of molecular dynamics trajectories.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`CorrelationDataset`,
//!   `Trajectory`), the packed binary codec, the color scale and the correlation
//!   analysis itself.
//!
//! - **[`engine`]: The Logic Core.** The stateful layer. It turns a decoded dataset
//!   into per-slice point sets under the current thresholds and selection, and owns
//!   the lifecycle of those sets through `SliceSetController`, including
//!   last-load-wins handling of overlapping dataset loads.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures built from the two
//!   layers below, such as computing a set of DCCM datasets from a trajectory.

pub mod core;
pub mod engine;
pub mod workflows;
