//! # Engine Module
//!
//! The stateful layer that turns a decoded correlation dataset into the point sets a
//! renderer draws.
//!
//! ## Overview
//!
//! Given a dataset and a [`config::RenderConfig`], the engine expands every visible
//! slice into a square matrix, drops the values inside the threshold band and emits
//! colored, positioned points. [`controller::SliceSetController`] owns the results
//! across reconfiguration and reloads.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Thresholds, slice selection, scene layout and their builders
//! - **Extraction** ([`extraction`]) - Threshold filtering and point placement for one slice
//! - **Views** ([`view`]) - Per-slice point sets and their flattened render buffers
//! - **Controller** ([`controller`]) - Generation-tagged view arena and last-load-wins loading
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-level error type wrapping the core errors
//!
//! ## Key Capabilities
//!
//! - **Parallel slice building** across slices when the `parallel` feature is enabled
//! - **Single live generation**: a rebuild releases every previous view before building
//! - **Overlapping loads** resolved in favor of the most recently started one
//! - **Failed loads** leave the currently displayed views untouched

pub mod config;
pub mod controller;
pub mod error;
pub mod extraction;
pub mod progress;
pub mod view;
