//! # Workflows Module
//!
//! End-to-end procedures built on the [`crate::core`] and [`crate::engine`] layers.
//!
//! - **Compute Workflow** ([`compute`]) - Superposes a trajectory onto a reference
//!   frame and computes one packed DCCM dataset per requested window size.
//!
//! Workflows report progress through [`crate::engine::progress::ProgressReporter`] and
//! return [`crate::engine::error::EngineError`] on failure.

pub mod compute;
