//! Provides input/output for correlation datasets and coordinate trajectories.
//!
//! The packed DCCM binary format is handled by [`dccm`] behind the
//! [`traits::CorrelationFile`] interface; [`xyz`] reads the multi-frame coordinate
//! trajectories that correlation matrices are computed from.

pub mod dccm;
pub mod traits;
pub mod xyz;
