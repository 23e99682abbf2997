//! # Core Module
//!
//! Stateless building blocks shared by the rest of the library: the correlation
//! data model, the packed binary codec, the diverging color scale and the
//! trajectory analysis that produces correlation matrices in the first place.
//!
//! ## Architecture
//!
//! - **Data Model** ([`models`]) - Packed correlation datasets, trajectories and point records
//! - **File I/O** ([`io`]) - The DCCM binary format and multi-frame XYZ trajectories
//! - **Color Scale** ([`color`]) - Blue-white-red mapping of correlation coefficients
//! - **Trajectory Analysis** ([`analysis`]) - Superposition and windowed cross-correlation
//!
//! Nothing in this module holds state between calls; the stateful slice
//! bookkeeping lives in [`crate::engine`].

pub mod analysis;
pub mod color;
pub mod io;
pub mod models;
