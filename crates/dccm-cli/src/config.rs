//! Layered CLI configuration: built-in defaults, an optional TOML file, `--set`
//! overrides and explicit flags, in increasing order of precedence.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;
