//! Configuration: static lookup tables and environment-driven settings.

pub mod settings;
pub mod tables;

pub use settings::{EngineSettings, TablePaths};
pub use tables::{CategoryTable, RegionTable, SourceTable};
