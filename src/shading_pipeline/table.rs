//! Shading table synthesis module
//!
//! This module derives the per-tile gain table from one frame's channel
//! planes.

mod builder;
pub mod types;

pub use builder::ShadingTableBuilder;
pub use types::{ShadingTable, TABLE_CHANNELS, TableConfig, TableConfigBuilder};
