//! Lens shading calibration pipeline module
//!
//! This module turns packed raw sensor captures into per-tile gain tables,
//! with separate modules for raw frame decoding, table synthesis, the table
//! text codec and pipeline orchestration.

pub mod calibration;
pub mod codec;
pub mod common;
pub mod raw;
pub mod table;

#[cfg(test)]
mod tests;

pub use common::{Result, ShadingError};

pub use raw::{
    BayerChannel, BroadcomDecoder, ColorPlanes, DecodedFrame, FrameDecoder, Plane, RawHeader,
    SensorOrientation, locate_raw_block,
};

pub use table::{ShadingTable, ShadingTableBuilder, TableConfig, TableConfigBuilder};

pub use codec::{LsGridReader, LsGridWriter, TableReader, TableWriter};

pub use calibration::CalibrationPipeline;
