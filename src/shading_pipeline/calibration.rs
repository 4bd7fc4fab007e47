//! Pipeline orchestration module
//!
//! This module wires the decoder, table builder and codec into the full
//! capture-to-artifact calibration flow.

mod raw_to_table;

pub use raw_to_table::CalibrationPipeline;
