//! Table text codec module
//!
//! This module serializes shading tables to the `ls_grid` C header format
//! and parses them back, with an exact round-trip guarantee.

mod ls_grid_reader;
mod ls_grid_writer;
mod reader;
mod writer;

pub use ls_grid_reader::LsGridReader;
pub use ls_grid_writer::{LsGridWriter, REF_TRANSFORM};
pub use reader::TableReader;
pub use writer::TableWriter;
