use std::io::Write;

use crate::shading_pipeline::common::error::Result;
use crate::shading_pipeline::table::ShadingTable;

pub trait TableWriter {
    fn write_table(&self, table: &ShadingTable, output: &mut dyn Write) -> Result<()>;
}
