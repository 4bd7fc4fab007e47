use crate::shading_pipeline::common::error::Result;
use crate::shading_pipeline::table::ShadingTable;

pub trait TableReader {
    fn read_table(&self, input: &str) -> Result<ShadingTable>;
}
