use std::io::Write;

use tracing::debug;

use crate::shading_pipeline::codec::writer::TableWriter;
use crate::shading_pipeline::common::error::Result;
use crate::shading_pipeline::raw::BayerChannel;
use crate::shading_pipeline::table::ShadingTable;

/// Transform declaration emitted in the artifact tail. The consumer applies
/// tables in the hflip+vflip readout frame, which is code 3.
pub const REF_TRANSFORM: u32 = 3;

/// Writes a shading table as the `ls_grid` C header the downstream optics
/// pipeline compiles in. The byte layout is a compatibility contract:
/// channels in R, Gr, Gb, B order, each introduced by a `//<name> - Ch <n>`
/// comment with the channel index counted backwards, rows comma-separated
/// with a trailing comma, and the `ref_transform`/`grid_width`/`grid_height`
/// declarations at the end.
pub struct LsGridWriter;

impl TableWriter for LsGridWriter {
    fn write_table(&self, table: &ShadingTable, output: &mut dyn Write) -> Result<()> {
        debug!(
            width = table.width,
            height = table.height,
            "Writing ls_grid table"
        );

        writeln!(output, "uint8_t ls_grid[] = {{")?;
        for (index, channel) in BayerChannel::ALL.into_iter().enumerate() {
            writeln!(output, "//{} - Ch {}", channel.label(), 3 - index)?;
            for row in table.rows(channel) {
                let (last, head) = row.split_last().unwrap_or((&0, &[]));
                for value in head {
                    write!(output, "{}, ", value)?;
                }
                writeln!(output, "{},", last)?;
            }
        }
        writeln!(output, "}};")?;
        writeln!(output, "uint32_t ref_transform = {};", REF_TRANSFORM)?;
        writeln!(output, "uint32_t grid_width = {};", table.width)?;
        writeln!(output, "uint32_t grid_height = {};", table.height)?;
        Ok(())
    }
}
