use tracing::debug;

use crate::shading_pipeline::codec::reader::TableReader;
use crate::shading_pipeline::common::error::{Result, ShadingError};
use crate::shading_pipeline::table::{ShadingTable, TABLE_CHANNELS};

/// Parses an `ls_grid` C header back into a shading table.
///
/// The grammar is line-oriented: `uint…` declarations and the closing
/// brace are skipped, a `//` comment opens the next channel, and every
/// other non-empty line is one grid row of comma/whitespace separated
/// byte values. The reconstructed table is exactly the one that was
/// serialized; any shape irregularity is a parse error, not a best-effort
/// recovery.
pub struct LsGridReader;

impl TableReader for LsGridReader {
    fn read_table(&self, input: &str) -> Result<ShadingTable> {
        let mut channels: Vec<Vec<Vec<u8>>> = Vec::new();

        for (number, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("uint") || line.starts_with('}') {
                continue;
            }
            if line.starts_with("//") {
                channels.push(Vec::new());
                continue;
            }

            let Some(channel) = channels.last_mut() else {
                return Err(ShadingError::Parse(format!(
                    "line {}: value row before any channel marker",
                    number + 1
                )));
            };

            let row = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .map(|token| {
                    token.parse::<u8>().map_err(|_| {
                        ShadingError::Parse(format!(
                            "line {}: invalid cell value '{}'",
                            number + 1,
                            token
                        ))
                    })
                })
                .collect::<Result<Vec<u8>>>()?;
            channel.push(row);
        }

        let table = assemble(channels)?;
        debug!(
            width = table.width,
            height = table.height,
            "Parsed ls_grid table"
        );
        Ok(table)
    }
}

/// Validates channel/row shapes and flattens them into a table.
fn assemble(channels: Vec<Vec<Vec<u8>>>) -> Result<ShadingTable> {
    if channels.len() != TABLE_CHANNELS {
        return Err(ShadingError::Parse(format!(
            "expected {} channels, found {}",
            TABLE_CHANNELS,
            channels.len()
        )));
    }

    let height = channels[0].len();
    let width = channels[0].first().map_or(0, Vec::len);
    if height == 0 || width == 0 {
        return Err(ShadingError::Parse("empty channel grid".to_string()));
    }

    let mut data = Vec::with_capacity(TABLE_CHANNELS * height * width);
    for (index, channel) in channels.iter().enumerate() {
        if channel.len() != height {
            return Err(ShadingError::Parse(format!(
                "channel {} has {} rows, expected {}",
                index,
                channel.len(),
                height
            )));
        }
        for row in channel {
            if row.len() != width {
                return Err(ShadingError::Parse(format!(
                    "row of {} values where the grid width is {}",
                    row.len(),
                    width
                )));
            }
            data.extend_from_slice(row);
        }
    }

    Ok(ShadingTable::new(width, height, data))
}
