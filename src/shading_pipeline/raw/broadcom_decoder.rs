//! Raw frame decoder for the Broadcom packed capture container.
//!
//! The pixel payload stores four 10-bit samples in every five bytes: four
//! bytes carry the high 8 bits of one sample each, and the fifth byte packs
//! the low 2 bits of all four, most significant sample first. Unpacking
//! drops the shared low-bits column, so each payload row of
//! `width / 4 * 5` data bytes yields exactly `width` samples.

use tracing::debug;

use crate::shading_pipeline::common::error::{Result, ShadingError};
use crate::shading_pipeline::raw::decoder::FrameDecoder;
use crate::shading_pipeline::raw::header::{GROUP_BYTES, GROUP_SAMPLES, PAYLOAD_OFFSET, RawHeader};
use crate::shading_pipeline::raw::types::{
    BayerChannel, ColorPlanes, DecodedFrame, Plane, SensorOrientation,
};

/// Decoder for raw capture buffers in the Broadcom container layout.
///
/// Pure: the same bytes always decode to the same planes and orientation.
pub struct BroadcomDecoder;

/// Tile position of each channel within the 2x2 Bayer tile, indexed in
/// [`BayerChannel::ALL`] order (R, Gr, Gb, B) as (row offset, col offset).
/// Mirroring the readout moves the tile origin, so each orientation is the
/// base assignment with its rows, columns or both swapped. Hand-verified
/// against captures from all four mirror settings; do not derive it
/// arithmetically.
fn quadrant_offsets(orientation: SensorOrientation) -> [(usize, usize); 4] {
    match orientation {
        // (0,0)=R (0,1)=Gb (1,0)=Gr (1,1)=B
        SensorOrientation::VFlip => [(0, 0), (1, 0), (0, 1), (1, 1)],
        // (0,0)=Gr (0,1)=B (1,0)=R (1,1)=Gb
        SensorOrientation::Normal => [(1, 0), (0, 0), (1, 1), (0, 1)],
        // (0,0)=B (0,1)=Gr (1,0)=Gb (1,1)=R
        SensorOrientation::HFlip => [(1, 1), (0, 1), (1, 0), (0, 0)],
        // (0,0)=Gb (0,1)=R (1,0)=B (1,1)=Gr
        SensorOrientation::HVFlip => [(0, 1), (1, 1), (0, 0), (1, 0)],
    }
}

impl FrameDecoder for BroadcomDecoder {
    /// Decodes a raw capture buffer into four half-resolution channel planes.
    ///
    /// This method:
    /// 1. Parses and validates the embedded header (magic, dimensions)
    /// 2. Checks the buffer actually holds the payload the header implies
    /// 3. Unpacks the 10-bit samples and crops off the padding rows/columns
    /// 4. Splits the 2x2 Bayer tiles into named channel planes according
    ///    to the recorded orientation
    ///
    /// # Arguments
    ///
    /// * `data` - A complete capture buffer, magic marker first
    ///
    /// # Returns
    ///
    /// * `Ok(DecodedFrame)` - The channel planes and capture orientation
    /// * `Err(ShadingError)` - Malformed, truncated or unsupported buffer
    fn decode(&self, data: &[u8]) -> Result<DecodedFrame> {
        debug!("Decoding raw frame, {} bytes", data.len());

        let header = RawHeader::parse(data)?;
        let needed = PAYLOAD_OFFSET + header.payload_len();
        if data.len() < needed {
            return Err(ShadingError::TruncatedData {
                needed,
                actual: data.len(),
            });
        }
        let orientation = SensorOrientation::from_code(header.bayer_order)?;

        debug!(
            width = header.width,
            height = header.height,
            orientation = orientation.code(),
            "Parsed frame header"
        );

        let grid = unpack_payload(&data[PAYLOAD_OFFSET..], &header);
        let planes = split_planes(&grid, orientation);

        for channel in BayerChannel::ALL {
            debug!(
                channel = channel.label(),
                max = planes.plane(channel).max_value(),
                "Decoded channel plane"
            );
        }

        Ok(DecodedFrame {
            planes,
            orientation,
        })
    }
}

/// Unpacks the visible payload region into a full-resolution sample grid.
///
/// Walks the top-left `height x packed_row_bytes` sub-rectangle of the
/// payload; everything right of and below it is stride padding.
fn unpack_payload(payload: &[u8], header: &RawHeader) -> Plane {
    let stride = header.row_stride();
    let packed = header.packed_row_bytes();
    let mut data = Vec::with_capacity(header.width * header.height);

    for row in payload.chunks_exact(stride).take(header.height) {
        for group in row[..packed].chunks_exact(GROUP_BYTES) {
            let low = group[GROUP_BYTES - 1];
            for (i, &high) in group[..GROUP_SAMPLES].iter().enumerate() {
                let sample = (u16::from(high) << 2) | u16::from((low >> (6 - 2 * i)) & 0b11);
                data.push(sample);
            }
        }
    }

    Plane::new(header.width, header.height, data)
}

/// Splits the unpacked grid into the four channel planes.
///
/// Dimensions round down to even first so the 2x2 tiling is exact; a
/// trailing odd row/column carries no complete tile and is discarded.
fn split_planes(grid: &Plane, orientation: SensorOrientation) -> ColorPlanes {
    let half_w = grid.width / 2;
    let half_h = grid.height / 2;

    let extract = |(row_off, col_off): (usize, usize)| {
        let mut data = Vec::with_capacity(half_w * half_h);
        for y in 0..half_h {
            for x in 0..half_w {
                data.push(grid.get(2 * y + row_off, 2 * x + col_off));
            }
        }
        Plane::new(half_w, half_h, data)
    };

    let [red, green1, green2, blue] = quadrant_offsets(orientation);
    ColorPlanes {
        red: extract(red),
        green1: extract(green1),
        green2: extract(green2),
        blue: extract(blue),
    }
}
