//! Embedded raw header parsing.
//!
//! A raw capture buffer is a fixed-layout container: a 4-byte magic marker
//! at offset 0, a little-endian header record at [`HEADER_OFFSET`], and the
//! packed pixel payload starting at [`PAYLOAD_OFFSET`]. The header record is
//! parsed field-by-field over explicit byte ranges rather than overlaying a
//! struct, so the layout stays independent of host endianness and padding.

use crate::shading_pipeline::common::error::{Result, ShadingError};

/// Marker that every raw capture buffer starts with.
pub const MAGIC: [u8; 4] = *b"BRCM";

/// Byte offset of the header record within the buffer.
pub const HEADER_OFFSET: usize = 176;

/// Byte offset of the packed pixel payload within the buffer.
pub const PAYLOAD_OFFSET: usize = 32768;

/// Number of packed bytes that encode one group of samples.
pub const GROUP_BYTES: usize = 5;

/// Number of samples encoded per packed group.
pub const GROUP_SAMPLES: usize = 4;

/// Length of the header record in bytes.
const HEADER_LEN: usize = 70;

// Field offsets within the header record. The leading 32 bytes are the
// capture source name; the 24 bytes at 40 are reserved.
const FIELD_WIDTH: usize = 32;
const FIELD_HEIGHT: usize = 34;
const FIELD_PADDING_RIGHT: usize = 36;
const FIELD_PADDING_DOWN: usize = 38;
const FIELD_TRANSFORM: usize = 64;
const FIELD_FORMAT: usize = 66;
const FIELD_BAYER_ORDER: usize = 68;
const FIELD_BAYER_FORMAT: usize = 69;

/// The embedded header of a raw capture buffer.
///
/// `width` and `height` are the nominal visible sensor dimensions in pixels.
/// `padding_right` counts trailing stride bytes per payload row and
/// `padding_down` trailing payload rows; both are decode artifacts that
/// carry no pixel data.
#[derive(Debug, Clone)]
pub struct RawHeader {
    pub width: usize,
    pub height: usize,
    pub padding_right: usize,
    pub padding_down: usize,
    pub transform: u16,
    pub pixel_format: u16,
    pub bayer_order: u8,
    pub bayer_format: u8,
}

impl RawHeader {
    /// Parses the header out of a full capture buffer.
    ///
    /// Validates the magic marker first: a buffer whose first four bytes are
    /// wrong is a format error no matter how long it is. A buffer too short
    /// to hold the header record is a truncation error.
    pub fn parse(buffer: &[u8]) -> Result<RawHeader> {
        if buffer.len() >= MAGIC.len() && buffer[..MAGIC.len()] != MAGIC {
            return Err(ShadingError::Format(format!(
                "bad magic marker {:02x?}, expected {:02x?}",
                &buffer[..MAGIC.len()],
                MAGIC
            )));
        }
        if buffer.len() < HEADER_OFFSET + HEADER_LEN {
            return Err(ShadingError::TruncatedData {
                needed: HEADER_OFFSET + HEADER_LEN,
                actual: buffer.len(),
            });
        }

        let record = &buffer[HEADER_OFFSET..HEADER_OFFSET + HEADER_LEN];
        let u16_at = |offset: usize| u16::from_le_bytes([record[offset], record[offset + 1]]);

        let header = RawHeader {
            width: u16_at(FIELD_WIDTH) as usize,
            height: u16_at(FIELD_HEIGHT) as usize,
            padding_right: u16_at(FIELD_PADDING_RIGHT) as usize,
            padding_down: u16_at(FIELD_PADDING_DOWN) as usize,
            transform: u16_at(FIELD_TRANSFORM),
            pixel_format: u16_at(FIELD_FORMAT),
            bayer_order: record[FIELD_BAYER_ORDER],
            bayer_format: record[FIELD_BAYER_FORMAT],
        };

        if header.width == 0 || header.height == 0 {
            return Err(ShadingError::Format(format!(
                "degenerate frame dimensions {}x{}",
                header.width, header.height
            )));
        }
        if header.width % GROUP_SAMPLES != 0 {
            return Err(ShadingError::Format(format!(
                "frame width {} is not a whole number of packed groups",
                header.width
            )));
        }

        Ok(header)
    }

    /// Packed bytes per row that carry pixel data.
    pub fn packed_row_bytes(&self) -> usize {
        self.width / GROUP_SAMPLES * GROUP_BYTES
    }

    /// Total stride of one payload row in bytes, padding included.
    pub fn row_stride(&self) -> usize {
        self.packed_row_bytes() + self.padding_right
    }

    /// Total payload rows, padding rows included.
    pub fn payload_rows(&self) -> usize {
        self.height + self.padding_down
    }

    /// Payload size in bytes implied by the nominal dimensions.
    pub fn payload_len(&self) -> usize {
        self.row_stride() * self.payload_rows()
    }
}

/// Locates the raw capture block inside a buffer.
///
/// The capture path appends the raw block to the end of a JPEG stream, so a
/// captured file is "JPEG bytes, then magic, header and payload". A buffer
/// that already starts with the magic is returned as-is; otherwise the
/// buffer is scanned backwards for a magic marker whose header and payload
/// sizes are self-consistent with the remaining length. Returns `None` when
/// no such block exists.
pub fn locate_raw_block(data: &[u8]) -> Option<&[u8]> {
    if data.len() >= MAGIC.len() && data[..MAGIC.len()] == MAGIC {
        return Some(data);
    }

    let mut end = data.len();
    while let Some(pos) = data[..end]
        .windows(MAGIC.len())
        .rposition(|w| w == MAGIC.as_slice())
    {
        let candidate = &data[pos..];
        if let Ok(header) = RawHeader::parse(candidate) {
            if candidate.len() >= PAYLOAD_OFFSET + header.payload_len() {
                return Some(candidate);
            }
        }
        end = pos;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(width: u16, height: u16, bayer_order: u8) -> Vec<u8> {
        let mut record = vec![0u8; HEADER_LEN];
        record[FIELD_WIDTH..FIELD_WIDTH + 2].copy_from_slice(&width.to_le_bytes());
        record[FIELD_HEIGHT..FIELD_HEIGHT + 2].copy_from_slice(&height.to_le_bytes());
        record[FIELD_PADDING_RIGHT..FIELD_PADDING_RIGHT + 2].copy_from_slice(&4u16.to_le_bytes());
        record[FIELD_PADDING_DOWN..FIELD_PADDING_DOWN + 2].copy_from_slice(&2u16.to_le_bytes());
        record[FIELD_TRANSFORM..FIELD_TRANSFORM + 2].copy_from_slice(&3u16.to_le_bytes());
        record[FIELD_BAYER_ORDER] = bayer_order;
        record
    }

    fn buffer_with_header(width: u16, height: u16, bayer_order: u8) -> Vec<u8> {
        let mut buffer = vec![0u8; HEADER_OFFSET + HEADER_LEN];
        buffer[..MAGIC.len()].copy_from_slice(&MAGIC);
        buffer[HEADER_OFFSET..].copy_from_slice(&header_bytes(width, height, bayer_order));
        buffer
    }

    #[test]
    fn parses_fields() {
        let header = RawHeader::parse(&buffer_with_header(16, 8, 2)).unwrap();
        assert_eq!(header.width, 16);
        assert_eq!(header.height, 8);
        assert_eq!(header.padding_right, 4);
        assert_eq!(header.padding_down, 2);
        assert_eq!(header.transform, 3);
        assert_eq!(header.bayer_order, 2);
        assert_eq!(header.packed_row_bytes(), 20);
        assert_eq!(header.row_stride(), 24);
        assert_eq!(header.payload_rows(), 10);
        assert_eq!(header.payload_len(), 240);
    }

    #[test]
    fn rejects_bad_magic_regardless_of_length() {
        let mut long = buffer_with_header(16, 8, 0);
        long[..4].copy_from_slice(b"JUNK");
        assert!(matches!(
            RawHeader::parse(&long),
            Err(ShadingError::Format(_))
        ));

        let short = b"JUNKonly a few bytes";
        assert!(matches!(
            RawHeader::parse(short),
            Err(ShadingError::Format(_))
        ));
    }

    #[test]
    fn rejects_truncated_header() {
        let buffer = &buffer_with_header(16, 8, 0)[..HEADER_OFFSET + 10];
        match RawHeader::parse(buffer) {
            Err(ShadingError::TruncatedData { needed, actual }) => {
                assert_eq!(needed, HEADER_OFFSET + HEADER_LEN);
                assert_eq!(actual, buffer.len());
            }
            other => panic!("expected truncation error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        assert!(matches!(
            RawHeader::parse(&buffer_with_header(0, 8, 0)),
            Err(ShadingError::Format(_))
        ));
        // width must divide into 4-sample groups
        assert!(matches!(
            RawHeader::parse(&buffer_with_header(18, 8, 0)),
            Err(ShadingError::Format(_))
        ));
    }

    #[test]
    fn locates_appended_raw_block() {
        let mut block = buffer_with_header(16, 8, 3);
        let header = RawHeader::parse(&block).unwrap();
        block.resize(PAYLOAD_OFFSET + header.payload_len(), 0);

        let mut file = b"\xff\xd8 jpeg preview bytes \xff\xd9".to_vec();
        file.extend_from_slice(&block);

        let located = locate_raw_block(&file).expect("block not found");
        assert_eq!(located.len(), block.len());
        assert_eq!(&located[..4], &MAGIC);
    }

    #[test]
    fn locate_passes_through_bare_block() {
        let block = buffer_with_header(16, 8, 3);
        let located = locate_raw_block(&block).unwrap();
        assert_eq!(located.len(), block.len());
    }

    #[test]
    fn locate_rejects_buffers_without_block() {
        assert!(locate_raw_block(b"no raw content here").is_none());
        // a stray magic marker without a valid trailing block does not count
        let mut stray = b"prefix BRCM suffix".to_vec();
        stray.extend_from_slice(&[0u8; 64]);
        assert!(locate_raw_block(&stray).is_none());
    }
}
