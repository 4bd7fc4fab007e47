//! Raw frame decoding module
//!
//! This module unpacks Broadcom packed capture buffers into half-resolution
//! color channel planes, orientation included.

mod broadcom_decoder;
mod decoder;
pub mod header;
pub mod types;

pub use broadcom_decoder::BroadcomDecoder;
pub use decoder::FrameDecoder;
pub use header::{MAGIC, PAYLOAD_OFFSET, RawHeader, locate_raw_block};
pub use types::{BayerChannel, ColorPlanes, DecodedFrame, Plane, SensorOrientation};
