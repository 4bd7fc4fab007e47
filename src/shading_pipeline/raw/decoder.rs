use crate::shading_pipeline::common::error::Result;
use crate::shading_pipeline::raw::types::DecodedFrame;

pub trait FrameDecoder {
    fn decode(&self, data: &[u8]) -> Result<DecodedFrame>;
}
