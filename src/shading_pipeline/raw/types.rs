//! Decoded raw frame data types

use crate::shading_pipeline::common::error::{Result, ShadingError};

/// One of the four Bayer color channels of the sensor.
///
/// The order of [`BayerChannel::ALL`] is the channel order of the
/// `ls_grid` table artifact (R, Gr, Gb, B).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BayerChannel {
    Red,
    Green1,
    Green2,
    Blue,
}

impl BayerChannel {
    /// All channels, in table order.
    pub const ALL: [BayerChannel; 4] = [
        BayerChannel::Red,
        BayerChannel::Green1,
        BayerChannel::Green2,
        BayerChannel::Blue,
    ];

    /// Channel label as it appears in the table artifact comments.
    pub fn label(self) -> &'static str {
        match self {
            BayerChannel::Red => "R",
            BayerChannel::Green1 => "Gr",
            BayerChannel::Green2 => "Gb",
            BayerChannel::Blue => "B",
        }
    }
}

/// Sensor mirroring in effect when a frame was captured, as recorded in the
/// raw header's bayer-order field.
///
/// The code governs both the channel-to-quadrant assignment during decode
/// and the padding/flip geometry during table synthesis; decoding a frame
/// with one code and building its table with another produces a table that
/// corrects the wrong corner of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorOrientation {
    /// Vertical mirror only (code 0).
    VFlip,
    /// No mirroring (code 1).
    Normal,
    /// Horizontal mirror only (code 2).
    HFlip,
    /// Both mirrors (code 3). This is the reference transform of the
    /// downstream gain consumer.
    HVFlip,
}

impl SensorOrientation {
    /// Maps a raw bayer-order code onto an orientation.
    pub fn from_code(code: u8) -> Result<SensorOrientation> {
        match code {
            0 => Ok(SensorOrientation::VFlip),
            1 => Ok(SensorOrientation::Normal),
            2 => Ok(SensorOrientation::HFlip),
            3 => Ok(SensorOrientation::HVFlip),
            other => Err(ShadingError::UnsupportedOrientation(other)),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            SensorOrientation::VFlip => 0,
            SensorOrientation::Normal => 1,
            SensorOrientation::HFlip => 2,
            SensorOrientation::HVFlip => 3,
        }
    }

    /// Whether the readout is mirrored horizontally.
    pub fn hflip(self) -> bool {
        matches!(self, SensorOrientation::HFlip | SensorOrientation::HVFlip)
    }

    /// Whether the readout is mirrored vertically.
    pub fn vflip(self) -> bool {
        matches!(self, SensorOrientation::VFlip | SensorOrientation::HVFlip)
    }
}

/// A single color channel plane, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    /// Width of the plane in pixels
    pub width: usize,
    /// Height of the plane in pixels
    pub height: usize,
    /// Pixel data, `height * width` samples
    pub data: Vec<u16>,
}

impl Plane {
    pub fn new(width: usize, height: usize, data: Vec<u16>) -> Plane {
        debug_assert_eq!(data.len(), width * height);
        Plane {
            width,
            height,
            data,
        }
    }

    /// Constant-valued plane, mainly useful for tests and synthetic frames.
    pub fn filled(width: usize, height: usize, value: u16) -> Plane {
        Plane {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    pub fn get(&self, y: usize, x: usize) -> u16 {
        self.data[y * self.width + x]
    }

    /// Largest sample in the plane, 0 for an empty plane.
    pub fn max_value(&self) -> u16 {
        self.data.iter().copied().max().unwrap_or(0)
    }
}

/// The four half-resolution channel planes of one decoded frame.
///
/// All planes share identical dimensions; no interpolation is involved,
/// each plane is one quadrant of the sensor's 2x2 Bayer tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPlanes {
    pub red: Plane,
    pub green1: Plane,
    pub green2: Plane,
    pub blue: Plane,
}

impl ColorPlanes {
    pub fn plane(&self, channel: BayerChannel) -> &Plane {
        match channel {
            BayerChannel::Red => &self.red,
            BayerChannel::Green1 => &self.green1,
            BayerChannel::Green2 => &self.green2,
            BayerChannel::Blue => &self.blue,
        }
    }

    pub fn width(&self) -> usize {
        self.red.width
    }

    pub fn height(&self) -> usize {
        self.red.height
    }
}

/// Result of decoding one raw frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    /// The four channel planes
    pub planes: ColorPlanes,
    /// Mirroring that was in effect during capture
    pub orientation: SensorOrientation,
}
