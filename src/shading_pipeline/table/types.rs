//! Shading table data model and synthesis configuration

use crate::shading_pipeline::raw::BayerChannel;

/// Number of channels in a shading table.
pub const TABLE_CHANNELS: usize = 4;

/// A per-tile, per-channel gain table.
///
/// Axis order is (channel, row, column) with channels in
/// [`BayerChannel::ALL`] order. Rows and columns are expressed in the
/// consumer's reference frame (the hflip+vflip readout), whatever the
/// orientation of the frame the table was built from. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadingTable {
    /// Number of columns per grid row
    pub width: usize,
    /// Number of grid rows per channel
    pub height: usize,
    /// Gain cells, `TABLE_CHANNELS * height * width`, channel-major
    pub data: Vec<u8>,
}

impl ShadingTable {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> ShadingTable {
        debug_assert_eq!(data.len(), TABLE_CHANNELS * width * height);
        ShadingTable {
            width,
            height,
            data,
        }
    }

    pub fn get(&self, channel: BayerChannel, y: usize, x: usize) -> u8 {
        self.data[(channel as usize * self.height + y) * self.width + x]
    }

    /// The cells of one channel, row-major.
    pub fn channel(&self, channel: BayerChannel) -> &[u8] {
        let len = self.height * self.width;
        let start = channel as usize * len;
        &self.data[start..start + len]
    }

    /// Iterates one channel's grid rows.
    pub fn rows(&self, channel: BayerChannel) -> impl Iterator<Item = &[u8]> {
        self.channel(channel).chunks_exact(self.width)
    }
}

/// Configuration for shading table synthesis
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Tile edge the hardware grid maps to; planes are padded up to the
    /// next whole multiple before downsampling
    pub tile_size: usize,
    /// Gain written for a cell at the channel maximum. Larger values boost
    /// sensitivity and the noise floor with it
    pub gain_scale: f64,
    /// Downsampling stops once the grid width fits `plane_width / grid_divisor`
    pub grid_divisor: usize,
    /// Replace per-channel maxima with the global maximum, folding the
    /// white-balance difference between channels into the table
    pub equalize: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            tile_size: 32,
            gain_scale: 32.0,
            grid_divisor: 16,
            equalize: false,
        }
    }
}

impl TableConfig {
    pub fn builder() -> TableConfigBuilder {
        TableConfigBuilder::default()
    }
}

/// Builder for TableConfig
#[derive(Default)]
pub struct TableConfigBuilder {
    tile_size: Option<usize>,
    gain_scale: Option<f64>,
    grid_divisor: Option<usize>,
    equalize: Option<bool>,
}

impl TableConfigBuilder {
    pub fn tile_size(mut self, tile_size: usize) -> Self {
        self.tile_size = Some(tile_size);
        self
    }

    pub fn gain_scale(mut self, gain_scale: f64) -> Self {
        self.gain_scale = Some(gain_scale);
        self
    }

    pub fn grid_divisor(mut self, grid_divisor: usize) -> Self {
        self.grid_divisor = Some(grid_divisor);
        self
    }

    pub fn equalize(mut self, enable: bool) -> Self {
        self.equalize = Some(enable);
        self
    }

    pub fn build(self) -> TableConfig {
        let default = TableConfig::default();
        TableConfig {
            tile_size: self.tile_size.unwrap_or(default.tile_size),
            gain_scale: self.gain_scale.unwrap_or(default.gain_scale),
            grid_divisor: self.grid_divisor.unwrap_or(default.grid_divisor),
            equalize: self.equalize.unwrap_or(default.equalize),
        }
    }
}
