//! Shading table synthesis.
//!
//! A table is derived from one frame's channel planes in five steps: pad
//! each plane up to whole hardware tiles with edge replication, downsample
//! by repeated 2x2 area averaging, take per-channel maxima, divide maxima
//! by cells to get gains, and flip the grid into the consumer's reference
//! frame. The repeated halving matters: one large resize would alias, and
//! the averaging cascade is what washes the sensor noise out of the
//! calibration.

use tracing::{debug, warn};

use crate::shading_pipeline::common::error::{Result, ShadingError};
use crate::shading_pipeline::raw::{BayerChannel, ColorPlanes, Plane, SensorOrientation};
use crate::shading_pipeline::table::types::{ShadingTable, TABLE_CHANNELS, TableConfig};

/// Working grid, promoted to floating point for the averaging cascade.
struct GridF {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl GridF {
    fn max_value(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }
}

/// Sides of a plane that receive the tile padding.
struct PadCorner {
    left: bool,
    top: bool,
}

/// Axes of the gain grid that are mirrored into the reference frame.
struct FlipSpec {
    rows: bool,
    cols: bool,
}

/// Padding goes on the side away from the image's physical top-left corner,
/// so that corner always lands on the same logical corner of the padded
/// grid. One hand-checked case per orientation; keep it a closed table.
fn pad_corner(orientation: SensorOrientation) -> PadCorner {
    match orientation {
        SensorOrientation::VFlip => PadCorner {
            left: true,
            top: false,
        },
        SensorOrientation::Normal => PadCorner {
            left: true,
            top: true,
        },
        SensorOrientation::HFlip => PadCorner {
            left: false,
            top: true,
        },
        SensorOrientation::HVFlip => PadCorner {
            left: false,
            top: false,
        },
    }
}

/// The consumer expects tables in the hflip+vflip readout frame; every
/// other orientation mirrors the axes it disagrees on.
fn flip_spec(orientation: SensorOrientation) -> FlipSpec {
    match orientation {
        SensorOrientation::VFlip => FlipSpec {
            rows: false,
            cols: true,
        },
        SensorOrientation::Normal => FlipSpec {
            rows: true,
            cols: true,
        },
        SensorOrientation::HFlip => FlipSpec {
            rows: true,
            cols: false,
        },
        SensorOrientation::HVFlip => FlipSpec {
            rows: false,
            cols: false,
        },
    }
}

/// Next whole-tile size above `dim`. Always adds at least one full tile,
/// even when `dim` is already a multiple; the hardware grid mapping relies
/// on this.
fn padded_dim(dim: usize, tile: usize) -> usize {
    (dim / tile + 1) * tile
}

/// Extends a plane to `width + pad_w` by `height + pad_h` by replicating
/// the border pixels outward on the sides `corner` selects. Never zero
/// fill here: padded cells must track the border brightness or the edge
/// gains come out biased.
fn pad_replicate(plane: &Plane, pad_w: usize, pad_h: usize, corner: &PadCorner) -> GridF {
    let full_w = plane.width + pad_w;
    let full_h = plane.height + pad_h;
    let x0 = if corner.left { pad_w } else { 0 };
    let y0 = if corner.top { pad_h } else { 0 };

    let mut data = Vec::with_capacity(full_w * full_h);
    for y in 0..full_h {
        let sy = y.saturating_sub(y0).min(plane.height - 1);
        for x in 0..full_w {
            let sx = x.saturating_sub(x0).min(plane.width - 1);
            data.push(f64::from(plane.get(sy, sx)));
        }
    }
    GridF {
        width: full_w,
        height: full_h,
        data,
    }
}

/// One exact 2x2 area-averaging step. Odd trailing rows/columns drop out;
/// they never occur for whole-tile inputs.
fn halve(grid: &GridF) -> GridF {
    let width = grid.width / 2;
    let height = grid.height / 2;
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let i = 2 * y * grid.width + 2 * x;
            let sum =
                grid.data[i] + grid.data[i + 1] + grid.data[i + grid.width] + grid.data[i + grid.width + 1];
            data.push(sum * 0.25);
        }
    }
    GridF {
        width,
        height,
        data,
    }
}

/// Builds shading tables from decoded channel planes.
pub struct ShadingTableBuilder {
    config: TableConfig,
}

impl ShadingTableBuilder {
    pub fn new(config: TableConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Synthesizes the gain table for one frame.
    ///
    /// `orientation` must be the code the frame was decoded with; the
    /// padding corner and the output flips both key off it.
    pub fn build(
        &self,
        planes: &ColorPlanes,
        orientation: SensorOrientation,
    ) -> Result<ShadingTable> {
        let (width, height) = (planes.width(), planes.height());
        if width == 0 || height == 0 {
            return Err(ShadingError::InvalidDimensions(width, height));
        }

        let pad_w = padded_dim(width, self.config.tile_size) - width;
        let pad_h = padded_dim(height, self.config.tile_size) - height;
        let corner = pad_corner(orientation);

        let grids: Vec<GridF> = BayerChannel::ALL
            .iter()
            .map(|&channel| {
                let padded = pad_replicate(planes.plane(channel), pad_w, pad_h, &corner);
                self.shrink(padded, width)
            })
            .collect();

        let mut maxima: Vec<f64> = grids.iter().map(GridF::max_value).collect();
        if self.config.equalize {
            let global = maxima.iter().copied().fold(0.0, f64::max);
            maxima.fill(global);
        }
        debug!(
            ?maxima,
            equalize = self.config.equalize,
            "Channel maxima for gain computation"
        );

        let grid_w = grids[0].width;
        let grid_h = grids[0].height;
        let flip = flip_spec(orientation);
        let mut data = Vec::with_capacity(TABLE_CHANNELS * grid_w * grid_h);
        let mut zero_cells = 0usize;

        for (grid, &channel_max) in grids.iter().zip(maxima.iter()) {
            for y in 0..grid_h {
                let sy = if flip.rows { grid_h - 1 - y } else { y };
                for x in 0..grid_w {
                    let sx = if flip.cols { grid_w - 1 - x } else { x };
                    let cell = grid.data[sy * grid_w + sx];
                    if cell == 0.0 {
                        // known soft failure: a dead calibration cell keeps
                        // gain 0 and disables correction there
                        zero_cells += 1;
                        data.push(0);
                    } else {
                        let gain = self.config.gain_scale * channel_max / cell;
                        data.push(gain.clamp(0.0, 255.0) as u8);
                    }
                }
            }
        }

        if zero_cells > 0 {
            warn!(
                zero_cells,
                "zero-valued calibration cells leave their tiles uncorrected"
            );
        }

        debug!(grid_w, grid_h, "Synthesized shading table");
        Ok(ShadingTable::new(grid_w, grid_h, data))
    }

    /// Halves the padded grid until its width fits the configured fraction
    /// of the pre-pad plane width.
    fn shrink(&self, mut grid: GridF, source_width: usize) -> GridF {
        let target = source_width / self.config.grid_divisor;
        while grid.width > target && grid.width >= 2 && grid.height >= 2 {
            grid = halve(&grid);
        }
        grid
    }
}
