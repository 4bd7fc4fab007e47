use std::io::Write;
use std::path::Path;
use tracing::{info, instrument};

use crate::shading_pipeline::{
    codec::{LsGridWriter, TableWriter},
    common::error::{Result, ShadingError},
    raw::{BroadcomDecoder, FrameDecoder, locate_raw_block},
    table::{ShadingTable, ShadingTableBuilder, TableConfig},
};

pub struct CalibrationPipeline<D: FrameDecoder, W: TableWriter> {
    decoder: D,
    writer: W,
    builder: ShadingTableBuilder,
}

impl CalibrationPipeline<BroadcomDecoder, LsGridWriter> {
    pub fn new(config: TableConfig) -> Self {
        Self {
            decoder: BroadcomDecoder,
            writer: LsGridWriter,
            builder: ShadingTableBuilder::new(config),
        }
    }
}

impl<D: FrameDecoder, W: TableWriter> CalibrationPipeline<D, W> {
    pub fn with_custom(decoder: D, writer: W, config: TableConfig) -> Self {
        Self {
            decoder,
            writer,
            builder: ShadingTableBuilder::new(config),
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(ShadingError::InvalidDimensions(width, height));
        }
        Ok(())
    }

    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn calibrate(&self, input_data: &[u8], output: &mut dyn Write) -> Result<ShadingTable> {
        info!("Starting lens shading calibration");

        // captured files carry the raw block appended to a JPEG stream;
        // bare raw dumps pass through unchanged
        let raw_data = locate_raw_block(input_data).unwrap_or(input_data);

        let frame = {
            let _span = tracing::info_span!("decode_frame").entered();
            self.decoder.decode(raw_data)?
        };

        {
            let _span = tracing::info_span!(
                "validate_dimensions",
                width = frame.planes.width(),
                height = frame.planes.height()
            )
            .entered();
            self.validate_dimensions(frame.planes.width(), frame.planes.height())?;
        }

        let table = {
            let _span = tracing::info_span!("build_table").entered();
            self.builder.build(&frame.planes, frame.orientation)?
        };

        {
            let _span = tracing::info_span!("write_table").entered();
            self.writer.write_table(&table, output)?;
        }

        info!(
            grid_width = table.width,
            grid_height = table.height,
            orientation = frame.orientation.code(),
            "Calibration complete"
        );
        Ok(table)
    }

    #[instrument(skip(self, input_path, output_path))]
    pub fn calibrate_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<ShadingTable> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Calibrating from file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ShadingError::InputRead(format!("{}: {}", input_path.display(), e))
            })?
        };

        let mut output_file = {
            let _span = tracing::info_span!("create_output_file").entered();
            std::fs::File::create(output_path).map_err(|e| {
                ShadingError::OutputWrite(format!("{}: {}", output_path.display(), e))
            })?
        };

        self.calibrate(&input_data, &mut output_file)
    }

    pub fn config(&self) -> &TableConfig {
        self.builder.config()
    }
}
