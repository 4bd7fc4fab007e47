#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use crate::shading_pipeline::calibration::CalibrationPipeline;
    use crate::shading_pipeline::codec::{LsGridReader, TableReader, TableWriter};
    use crate::shading_pipeline::common::error::{Result, ShadingError};
    use crate::shading_pipeline::raw::header::{HEADER_OFFSET, MAGIC, PAYLOAD_OFFSET};
    use crate::shading_pipeline::raw::{
        ColorPlanes, DecodedFrame, FrameDecoder, Plane, SensorOrientation,
    };
    use crate::shading_pipeline::table::{ShadingTable, TableConfig};

    struct MockDecoder {
        should_fail: bool,
        frame: Option<DecodedFrame>,
    }

    impl FrameDecoder for MockDecoder {
        fn decode(&self, _data: &[u8]) -> Result<DecodedFrame> {
            if self.should_fail {
                return Err(ShadingError::Format("Mock decode error".to_string()));
            }
            Ok(self.frame.clone().unwrap_or_else(|| uniform_frame(48, 48, 700)))
        }
    }

    struct MockWriter {
        should_fail: bool,
        written: Arc<Mutex<Vec<ShadingTable>>>,
    }

    impl TableWriter for MockWriter {
        fn write_table(&self, table: &ShadingTable, _output: &mut dyn Write) -> Result<()> {
            if self.should_fail {
                return Err(ShadingError::OutputWrite("Mock write error".to_string()));
            }
            self.written.lock().unwrap().push(table.clone());
            Ok(())
        }
    }

    fn uniform_frame(width: usize, height: usize, value: u16) -> DecodedFrame {
        let plane = Plane::filled(width, height, value);
        DecodedFrame {
            planes: ColorPlanes {
                red: plane.clone(),
                green1: plane.clone(),
                green2: plane.clone(),
                blue: plane,
            },
            orientation: SensorOrientation::HVFlip,
        }
    }

    /// A self-consistent capture buffer with every sample set to `value`.
    fn uniform_buffer(width: usize, height: usize, bayer_order: u8, value: u16) -> Vec<u8> {
        let stride = width / 4 * 5;
        let mut buffer = vec![0u8; PAYLOAD_OFFSET + stride * height];
        buffer[..4].copy_from_slice(&MAGIC);
        buffer[HEADER_OFFSET + 32..HEADER_OFFSET + 34]
            .copy_from_slice(&(width as u16).to_le_bytes());
        buffer[HEADER_OFFSET + 34..HEADER_OFFSET + 36]
            .copy_from_slice(&(height as u16).to_le_bytes());
        buffer[HEADER_OFFSET + 68] = bayer_order;

        for y in 0..height {
            let row = PAYLOAD_OFFSET + y * stride;
            for g in 0..width / 4 {
                let mut low = 0u8;
                for i in 0..4 {
                    buffer[row + 5 * g + i] = (value >> 2) as u8;
                    low |= ((value & 0b11) as u8) << (6 - 2 * i);
                }
                buffer[row + 5 * g + 4] = low;
            }
        }
        buffer
    }

    #[test]
    fn test_config_builder() {
        let config = TableConfig::builder()
            .tile_size(64)
            .gain_scale(64.0)
            .grid_divisor(8)
            .equalize(true)
            .build();

        assert_eq!(config.tile_size, 64);
        assert_eq!(config.gain_scale, 64.0);
        assert_eq!(config.grid_divisor, 8);
        assert!(config.equalize);

        let default = TableConfig::builder().build();
        assert_eq!(default.tile_size, 32);
        assert_eq!(default.gain_scale, 32.0);
        assert_eq!(default.grid_divisor, 16);
        assert!(!default.equalize);
    }

    #[test]
    fn test_successful_calibration() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let decoder = MockDecoder {
            should_fail: false,
            frame: None,
        };
        let writer = MockWriter {
            should_fail: false,
            written: written.clone(),
        };

        let pipeline = CalibrationPipeline::with_custom(decoder, writer, TableConfig::default());

        let mut output = Vec::new();
        let table = pipeline.calibrate(b"fake capture data", &mut output).unwrap();

        let captured = written.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0], table);
        assert!(table.data.iter().all(|&g| g == 32));
    }

    #[test]
    fn test_decoder_failure() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let decoder = MockDecoder {
            should_fail: true,
            frame: None,
        };
        let writer = MockWriter {
            should_fail: false,
            written: written.clone(),
        };

        let pipeline = CalibrationPipeline::with_custom(decoder, writer, TableConfig::default());

        let mut output = Vec::new();
        let result = pipeline.calibrate(b"fake capture data", &mut output);

        assert!(matches!(result, Err(ShadingError::Format(_))));
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_writer_failure() {
        let decoder = MockDecoder {
            should_fail: false,
            frame: None,
        };
        let writer = MockWriter {
            should_fail: true,
            written: Arc::new(Mutex::new(Vec::new())),
        };

        let pipeline = CalibrationPipeline::with_custom(decoder, writer, TableConfig::default());

        let mut output = Vec::new();
        let result = pipeline.calibrate(b"fake capture data", &mut output);

        assert!(matches!(result, Err(ShadingError::OutputWrite(_))));
    }

    #[test]
    fn test_dimension_validation_failure() {
        let decoder = MockDecoder {
            should_fail: false,
            frame: Some(uniform_frame(0, 0, 0)),
        };
        let writer = MockWriter {
            should_fail: false,
            written: Arc::new(Mutex::new(Vec::new())),
        };

        let pipeline = CalibrationPipeline::with_custom(decoder, writer, TableConfig::default());

        let mut output = Vec::new();
        let result = pipeline.calibrate(b"fake capture data", &mut output);

        assert!(matches!(
            result,
            Err(ShadingError::InvalidDimensions(0, 0))
        ));
    }

    #[test]
    fn test_end_to_end_artifact() {
        // 513 exercises both the high byte and the packed low bits
        let buffer = uniform_buffer(64, 32, 3, 513);
        let pipeline = CalibrationPipeline::new(TableConfig::default());

        let mut output = Vec::new();
        let table = pipeline.calibrate(&buffer, &mut output).unwrap();

        assert_eq!((table.width, table.height), (2, 1));
        assert!(table.data.iter().all(|&g| g == 32));

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("uint8_t ls_grid[] = {\n//R - Ch 3\n"));
        assert_eq!(LsGridReader.read_table(&text).unwrap(), table);
    }

    #[test]
    fn test_jpeg_wrapped_capture() {
        let mut file = b"\xff\xd8 jpeg preview \xff\xd9".to_vec();
        file.extend_from_slice(&uniform_buffer(64, 32, 1, 800));

        let pipeline = CalibrationPipeline::new(TableConfig::default());
        let mut output = Vec::new();
        let table = pipeline.calibrate(&file, &mut output).unwrap();
        assert!(table.data.iter().all(|&g| g == 32));
    }

    #[test]
    fn test_calibrate_file() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("capture.raw");
        let output_path = dir.path().join("ls_table.h");
        std::fs::write(&input_path, uniform_buffer(64, 32, 3, 900)).unwrap();

        let pipeline = CalibrationPipeline::new(TableConfig::default());
        let table = pipeline.calibrate_file(&input_path, &output_path).unwrap();

        let text = std::fs::read_to_string(&output_path).unwrap();
        assert!(text.ends_with("uint32_t grid_height = 1;\n"));
        assert_eq!(LsGridReader.read_table(&text).unwrap(), table);
    }

    #[test]
    fn test_missing_input_file() {
        let pipeline = CalibrationPipeline::new(TableConfig::default());
        let result = pipeline.calibrate_file("/nonexistent/capture.raw", "/tmp/out.h");
        assert!(matches!(result, Err(ShadingError::InputRead(_))));
    }
}
