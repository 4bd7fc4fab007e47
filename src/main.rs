use lenshade_rs::logger;
use lenshade_rs::shading_pipeline::{CalibrationPipeline, TableConfig};

use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting lenshade...");

    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "raw_capture.jpg".to_string());
    let output = std::env::args()
        .nth(2)
        .unwrap_or_else(|| "ls_table.h".to_string());

    let config = TableConfig::builder().equalize(false).build();
    let pipeline = CalibrationPipeline::new(config);

    info!("Lens shading calibration pipeline initialized");
    info!(
        "Equalize: {}",
        if pipeline.config().equalize {
            "enabled"
        } else {
            "disabled"
        }
    );

    match pipeline.calibrate_file(&input, &output) {
        Ok(table) => info!(
            "Calibration successful! Wrote a {}x{} gain grid",
            table.width, table.height
        ),
        Err(e) => error!("Calibration failed: {}", e),
    }

    Ok(())
}
