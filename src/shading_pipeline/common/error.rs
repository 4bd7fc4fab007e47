use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShadingError {
    #[error("Failed to read input file: {0}")]
    InputRead(String),

    #[error("Failed to write output file: {0}")]
    OutputWrite(String),

    #[error("Invalid raw frame format: {0}")]
    Format(String),

    #[error("Raw frame truncated: need {needed} bytes, got {actual}")]
    TruncatedData { needed: usize, actual: usize },

    #[error("Unsupported sensor orientation code: {0}")]
    UnsupportedOrientation(u8),

    #[error("Failed to parse shading table: {0}")]
    Parse(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ShadingError>;
