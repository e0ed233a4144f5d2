use thiserror::Error;

#[derive(Error, Debug)]
pub enum MosaicError {
    #[error("No usable feature correspondences between frames")]
    NoCorrespondence,

    #[error(
        "Placement rows {row_start}..{row_end}, cols {col_start}..{col_end} exceeds canvas {canvas_height}x{canvas_width}"
    )]
    OutOfBounds {
        row_start: i64,
        row_end: i64,
        col_start: i64,
        col_end: i64,
        canvas_height: usize,
        canvas_width: usize,
    },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Invalid image dimensions: height={0}, width={1}")]
    InvalidDimensions(usize, usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MosaicError>;
