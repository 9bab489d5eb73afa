use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("Invalid page dimensions: {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Cannot allocate a zero-area rectangle ({width}x{height})")]
    EmptyRect { width: i32, height: i32 },
    #[error("Source rectangle out of range: ({x},{y}) {width}x{height}")]
    InvalidRect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    #[error("Rectangle does not fit on a fresh page")]
    OutOfSpace,
    #[error("Nothing to pack")]
    Empty,
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AtlasError>;
