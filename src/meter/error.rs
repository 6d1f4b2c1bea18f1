use std::path::PathBuf;

/// Errors surfaced by meter classification.
#[derive(Debug, thiserror::Error)]
pub enum MeterError {
    #[error("image has zero area ({width}x{height})")]
    InvalidImage { width: u32, height: u32 },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no grid cell was scored; the mapping is empty")]
    NoScoredCells,

    #[error("invalid needle channel: {0:?} (expected r, g or b)")]
    InvalidChannel(String),

    #[error("invalid grid mapping: {0}")]
    InvalidMapping(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write image: {0}")]
    ImageWrite(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
