use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChartError>;

/// Error type shared by chart generation and chart loading.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Corrupt or unreadable audio. Fatal: no chart is written.
    #[error("failed to decode audio: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    #[error("unsupported audio: {0}")]
    Unsupported(String),

    /// Input too sparse to chart: tempo undefined or no pitch found.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// A persisted chart that fails parsing or validation at load time.
    #[error("malformed chart: {0}")]
    Malformed(String),

    #[error("unknown difficulty level: {0:?} (expected easy, medium or hard)")]
    UnknownDifficulty(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
