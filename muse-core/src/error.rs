use std::io;

use thiserror::Error;

/// Failure modes of one prediction call. Every variant is terminal: there is
/// no retry and no partial-success result.
#[derive(Debug, Error)]
pub enum PredictError {
    /// The request was malformed; rejected before any external work.
    #[error("{0}")]
    InvalidInput(String),

    /// The output directory could not be created or the inference process
    /// could not be launched.
    #[error("failed to run the inference process: {0}")]
    Io(#[from] io::Error),

    /// The inference process exited non-zero.
    #[error("the inference script failed: {stderr}")]
    Inference { stderr: String },
}
