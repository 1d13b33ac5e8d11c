use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    // On-disk size differs from header plus body
    #[error("fixture is {actual} bytes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("missing \"1.\" header")]
    MissingHeader,
}
