use std::io;

use rsline_core::CodecError;

/// A line that could not be turned into bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    #[error("invalid hex pair {pair:?} at column {offset}")]
    InvalidHex { offset: usize, pair: String },
}

/// Failures that end a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}
