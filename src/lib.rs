//! rsline — Reed-Solomon codec for shell pipelines
//!
//! This crate provides the line protocol and the encode/decode session loop behind the
//! `rsline` CLI. The codec contract and its GF(2^8) backend live in `rsline-core`.

mod erasure;
mod error;
mod line;
mod session;

pub use erasure::{CodecErasures, ErasureSet};
pub use error::{LineError, SessionError};
pub use line::{
    parse_hex, parse_raw, read_line, to_hex, write_hex, write_raw, LineFormat, Unit, ERASURE_MARKER,
};
pub use session::{decode_codeword, DecodeOutcome, Mode, Session, SessionConfig, SessionStats, Step};

pub use rsline_core::{
    max_message_len, Checks, CodecError, Corrects, Encodes, ReedSolomon, RsCodec, MAX_CODEWORD_LEN,
    PARITY_COUNT,
};
