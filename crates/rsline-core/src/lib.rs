//! rsline — Reed-Solomon line codec (core library)
//!
//! This crate defines the codec contract consumed by the `rsline` session loop and
//! binds it to a GF(2^8) Reed-Solomon implementation.
//!
//! The contract is split into capabilities so callers only ask for what they use:
//! [`Encodes`] appends parity, [`Checks`] tests the syndrome, [`Corrects`] repairs a
//! codeword given explicit erasures plus unknown symbol errors. [`RsCodec`] bundles the
//! three with the parity count.

mod backend;
mod gf;

pub use backend::ReedSolomon;

/// Number of parity bytes appended to every codeword.
pub const PARITY_COUNT: usize = 4;

/// Largest codeword the GF(2^8) code can address.
pub const MAX_CODEWORD_LEN: usize = 255;

/// Largest message that still fits in one codeword with `parity` parity bytes.
pub const fn max_message_len(parity: usize) -> usize {
    MAX_CODEWORD_LEN - parity
}

/// Codec failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("message too long: {len} bytes (max {max})")]
    MessageTooLong { len: usize, max: usize },

    #[error("codeword too short: {len} bytes (need at least {min})")]
    CodewordTooShort { len: usize, min: usize },

    #[error("too many errors to correct")]
    Uncorrectable,
}

/// Appends parity to a message.
pub trait Encodes {
    /// Returns `message ‖ parity`.
    fn encode(&self, message: &[u8]) -> Result<Vec<u8>, CodecError>;
}

/// Syndrome check.
pub trait Checks {
    /// True when the codeword is a valid encoding (all syndromes zero).
    fn is_consistent(&self, codeword: &[u8]) -> bool;
}

/// Error-and-erasure correction.
pub trait Corrects {
    /// Repairs `codeword` in place.
    ///
    /// `erasures` are 0-based positions counted from the **end** of the codeword
    /// (the last parity byte is position 0). On failure the buffer is left untouched
    /// and [`CodecError::Uncorrectable`] is returned.
    fn correct(&self, codeword: &mut [u8], erasures: &[usize]) -> Result<(), CodecError>;
}

/// A complete Reed-Solomon codec with a fixed parity count.
pub trait RsCodec: Encodes + Checks + Corrects {
    fn parity_len(&self) -> usize;
}

impl<T: RsCodec + ?Sized> Encodes for &T {
    fn encode(&self, message: &[u8]) -> Result<Vec<u8>, CodecError> {
        (**self).encode(message)
    }
}

impl<T: RsCodec + ?Sized> Checks for &T {
    fn is_consistent(&self, codeword: &[u8]) -> bool {
        (**self).is_consistent(codeword)
    }
}

impl<T: RsCodec + ?Sized> Corrects for &T {
    fn correct(&self, codeword: &mut [u8], erasures: &[usize]) -> Result<(), CodecError> {
        (**self).correct(codeword, erasures)
    }
}

impl<T: RsCodec + ?Sized> RsCodec for &T {
    fn parity_len(&self) -> usize {
        (**self).parity_len()
    }
}
