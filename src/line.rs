use std::io::{self, BufRead, Read, Write};

use tracing::warn;

use crate::erasure::ErasureSet;
use crate::LineError;

/// The two characters that stand for an erased byte in hex input.
pub const ERASURE_MARKER: &[u8; 2] = b"__";

/// How a line maps to bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    /// The line's bytes, verbatim.
    Raw,
    /// Two hex digits per byte; `__` marks an erasure.
    Hex,
}

impl LineFormat {
    /// Maximum number of input characters that make up `max_bytes` bytes.
    pub fn char_limit(self, max_bytes: usize) -> usize {
        match self {
            LineFormat::Raw => max_bytes,
            LineFormat::Hex => max_bytes * 2,
        }
    }

    pub fn parse(self, line: &[u8]) -> Result<Unit, LineError> {
        match self {
            LineFormat::Raw => Ok(parse_raw(line)),
            LineFormat::Hex => parse_hex(line),
        }
    }

    /// Write `bytes` in this format followed by a newline.
    pub fn write(self, out: &mut impl Write, bytes: &[u8]) -> io::Result<()> {
        match self {
            LineFormat::Raw => write_raw(out, bytes),
            LineFormat::Hex => write_hex(out, bytes),
        }
    }
}

/// One parsed input line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unit {
    pub bytes: Vec<u8>,
    pub erasures: ErasureSet,
}

/// Read one line of at most `limit` bytes, without its trailing newline.
///
/// Returns `None` once the input is exhausted. A line longer than `limit` is cut at
/// the limit and the rest comes back from the next call. When the cut falls right
/// before the line end (`\n`, `\r\n` or a bare `\r`), the line end is consumed with it.
pub fn read_line<R: BufRead>(reader: &mut R, limit: usize) -> io::Result<Option<Vec<u8>>> {
    let mut buf = Vec::with_capacity(limit.min(512) + 1);
    let read = reader
        .by_ref()
        .take(limit as u64)
        .read_until(b'\n', &mut buf)?;
    if read == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
    } else if buf.len() == limit {
        consume_line_end(reader)?;
    }
    Ok(Some(buf))
}

/// Swallows the line end that directly follows a full-length read.
///
/// The `\r` and `\n` of a CRLF may sit in different buffer fills, so each is peeked
/// separately.
fn consume_line_end<R: BufRead>(reader: &mut R) -> io::Result<()> {
    match reader.fill_buf()?.first().copied() {
        Some(b'\n') => reader.consume(1),
        Some(b'\r') => {
            reader.consume(1);
            if reader.fill_buf()?.first() == Some(&b'\n') {
                reader.consume(1);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Raw mode: the line is the message.
pub fn parse_raw(line: &[u8]) -> Unit {
    Unit {
        bytes: line.to_vec(),
        erasures: ErasureSet::new(),
    }
}

/// Hex mode: two characters per byte, read left to right.
///
/// Trailing whitespace (such as the `\r` of a CRLF line ending) is ignored, and so is
/// a dangling final character. Every other pair must be two hex digits or the
/// erasure marker `__`.
pub fn parse_hex(line: &[u8]) -> Result<Unit, LineError> {
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    let line = &line[..end];

    let pairs = line.chunks_exact(2);
    if !pairs.remainder().is_empty() {
        warn!(
            chars = line.len(),
            "odd number of hex characters, ignoring the last one"
        );
    }

    let mut unit = Unit {
        bytes: Vec::with_capacity(line.len() / 2),
        erasures: ErasureSet::new(),
    };
    for (i, pair) in pairs.enumerate() {
        if pair == ERASURE_MARKER {
            unit.erasures.push(i);
            unit.bytes.push(0);
            continue;
        }
        let mut byte = [0u8; 1];
        hex::decode_to_slice(pair, &mut byte).map_err(|_| LineError::InvalidHex {
            offset: i * 2,
            pair: String::from_utf8_lossy(pair).into_owned(),
        })?;
        unit.bytes.push(byte[0]);
    }
    Ok(unit)
}

/// Uppercase hex, no separators.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

pub fn write_hex(out: &mut impl Write, bytes: &[u8]) -> io::Result<()> {
    out.write_all(to_hex(bytes).as_bytes())?;
    out.write_all(b"\n")
}

pub fn write_raw(out: &mut impl Write, bytes: &[u8]) -> io::Result<()> {
    out.write_all(bytes)?;
    out.write_all(b"\n")
}
