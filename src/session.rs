use std::io::{BufRead, Write};

use rsline_core::{max_message_len, Checks, Corrects, RsCodec, MAX_CODEWORD_LEN};
use tracing::{debug, warn};

use crate::erasure::CodecErasures;
use crate::line::{parse_hex, read_line, write_hex, LineFormat, Unit};
use crate::SessionError;

/// Which direction the session runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encode,
    Decode,
}

/// Session settings, fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub mode: Mode,
    /// Input format when encoding, output format for recovered data when decoding.
    pub format: LineFormat,
}

/// Result of decoding one codeword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// Syndrome was zero; data used as received.
    Good,
    /// Errors and erasures were repaired.
    Corrected,
    /// Correction failed; data is best-effort.
    Uncorrectable,
}

impl DecodeOutcome {
    /// Status character written in front of decoded data.
    pub fn status(self) -> u8 {
        match self {
            DecodeOutcome::Good => b'G',
            DecodeOutcome::Corrected => b'C',
            DecodeOutcome::Uncorrectable => b'B',
        }
    }
}

/// What a single [`Session::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// One output line was written. Carries the decode outcome in decode mode.
    Emitted(Option<DecodeOutcome>),
    /// The input line was consumed without output.
    Skipped,
    /// Input is exhausted.
    Finished,
}

/// Counters for a completed session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub units: usize,
    pub skipped: usize,
    pub good: usize,
    pub corrected: usize,
    pub uncorrectable: usize,
}

impl SessionStats {
    fn record(&mut self, step: Step) {
        match step {
            Step::Emitted(outcome) => {
                self.units += 1;
                match outcome {
                    Some(DecodeOutcome::Good) => self.good += 1,
                    Some(DecodeOutcome::Corrected) => self.corrected += 1,
                    Some(DecodeOutcome::Uncorrectable) => self.uncorrectable += 1,
                    None => {}
                }
            }
            Step::Skipped => self.skipped += 1,
            Step::Finished => {}
        }
    }
}

/// Check the syndrome and, if needed, correct `codeword` in place.
///
/// `erasures` must already be in the codec's end-relative convention.
pub fn decode_codeword<C: Checks + Corrects>(
    codec: &C,
    codeword: &mut [u8],
    erasures: &CodecErasures,
) -> DecodeOutcome {
    if codec.is_consistent(codeword) {
        return DecodeOutcome::Good;
    }
    match codec.correct(codeword, erasures.as_slice()) {
        Ok(()) => DecodeOutcome::Corrected,
        Err(e) => {
            debug!(error = %e, erasures = erasures.len(), "correction failed");
            DecodeOutcome::Uncorrectable
        }
    }
}

/// Line-by-line encode or decode loop over a reader and a writer.
pub struct Session<C> {
    codec: C,
    config: SessionConfig,
}

impl<C: RsCodec> Session<C> {
    pub fn new(codec: C, config: SessionConfig) -> Self {
        Self { codec, config }
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Process lines until the input is exhausted.
    pub fn run<R: BufRead, W: Write>(
        &self,
        mut input: R,
        mut output: W,
    ) -> Result<SessionStats, SessionError> {
        let mut stats = SessionStats::default();
        loop {
            let step = self.step(&mut input, &mut output)?;
            if step == Step::Finished {
                break;
            }
            stats.record(step);
        }
        debug!(
            units = stats.units,
            skipped = stats.skipped,
            good = stats.good,
            corrected = stats.corrected,
            uncorrectable = stats.uncorrectable,
            "session finished"
        );
        Ok(stats)
    }

    /// Read one line, process it, and write at most one line.
    pub fn step<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> Result<Step, SessionError> {
        match self.config.mode {
            Mode::Encode => self.encode_step(input, output),
            Mode::Decode => self.decode_step(input, output),
        }
    }

    fn encode_step<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> Result<Step, SessionError> {
        let format = self.config.format;
        let max = max_message_len(self.codec.parity_len());
        let Some(line) = read_line(input, format.char_limit(max))? else {
            return Ok(Step::Finished);
        };
        let unit = match format.parse(&line) {
            Ok(unit) => unit,
            Err(e) => {
                warn!(error = %e, "skipping malformed line");
                return Ok(Step::Skipped);
            }
        };
        if format == LineFormat::Hex && unit.bytes.is_empty() {
            return Ok(Step::Finished);
        }
        if !unit.erasures.is_empty() {
            debug!(
                erasures = unit.erasures.len(),
                "erasure markers in encode input are encoded as zero bytes"
            );
        }

        let codeword = self.codec.encode(&unit.bytes)?;
        debug!(message_len = unit.bytes.len(), codeword_len = codeword.len(), "encoded");
        write_hex(output, &codeword)?;
        output.flush()?;
        Ok(Step::Emitted(None))
    }

    fn decode_step<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> Result<Step, SessionError> {
        let parity = self.codec.parity_len();
        let Some(line) = read_line(input, LineFormat::Hex.char_limit(MAX_CODEWORD_LEN))? else {
            return Ok(Step::Finished);
        };
        let Unit {
            bytes: mut codeword,
            erasures,
        } = match parse_hex(&line) {
            Ok(unit) => unit,
            Err(e) => {
                warn!(error = %e, "skipping malformed line");
                return Ok(Step::Skipped);
            }
        };

        let len = codeword.len();
        if len == 0 {
            return Ok(Step::Finished);
        }
        if len <= parity {
            debug!(len, min = parity + 1, "skipping short codeword");
            return Ok(Step::Skipped);
        }

        let erasures = erasures.into_codec_positions(len);
        debug!(len, erasures = ?erasures.as_slice(), "decoding");
        let outcome = decode_codeword(&self.codec, &mut codeword, &erasures);

        output.write_all(&[outcome.status(), b' '])?;
        self.config.format.write(output, &codeword[..len - parity])?;
        output.flush()?;
        Ok(Step::Emitted(Some(outcome)))
    }
}
