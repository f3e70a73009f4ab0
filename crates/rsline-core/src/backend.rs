use tracing::debug;

use crate::gf;
use crate::{max_message_len, Checks, CodecError, Corrects, Encodes, RsCodec, MAX_CODEWORD_LEN};

/// Exponent of the first generator root: the code's roots are α^1 ..= α^parity.
const FIRST_ROOT: usize = 1;

/// GF(2^8) Reed-Solomon codec (primitive polynomial 0x11d) with `parity` check bytes.
///
/// Codewords are systematic, `message ‖ parity`, with generator roots α^1 ..= α^parity.
/// Decoding handles erasures and unknown symbol errors together: the erasure locator
/// seeds Berlekamp-Massey, Chien search finds the roots, Forney gives the magnitudes.
pub struct ReedSolomon {
    parity: usize,
    /// Generator polynomial, highest power first, monic.
    generator: Vec<u8>,
}

impl ReedSolomon {
    /// Create a codec appending `parity` bytes per codeword.
    ///
    /// Panics if `parity` is zero or leaves no room for a message.
    pub fn new(parity: usize) -> Self {
        assert!(
            parity > 0 && parity < MAX_CODEWORD_LEN,
            "parity count must be in 1..{MAX_CODEWORD_LEN}, got {parity}"
        );
        Self {
            parity,
            generator: generator_poly(parity),
        }
    }

    fn check_codeword_len(&self, len: usize) -> Result<(), CodecError> {
        if len <= self.parity {
            return Err(CodecError::CodewordTooShort {
                len,
                min: self.parity + 1,
            });
        }
        Ok(())
    }

    /// `S_j = c(α^(j + 1))` for `j` in `0..parity`.
    fn syndromes(&self, codeword: &[u8]) -> Vec<u8> {
        (0..self.parity)
            .map(|j| gf::eval_high_first(codeword, gf::exp(j + FIRST_ROOT)))
            .collect()
    }

    /// Errata locator `Λ(x)`, lowest power first, with one root `X⁻¹ = α^-p` per
    /// erased or erroneous position `p` (counted from the end).
    ///
    /// Berlekamp-Massey starts from the erasure locator so only the remaining
    /// `parity − erasures` syndromes are spent on unknown errors. Returns `None`
    /// when the locator needs more capacity than the code has.
    fn errata_locator(&self, syndromes: &[u8], erasures: &[usize]) -> Option<Vec<u8>> {
        let erased = erasures.len();

        let mut locator = vec![1u8];
        for &p in erasures {
            let x = gf::exp(p);
            locator.push(0);
            for i in (1..locator.len()).rev() {
                locator[i] ^= gf::mul(locator[i - 1], x);
            }
        }

        let mut prev = locator.clone();
        let mut degree = erased;
        for r in erased..self.parity {
            let delta = locator
                .iter()
                .take(r + 1)
                .enumerate()
                .fold(0, |acc, (i, &c)| acc ^ gf::mul(c, syndromes[r - i]));
            prev.insert(0, 0);
            if delta == 0 {
                continue;
            }

            let mut next = locator.clone();
            if next.len() < prev.len() {
                next.resize(prev.len(), 0);
            }
            for (n, &b) in next.iter_mut().zip(&prev) {
                *n ^= gf::mul(delta, b);
            }
            if 2 * degree <= r + erased {
                let scale = gf::inv(delta)?;
                prev = locator.iter().map(|&c| gf::mul(c, scale)).collect();
                degree = r + 1 + erased - degree;
            }
            locator = next;
        }

        while locator.len() > 1 && locator.last() == Some(&0) {
            locator.pop();
        }
        let found = locator.len() - 1;
        if found < erased || 2 * (found - erased) + erased > self.parity {
            debug!(found, erased, "errata locator exceeds capacity");
            return None;
        }
        Some(locator)
    }
}

fn generator_poly(parity: usize) -> Vec<u8> {
    let mut generator = vec![1u8];
    for i in 0..parity {
        let root = gf::exp(i + FIRST_ROOT);
        generator.push(0);
        for j in (1..generator.len()).rev() {
            generator[j] ^= gf::mul(generator[j - 1], root);
        }
    }
    generator
}

/// Positions (from the end) whose `X⁻¹` is a root of `locator`. `None` unless every
/// root lies inside a codeword of `len` bytes.
fn chien_search(locator: &[u8], len: usize) -> Option<Vec<usize>> {
    let roots: Vec<usize> = (0..len)
        .filter(|&p| gf::eval_low_first(locator, gf::exp(gf::ORDER - p)) == 0)
        .collect();
    (roots.len() == locator.len() - 1).then_some(roots)
}

/// Forney: XORs the error magnitude into each located byte of `codeword`.
fn apply_magnitudes(
    syndromes: &[u8],
    locator: &[u8],
    roots: &[usize],
    codeword: &mut [u8],
) -> Option<()> {
    let parity = syndromes.len();

    // Ω(x) = S(x)·Λ(x) mod x^parity
    let mut evaluator = vec![0u8; parity];
    for (i, &s) in syndromes.iter().enumerate() {
        for (j, &c) in locator.iter().take(parity - i).enumerate() {
            evaluator[i + j] ^= gf::mul(s, c);
        }
    }

    // Formal derivative: only odd powers survive in characteristic 2.
    let derivative: Vec<u8> = locator
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, &c)| if i % 2 == 1 { c } else { 0 })
        .collect();

    let len = codeword.len();
    for &p in roots {
        let x_inv = gf::exp(gf::ORDER - p);
        // With the first root at α^1 the X^(1 - b) factor is one.
        let magnitude = gf::div(
            gf::eval_low_first(&evaluator, x_inv),
            gf::eval_low_first(&derivative, x_inv),
        )?;
        codeword[len - 1 - p] ^= magnitude;
    }
    Some(())
}

impl Encodes for ReedSolomon {
    fn encode(&self, message: &[u8]) -> Result<Vec<u8>, CodecError> {
        let max = max_message_len(self.parity);
        if message.len() > max {
            return Err(CodecError::MessageTooLong {
                len: message.len(),
                max,
            });
        }

        // Long division by the generator leaves the remainder in the tail.
        let mut codeword = message.to_vec();
        codeword.resize(message.len() + self.parity, 0);
        for i in 0..message.len() {
            let coef = codeword[i];
            if coef != 0 {
                for (j, &g) in self.generator.iter().enumerate().skip(1) {
                    codeword[i + j] ^= gf::mul(g, coef);
                }
            }
        }
        codeword[..message.len()].copy_from_slice(message);
        Ok(codeword)
    }
}

impl Checks for ReedSolomon {
    fn is_consistent(&self, codeword: &[u8]) -> bool {
        if codeword.len() <= self.parity || codeword.len() > MAX_CODEWORD_LEN {
            return false;
        }
        self.syndromes(codeword).iter().all(|&s| s == 0)
    }
}

impl Corrects for ReedSolomon {
    fn correct(&self, codeword: &mut [u8], erasures: &[usize]) -> Result<(), CodecError> {
        let len = codeword.len();
        self.check_codeword_len(len)?;
        if len > MAX_CODEWORD_LEN || erasures.len() > self.parity {
            debug!(len, erasures = erasures.len(), "correction capacity exceeded up front");
            return Err(CodecError::Uncorrectable);
        }
        if erasures.iter().any(|&p| p >= len) {
            return Err(CodecError::Uncorrectable);
        }

        let syndromes = self.syndromes(codeword);
        if syndromes.iter().all(|&s| s == 0) {
            return Ok(());
        }

        let locator = self
            .errata_locator(&syndromes, erasures)
            .ok_or(CodecError::Uncorrectable)?;
        let Some(roots) = chien_search(&locator, len) else {
            debug!(degree = locator.len() - 1, "locator roots fall outside the codeword");
            return Err(CodecError::Uncorrectable);
        };

        let mut scratch = codeword.to_vec();
        apply_magnitudes(&syndromes, &locator, &roots, &mut scratch)
            .ok_or(CodecError::Uncorrectable)?;

        // A locator that lands on the wrong symbols still yields a buffer.
        if !self.is_consistent(&scratch) {
            return Err(CodecError::Uncorrectable);
        }
        codeword.copy_from_slice(&scratch);
        Ok(())
    }
}

impl RsCodec for ReedSolomon {
    fn parity_len(&self) -> usize {
        self.parity
    }
}
