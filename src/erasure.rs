/// Byte positions the caller declared unknown, in the order they were read.
///
/// Positions are 0-based from the start of the parsed span. The codec counts from the
/// end of the codeword instead; [`ErasureSet::into_codec_positions`] performs that
/// conversion and consumes the set so it cannot be applied twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErasureSet {
    positions: Vec<usize>,
}

impl ErasureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, pos: usize) {
        debug_assert!(
            self.positions.last().map_or(true, |&last| last < pos),
            "erasures must be recorded left to right"
        );
        self.positions.push(pos);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Start-relative positions in encounter order.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Re-index every position `p` to `codeword_len - p - 1`.
    ///
    /// Positions outside the codeword are dropped.
    pub fn into_codec_positions(self, codeword_len: usize) -> CodecErasures {
        debug_assert!(self.positions.len() <= codeword_len);
        let positions = self
            .positions
            .into_iter()
            .filter(|&p| p < codeword_len)
            .map(|p| codeword_len - p - 1)
            .collect();
        CodecErasures(positions)
    }
}

/// Erasure positions in the codec's convention: 0-based from the end of the codeword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecErasures(Vec<usize>);

impl CodecErasures {
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
