/// A fixed-capacity bitset over machine words, just enough for the
/// per-position nucleotide sets of the comparator.
#[derive(Debug, Clone)]
pub(crate) struct Bitset {
    words: Vec<u64>,
}

impl Bitset {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(u64::BITS as usize)],
        }
    }

    /// Sets every bit in `[start, end)`.
    pub(crate) fn set_range(&mut self, start: usize, end: usize) {
        for index in start..end {
            self.words[index / u64::BITS as usize] |= 1 << (index % u64::BITS as usize);
        }
    }

    pub(crate) fn intersection_count(&self, other: &Self) -> usize {
        self.words
            .iter()
            .zip(&other.words)
            .map(|(lhs, rhs)| (lhs & rhs).count_ones() as usize)
            .sum()
    }
}
