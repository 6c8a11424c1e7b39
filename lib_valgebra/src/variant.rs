use crate::error::{Error, Result};

/// A difference against a reference sequence: the half-open range
/// `reference[start..end)` is replaced by `sequence`. Equal bounds denote a
/// pure insertion, an empty `sequence` a pure deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variant {
    pub start: usize,
    pub end: usize,
    pub sequence: Vec<u8>,
}

impl Variant {
    pub fn new(start: usize, end: usize, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            start,
            end,
            sequence: sequence.into(),
        }
    }

    /// The number of symbols affected: deleted plus inserted.
    pub fn len(&self) -> usize {
        self.end - self.start + self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end && self.sequence.is_empty()
    }

    /// The single variant covering a sorted, non-overlapping variant list:
    /// minimal start, maximal end and the patched subsequence in between.
    pub fn spanning(reference: &[u8], variants: &[Variant]) -> Result<Self> {
        if variants.is_empty() {
            return Ok(Self::default());
        }
        for variant in variants {
            variant.check(reference.len())?;
        }
        let start = variants.iter().map(|variant| variant.start).min().unwrap();
        let end = variants.iter().map(|variant| variant.end).max().unwrap();
        let window: Vec<Variant> = variants
            .iter()
            .map(|variant| {
                Variant::new(
                    variant.start - start,
                    variant.end - start,
                    variant.sequence.clone(),
                )
            })
            .collect();
        let sequence = patch(&reference[start..end], &window)?;
        Ok(Self::new(start, end, sequence))
    }

    pub(crate) fn check(&self, len: usize) -> Result<()> {
        if self.start > self.end || self.end > len {
            return Err(Error::VariantOutOfBounds {
                start: self.start,
                end: self.end,
                len,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}/{}",
            self.start,
            self.end,
            String::from_utf8_lossy(&self.sequence)
        )
    }
}

/// Applies a sorted, non-overlapping variant list to `reference`, yielding
/// the observed sequence.
pub fn patch(reference: &[u8], variants: &[Variant]) -> Result<Vec<u8>> {
    let mut observed = Vec::with_capacity(reference.len());
    let mut start = 0;
    for (index, variant) in variants.iter().enumerate() {
        variant.check(reference.len())?;
        if variant.start < start {
            return Err(Error::UnorderedVariants { index });
        }
        observed.extend_from_slice(&reference[start..variant.start]);
        observed.extend_from_slice(&variant.sequence);
        start = variant.end;
    }
    observed.extend_from_slice(&reference[start..]);
    Ok(observed)
}

/// The lengths of the common prefix and the common suffix of two sequences.
/// The suffix does not overlap the prefix.
pub fn trim(lhs: &[u8], rhs: &[u8]) -> (usize, usize) {
    let prefix = lhs
        .iter()
        .zip(rhs)
        .take_while(|(lhs, rhs)| lhs == rhs)
        .count();
    let suffix = lhs[prefix..]
        .iter()
        .rev()
        .zip(rhs[prefix..].iter().rev())
        .take_while(|(lhs, rhs)| lhs == rhs)
        .count();
    (prefix, suffix)
}
