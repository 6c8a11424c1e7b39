use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("The variant {start}:{end} does not fit a reference of length {len}.")]
    VariantOutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("The variant list is not sorted and non-overlapping at index {index}.")]
    UnorderedVariants { index: usize },
}
