/// Broad category of a failure, shared by [`Error`] and [`crate::ParserError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed notation or a value outside the accepted range.
    Syntax,
    /// A modifier token with a recognizable shape that is not supported.
    UnknownAlgorithm,
    /// A configuration that can never finish evaluating.
    IllegalValue,
}


/// Errors raised while constructing a node of the dice tree.
///
/// Every node validates its configuration when it is built, so evaluating an
/// existing tree never fails.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Die needs at least 2 sides, got {0}")]
    TooFewSides(i64),

    #[error("Custom die needs at least 2 values, got {0}")]
    TooFewValues(usize),

    #[error("Threshold {threshold} exceeds the {count} rollables in the pool")]
    ThresholdOutOfRange {
        threshold: usize,
        count: usize
    },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Explode never stops: {0}")]
    InfiniteLoop(String),
}

impl Error {
    /// Returns the [`ErrorKind`] this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownAlgorithm(_) => ErrorKind::UnknownAlgorithm,
            Error::InfiniteLoop(_) => ErrorKind::IllegalValue,
            _ => ErrorKind::Syntax
        }
    }
}
