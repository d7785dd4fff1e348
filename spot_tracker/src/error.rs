use thiserror::Error;

/// Errors surfaced by the analyzer. Processing a well-formed frame never fails;
/// every variant here describes input the caller should not have produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalyzerError {
    #[error("frame is {actual:?} but the analyzer is configured for {expected:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("frame buffer holds {actual} bytes, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
    #[error("invalid analyzer configuration: {0}")]
    InvalidConfig(String),
}
