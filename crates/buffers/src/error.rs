use thiserror::Error;

/// Failure while pulling bytes out of a [`crate::BinarySource`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("invalid UTF-8")]
    InvalidUtf8,
}
