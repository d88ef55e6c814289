use datameta_codec::CodecError;
use datameta_core::{VerificationError, VersionError};
use thiserror::Error;

/// Lexical failure inside the token reader.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonError {
    #[error("invalid JSON at byte {0}")]
    Invalid(usize),
    #[error("unexpected end of JSON input")]
    UnexpectedEnd,
    #[error("invalid UTF-8 in JSON input")]
    InvalidUtf8,
}

/// Everything that can go wrong while reading or writing the JSON form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonCodecError {
    /// The token stream ended early or had an unexpected shape.
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    /// The envelope names a type that is not in the registry.
    #[error("type not registered: {0}")]
    TypeNotFound(String),
    #[error("type {name} does not decode to {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
    },
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Version(#[from] VersionError),
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

impl JsonCodecError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        JsonCodecError::MalformedDocument(message.into())
    }
}

impl From<JsonError> for JsonCodecError {
    fn from(err: JsonError) -> Self {
        JsonCodecError::MalformedDocument(err.to_string())
    }
}
