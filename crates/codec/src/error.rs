use datameta_buffers::BufferError;
use datameta_core::{BitSetError, VerificationError, VersionError};
use thiserror::Error;

/// Everything that can go wrong while encoding or decoding the binary form.
///
/// Every variant is fatal to the current call; a failed read leaves no usable
/// partial value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error("time zone id not supported: {0}")]
    UnsupportedZone(String),
    #[error("time zone key {0} is not registered")]
    UnknownZoneKey(i32),
    #[error("variable-length value {0} does not fit in 32 bits")]
    VarIntOverflow(i64),
    #[error("negative length prefix: {0}")]
    NegativeLength(i32),
    #[error("invalid decimal: {0}")]
    InvalidDecimal(String),
    #[error("invalid date-time: {0}")]
    InvalidDateTime(String),
    #[error(transparent)]
    Version(#[from] VersionError),
    #[error(transparent)]
    Verification(#[from] VerificationError),
    #[error(transparent)]
    BitSet(#[from] BitSetError),
}
