use std::num::{ParseFloatError, ParseIntError};

use bstr::BString;
use thiserror::Error;

/// Errors reported by [`Decoder`](crate::Decoder).
///
/// Every failing read stores a copy of its error on the decoder, so the value
/// returned from the failing call and [`Decoder::error`](crate::Decoder::error)
/// always compare equal.
#[derive(Debug, Clone, Error, PartialEq)]
#[allow(missing_docs)]
pub enum DecodeError {
    #[error("start delimiter '{0}' missing")]
    MissingStartDelimiter(char),
    #[error("end delimiter '{0}' missing")]
    MissingEndDelimiter(char),
    #[error("field separator ',' missing")]
    MissingFieldSeparator,
    #[error("key delimiter ':' missing")]
    MissingKeyDelimiter,
    #[error("string delimiter '\"' missing")]
    MissingStringDelimiter,
    #[error("incomplete string: reached EOF")]
    IncompleteString,
    #[error("invalid boolean value")]
    InvalidBool,
    /// No token where a number was expected. Carries the reader kind.
    #[error("{0} error: no input")]
    NoInput(&'static str),
    /// An unsigned reader met a leading `+`.
    #[error("unsigned integer error: unexpected sign")]
    UnexpectedSign,
    #[error("integer error: {0}")]
    InvalidInt(#[from] ParseIntError),
    #[error("float error: {0}")]
    InvalidFloat(#[from] ParseFloatError),
    #[error("invalid utf-8 in {0}")]
    InvalidUtf8(&'static str),
    /// The number parsed but does not fit the requested width.
    #[error("invalid range for {0}")]
    OutOfRange(&'static str),
    #[error("timestamp error: no or bad input")]
    InvalidTimestamp,
    /// Raised by [`ObjectDecoder`](crate::ObjectDecoder) implementations for
    /// keys they do not recognise.
    #[error("unknown field {key:?} for {ty}")]
    UnknownField { ty: &'static str, key: BString },
    #[error("{0}")]
    Custom(String),
}

impl DecodeError {
    /// Builds a [`DecodeError::UnknownField`] for the type named `ty`.
    pub fn unknown_field(ty: &'static str, key: &[u8]) -> Self {
        Self::UnknownField {
            ty,
            key: BString::from(key),
        }
    }
}

/// Errors reported by the process-wide pools.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PoolError {
    /// [`configure_pools`](crate::configure_pools) ran after the pools were
    /// first used or configured.
    #[error("pools are already initialized")]
    AlreadyInitialized,
}
