//! All errors thrown by mk12_asset

use std::io;

use mk12_helpers::error::{CursorError, StringError};
use thiserror::Error;

/// Thrown when a tagged property failed to deserialize
#[derive(Error, Debug)]
pub enum PropertyError {
    /// Property type is not part of the known set
    #[error("Unknown property type {0}")]
    UnknownProperty(Box<str>),
    /// Declared byte size and consumed byte count disagree
    #[error("{context} size mismatch, declared: {declared}, consumed: {consumed}")]
    SizeMismatch {
        /// What was being read when the sizes diverged
        context: Box<str>,
        /// Size declared up front in the stream
        declared: u64,
        /// Bytes actually consumed by the body
        consumed: u64,
    },
    /// Enum class id and value id are equal, roles cannot be assigned
    #[error("Enum class id and value id are both {0}")]
    EnumAmbiguity(u64),
    /// A top level "None" name was followed by a non-zero trailer
    #[error("\"None\" with non-zero trailer {trailer:#x} at offset {offset}")]
    NoneTrailer {
        /// The 32-bit word that should have been zero
        trailer: u32,
        /// Offset of the "None" name after the rewind
        offset: u64,
    },
}

impl PropertyError {
    /// Create a `PropertyError` for an unrecognized property type
    pub fn unknown_property(tag: String) -> Self {
        PropertyError::UnknownProperty(tag.into_boxed_str())
    }

    /// Create a `PropertyError` for a declared/consumed size disagreement
    pub fn size_mismatch(context: &str, declared: u64, consumed: u64) -> Self {
        PropertyError::SizeMismatch {
            context: context.to_string().into_boxed_str(),
            declared,
            consumed,
        }
    }
}

/// Error type
#[derive(Error, Debug)]
pub enum Error {
    /// A `CursorError` occured
    #[error(transparent)]
    Cursor(#[from] CursorError),
    /// A `StringError` occured
    #[error(transparent)]
    String(#[from] StringError),
    /// A `PropertyError` occured
    #[error(transparent)]
    Property(#[from] PropertyError),
    /// An `std::io::Error` occured
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The container file is invalid
    #[error("{0}")]
    InvalidFile(Box<str>),
    /// A name table file could not be parsed
    #[error("{0}")]
    InvalidNameTable(Box<str>),
}

impl Error {
    /// Create an `Error` when the container file was invalid
    pub fn invalid_file(msg: String) -> Self {
        Error::InvalidFile(msg.into_boxed_str())
    }

    /// Create an `Error` when a name table file could not be parsed
    pub fn invalid_name_table(msg: String) -> Self {
        Error::InvalidNameTable(msg.into_boxed_str())
    }
}
