//! Error types

use std::string::{FromUtf16Error, FromUtf8Error};

use thiserror::Error;

/// Gets thrown when a `ByteCursor` operation goes out of bounds.
#[derive(Error, Debug)]
pub enum CursorError {
    /// Seek target is outside of the buffer
    #[error("Seek to {0} is out of bounds for buffer of {1} bytes")]
    SeekOutOfBounds(i64, usize),
    /// Read would go past the end of the buffer
    #[error("Short read of {requested} bytes at offset {offset}, buffer has {size} bytes")]
    ShortRead {
        /// Requested byte count
        requested: usize,
        /// Cursor offset at the time of the read
        offset: usize,
        /// Total buffer size
        size: usize,
    },
    /// Integer width is not one of 1/2/4/8
    #[error("Unsupported integer width {0}")]
    UnsupportedWidth(usize),
}

/// Gets thrown when there is an error reading a length-prefixed string.
#[derive(Error, Debug)]
pub enum StringError {
    /// A `CursorError` occured
    #[error(transparent)]
    Cursor(#[from] CursorError),
    /// String is not in the expected UTF-8 format
    #[error("Utf8 Error {0}")]
    Utf8(#[from] FromUtf8Error),
    /// String is not in the expected UTF-16 format
    #[error("Utf16 Error {0}")]
    Utf16(#[from] FromUtf16Error),
}
