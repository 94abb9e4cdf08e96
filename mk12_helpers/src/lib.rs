#![deny(missing_docs)]

//! Small building blocks for reading MK12 binary data formats.

pub mod cursor;
pub use cursor::ByteCursor;
pub mod error;
pub mod read_ext;
pub use read_ext::MkReadExt;
