//! Extension for `ByteCursor` to read MK12 string and bool encodings.

use crate::cursor::ByteCursor;
use crate::error::StringError;

/// Extension for `ByteCursor` to read MK12 string and bool encodings.
pub trait MkReadExt {
    /// Read a length-prefixed string.
    ///
    /// When `size` is `None` a signed 32-bit prefix `L` is read first.
    /// `L >= 0` means `L` bytes of utf-8, `L < 0` means `2 * |L|` bytes of
    /// utf-16le. Either way the result is truncated at the first NUL.
    fn read_fstring(&mut self, size: Option<i32>) -> Result<String, StringError>;
    /// Read a u8 as bool
    fn read_bool(&mut self) -> Result<bool, StringError>;
}

impl MkReadExt for ByteCursor<'_> {
    fn read_fstring(&mut self, size: Option<i32>) -> Result<String, StringError> {
        let len = match size {
            Some(len) => len,
            None => self.read_i32()?,
        };

        let string = if len < 0 {
            let buf = self.read(len.unsigned_abs() as usize * 2)?;
            String::from_utf16(
                &buf.chunks(2)
                    .map(|e| u16::from_le_bytes([e[0], e[1]]))
                    .collect::<Vec<_>>(),
            )?
        } else {
            String::from_utf8(self.read(len as usize)?.to_vec())?
        };

        Ok(match string.find('\0') {
            Some(terminator) => string[..terminator].to_string(),
            None => string,
        })
    }

    fn read_bool(&mut self) -> Result<bool, StringError> {
        Ok(self.read_u8()? == 1)
    }
}
