//! String, name and localized text properties

use mk12_helpers::MkReadExt;

use crate::error::Error;
use crate::properties::ExportReader;
use crate::value::Value;

/// The flag word marking a text property with no localization payload
const TEXT_EMPTY_FLAG: u32 = 0xFF00_0000;

impl ExportReader<'_> {
    pub(crate) fn read_str_property(&mut self, from_array: bool) -> Result<Value, Error> {
        if !from_array {
            let _declared = self.cursor.read_u64()?;
            let _pad = self.cursor.read_u8()?;
        }
        Ok(Value::Str(self.cursor.read_fstring(None)?))
    }

    pub(crate) fn read_name_property(&mut self, from_array: bool) -> Result<Value, Error> {
        if !from_array {
            let _declared = self.cursor.read_u64()?;
            let _pad = self.cursor.read_u8()?;
        }
        Ok(Value::Name(self.read_fname()?))
    }

    /// Localized text: either the empty form (flag `0xFF000000` plus one
    /// trailing word) or a source/id/default string triple.
    pub(crate) fn read_text_property(&mut self) -> Result<Value, Error> {
        let _declared = self.cursor.read_u64()?;
        let _unknown = self.cursor.read_u16()?;
        let flags = self.cursor.read_u32()?;

        if flags == TEXT_EMPTY_FLAG {
            let _trailer = self.cursor.read_u32()?;
            return Ok(Value::Text(Vec::new()));
        }

        let mut strings = Vec::with_capacity(3);
        for _ in 0..3 {
            strings.push(self.cursor.read_fstring(None)?);
        }
        Ok(Value::Text(strings))
    }
}
