//! Map property

use crate::containers::ChainMap;
use crate::error::{Error, PropertyError};
use crate::properties::{ExportReader, PropertyType};
use crate::value::Value;

impl ExportReader<'_> {
    /// A map declares key and value types once; entries are read in array
    /// mode. Struct-valued entries carry their own `"None"` terminator, so
    /// after every entry a name is peeked and swallowed if it is the
    /// terminator.
    pub(crate) fn read_map_property(&mut self) -> Result<Value, Error> {
        let declared = self.cursor.read_u64()?;
        let key_tag = self.read_fname()?;
        let value_tag = self.read_fname()?;
        let _pad = self.cursor.read_u8()?;
        let start = self.cursor.position();
        let _unknown = self.cursor.read_u32()?;
        let count = self.cursor.read_u32()?;

        let Some(key_type) = PropertyType::from_tag(&key_tag) else {
            return Err(PropertyError::unknown_property(key_tag).into());
        };
        let Some(value_type) = PropertyType::from_tag(&value_tag) else {
            return Err(PropertyError::unknown_property(value_tag).into());
        };

        let mut map = ChainMap::new();
        for _ in 0..count {
            let key = self.read_value(key_type, "", true)?;
            let value = self.read_value(value_type, "", true)?;
            map.insert(key.as_key_string(), value);
            self.peek_name_or_rewind()?;
        }

        let consumed = self.cursor.position() - start;
        if consumed != declared {
            return Err(PropertyError::size_mismatch("Map", declared, consumed).into());
        }
        Ok(Value::Map(map))
    }
}
