//! Enum property

use crate::error::{Error, PropertyError};
use crate::properties::ExportReader;
use crate::value::{EnumValue, Value};

/// Id marking the class side of an enum record
const ENUM_CLASS_ID: u64 = 8;
/// Id marking the value side of an enum record
const ENUM_VALUE_ID: u64 = 0;

impl ExportReader<'_> {
    /// An enum record carries two id/fname pairs; the ids say which fname is
    /// the class and which is the value. Equal ids make the record
    /// undecodable. Array elements carry the value fname alone.
    pub(crate) fn read_enum_property(&mut self, from_array: bool) -> Result<Value, Error> {
        if from_array {
            return Ok(Value::Name(self.read_fname()?));
        }

        let class_id = self.cursor.read_u64()?;
        let class_name = self.read_fname()?;
        let value_id = self.cursor.read_u8()? as u64;
        let value_name = self.read_fname()?;

        if class_id == value_id {
            return Err(PropertyError::EnumAmbiguity(class_id).into());
        }

        let mut result = EnumValue::default();
        for (id, name) in [(class_id, class_name), (value_id, value_name)] {
            match id {
                ENUM_CLASS_ID => result.class = Some(name),
                ENUM_VALUE_ID => result.value = Some(name),
                // ids 16 and 31 have been observed but their role is unknown
                other => log::warn!("Unsupported enum key type {other}"),
            }
        }
        Ok(Value::Enum(result))
    }
}
