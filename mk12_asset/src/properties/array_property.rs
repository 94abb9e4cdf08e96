//! Array property

use crate::error::{Error, PropertyError};
use crate::properties::{ExportReader, PropertyType};
use crate::value::Value;

impl ExportReader<'_> {
    /// An array declares its element type once; elements then drop their own
    /// framing headers. Struct elements share a single framing header whose
    /// body repeats `count` times.
    pub(crate) fn read_array_property(&mut self) -> Result<Value, Error> {
        let declared = self.cursor.read_u64()?;
        let element_tag = self.read_fname()?;
        let _pad = self.cursor.read_u8()?;
        let start = self.cursor.position();
        let count = self.cursor.read_u32()?;

        let Some(element_type) = PropertyType::from_tag(&element_tag) else {
            return Err(PropertyError::unknown_property(element_tag).into());
        };

        let value = match element_type {
            PropertyType::Struct => {
                // the repeated element's own name and type tag sit in front
                // of the shared struct framing header
                let element_name = self.read_fname()?;
                let inner_tag = self.read_fname()?;
                if inner_tag != element_tag {
                    log::warn!(
                        "Struct array {element_name} declares inner type {inner_tag}, expected {element_tag}"
                    );
                }
                match self.read_struct_property(count as usize)? {
                    array @ Value::Array(_) => array,
                    single => Value::Array(vec![single]),
                }
            }
            _ => {
                let mut values = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    values.push(self.read_value(element_type, "", true)?);
                }
                Value::Array(values)
            }
        };

        let consumed = self.cursor.position() - start;
        if consumed != declared {
            return Err(PropertyError::size_mismatch("Array", declared, consumed).into());
        }
        Ok(value)
    }
}
