//! Bool, byte, integer and float properties

use ordered_float::OrderedFloat;

use crate::error::Error;
use crate::properties::ExportReader;
use crate::value::Value;

impl ExportReader<'_> {
    /// `size`(8), `value`(1), padding(1). Array elements carry the value
    /// byte alone.
    pub(crate) fn read_bool_property(&mut self, from_array: bool) -> Result<Value, Error> {
        if from_array {
            return Ok(Value::Bool(self.cursor.read_u8()? == 1));
        }
        let _declared = self.cursor.read_u64()?;
        let value = self.cursor.read_u8()?;
        let _pad = self.cursor.read_u8()?;
        Ok(Value::Bool(value == 1))
    }

    /// A byte property is either a raw integer (sub-type `"None"`) or an
    /// enum-like fname value.
    pub(crate) fn read_byte_property(&mut self, from_array: bool) -> Result<Value, Error> {
        if from_array {
            let sub_type = self.read_fname()?;
            return match sub_type.as_str() {
                "None" => Ok(Value::Int(self.cursor.read_u8()? as i64)),
                _ => Ok(Value::Name(self.read_fname()?)),
            };
        }

        let declared = self.cursor.read_u64()?;
        let sub_type = self.read_fname()?;
        let _pad = self.cursor.read_u8()?;
        match sub_type.as_str() {
            "None" => Ok(Value::Int(self.cursor.read_uint(declared as usize)? as i64)),
            _ => Ok(Value::Name(self.read_fname()?)),
        }
    }

    /// Integer width and signedness come from the property type tag. A
    /// declared size disagreeing with the tag's width only warns.
    pub(crate) fn read_int_property(
        &mut self,
        width: usize,
        signed: bool,
        from_array: bool,
    ) -> Result<Value, Error> {
        if !from_array {
            let declared = self.cursor.read_u64()?;
            let _pad = self.cursor.read_u8()?;
            if declared != width as u64 {
                log::warn!(
                    "Integer property declares {declared} bytes but its type reads {width}"
                );
            }
        }
        let value = match signed {
            true => self.cursor.read_int(width)?,
            false => self.cursor.read_uint(width)? as i64,
        };
        Ok(Value::Int(value))
    }

    /// The declared size selects between f32 and f64. Array elements are
    /// read with the width implied by the type tag.
    pub(crate) fn read_float_property(
        &mut self,
        tag_width: usize,
        from_array: bool,
    ) -> Result<Value, Error> {
        let width = match from_array {
            true => tag_width as u64,
            false => {
                let declared = self.cursor.read_u64()?;
                let _pad = self.cursor.read_u8()?;
                declared
            }
        };
        let value = match width {
            4 => self.cursor.read_f32()? as f64,
            8 => self.cursor.read_f64()?,
            other => {
                return Err(Error::invalid_file(format!(
                    "Invalid float property size {other}"
                )))
            }
        };
        Ok(Value::Float(OrderedFloat(value)))
    }
}
