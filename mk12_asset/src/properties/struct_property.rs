//! Struct property
//!
//! A handful of struct types have fixed binary layouts; everything else is
//! a generic property body terminated by the `"None"` fname.

use std::collections::HashSet;

use lazy_static::lazy_static;
use ordered_float::OrderedFloat;

use crate::containers::ChainMap;
use crate::error::{Error, PropertyError};
use crate::properties::ExportReader;
use crate::value::{DateTime, Value};

lazy_static! {
    static ref KNOWN_STRUCT_TYPES: HashSet<&'static str> = HashSet::from([
        "ColorPaletteSwatch",
        "MKInventoryItemPrice",
        "MKInventoryDataTableRowHandle",
        "MKInventoryItemDefinitionGroupWithAsset",
        "MKLootTable",
        "MKLootTableDropItem",
        "MKLootDropItemPicker",
        "MKLootDropItemPrerequisitePicker",
        "MK12InventoryLootItem",
        "CharacterLibraryAssetEntry",
        "DateTime",
        "Color",
        "LinearColor",
        "Timespan",
    ]);
}

/// Split a packed color word into `#rrggbbaa` form.
///
/// The alpha channel lives in the top byte, red/green/blue follow high to
/// low through the remaining 24 bits.
pub fn color_string(raw: u32) -> String {
    format!("#{:06x}{:02x}", raw & 0x00FF_FFFF, raw >> 24)
}

impl ExportReader<'_> {
    /// Read a struct framing header plus `loop_count` copies of its body.
    ///
    /// Arrays of structs share one header, so the caller passes the element
    /// count; plain struct properties use `loop_count = 1` and get the bare
    /// value back. The declared size covers all bodies together and must
    /// match exactly.
    pub(crate) fn read_struct_property(&mut self, loop_count: usize) -> Result<Value, Error> {
        let declared = self.cursor.read_u32()? as u64;
        let duplication_index = self.cursor.read_u32()?;
        let struct_type = self.read_fname()?;
        let _pad = self.cursor.read_u8()?;
        let _unknown1 = self.cursor.read_u64()?;
        let _unknown2 = self.cursor.read_u64()?;
        let start = self.cursor.position();
        log::debug!("StructProperty {struct_type} (#{duplication_index}), {declared} bytes");

        if !KNOWN_STRUCT_TYPES.contains(struct_type.as_str()) {
            log::warn!(
                "Struct type {struct_type} is not officially supported, reading a generic property body"
            );
        }

        let mut items = Vec::with_capacity(loop_count);
        for _ in 0..loop_count {
            items.push(self.read_struct_as_type(&struct_type)?);
        }

        let consumed = self.cursor.position() - start;
        if consumed != declared {
            return Err(PropertyError::size_mismatch(&struct_type, declared, consumed).into());
        }

        Ok(match loop_count {
            1 => items.pop().unwrap_or_else(Value::empty_struct),
            _ => Value::Array(items),
        })
    }

    fn read_struct_as_type(&mut self, struct_type: &str) -> Result<Value, Error> {
        match struct_type {
            "DateTime" => Ok(Value::DateTime(DateTime {
                date: self.cursor.read_u32()?,
                time: self.cursor.read_u32()?,
            })),
            "Color" => Ok(Value::Color(color_string(self.cursor.read_u32()?))),
            "LinearColor" => {
                let mut channels = [OrderedFloat(0f32); 4];
                for channel in &mut channels {
                    *channel = OrderedFloat(self.cursor.read_f32()?);
                }
                Ok(Value::LinearColor(channels))
            }
            "Timespan" => Ok(Value::Timespan(self.cursor.read_u64()?)),
            _ => Ok(Value::Struct(self.read_struct_body(false)?)),
        }
    }

    /// Read nested properties until the `"None"` terminator shows up in name
    /// position. With `with_supers`, every property is preceded by an owner
    /// frame of one fname plus an object reference.
    pub(crate) fn read_struct_body(&mut self, with_supers: bool) -> Result<ChainMap, Error> {
        let mut body = ChainMap::new();
        while !self.peek_name_or_rewind()? {
            if with_supers {
                let _super_name = self.read_fname()?;
                let _owner = self.read_object_ref()?;
            }
            let Some((name, value)) = self.read_property_once()? else {
                break;
            };
            body.insert_chained(name, value);
        }
        Ok(body)
    }
}
