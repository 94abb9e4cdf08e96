//! Tagged-property deserialization
//!
//! Every export is a sequence of `(name fname, type fname, payload)`
//! records. Payload layouts are type specific and several of them nest back
//! into this grammar, so the reader is a cursor machine: it looks ahead,
//! rewinds, and checks every declared byte size against what it consumed.

use std::io::SeekFrom;

use mk12_helpers::ByteCursor;

use crate::containers::{ChainMap, SharedResource};
use crate::error::{Error, PropertyError};
use crate::name_map::NameMap;
use crate::value::{ObjectRef, Value};

pub mod array_property;
pub mod enum_property;
pub mod int_property;
pub mod map_property;
pub mod object_property;
pub mod str_property;
pub mod struct_property;

/// The closed set of property type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    /// `BoolProperty`
    Bool,
    /// `ByteProperty`
    Byte,
    /// `Int8Property`
    Int8,
    /// `Int16Property`
    Int16,
    /// `IntProperty`, 32 bits
    Int,
    /// `Int64Property`
    Int64,
    /// `UInt16Property`
    UInt16,
    /// `UInt32Property`
    UInt32,
    /// `UInt64Property`
    UInt64,
    /// `FloatProperty`
    Float,
    /// `DoubleProperty`
    Double,
    /// `EnumProperty`
    Enum,
    /// `StrProperty`
    Str,
    /// `NameProperty`
    Name,
    /// `TextProperty`
    Text,
    /// `SoftObjectProperty`
    SoftObject,
    /// `ObjectProperty`
    Object,
    /// `ArrayProperty`
    Array,
    /// `MapProperty`
    Map,
    /// `StructProperty`
    Struct,
    /// `FieldPathProperty`
    FieldPath,
}

impl PropertyType {
    /// Map a property type tag to its `PropertyType`, `None` for tags
    /// outside the known set
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "BoolProperty" => Some(PropertyType::Bool),
            "ByteProperty" => Some(PropertyType::Byte),
            "Int8Property" => Some(PropertyType::Int8),
            "Int16Property" => Some(PropertyType::Int16),
            "IntProperty" | "Int32Property" => Some(PropertyType::Int),
            "Int64Property" => Some(PropertyType::Int64),
            "UInt16Property" => Some(PropertyType::UInt16),
            "UInt32Property" => Some(PropertyType::UInt32),
            "UInt64Property" => Some(PropertyType::UInt64),
            "FloatProperty" => Some(PropertyType::Float),
            "DoubleProperty" => Some(PropertyType::Double),
            "EnumProperty" => Some(PropertyType::Enum),
            "StrProperty" => Some(PropertyType::Str),
            "NameProperty" => Some(PropertyType::Name),
            "TextProperty" => Some(PropertyType::Text),
            "SoftObjectProperty" => Some(PropertyType::SoftObject),
            "ObjectProperty" => Some(PropertyType::Object),
            "ArrayProperty" => Some(PropertyType::Array),
            "MapProperty" => Some(PropertyType::Map),
            "StructProperty" => Some(PropertyType::Struct),
            "FieldPathProperty" => Some(PropertyType::FieldPath),
            _ => None,
        }
    }
}

/// A recoverable oddity recorded while deserializing an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Cursor offset where the oddity was noticed
    pub offset: u64,
    /// Human readable description
    pub message: String,
}

/// Deserializes the tagged-property blob of a single export
pub struct ExportReader<'data> {
    cursor: ByteCursor<'data>,
    name_map: SharedResource<NameMap>,
    diagnostics: Vec<Diagnostic>,
}

impl<'data> ExportReader<'data> {
    /// Create a new `ExportReader` over an export blob
    pub fn new(data: &'data [u8], name_map: SharedResource<NameMap>) -> Self {
        ExportReader {
            cursor: ByteCursor::new(data),
            name_map,
            diagnostics: Vec::new(),
        }
    }

    /// Current cursor offset
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Oddities recorded so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the reader, returning the recorded oddities
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub(crate) fn diagnose(&mut self, offset: u64, message: String) {
        log::warn!("{message} (offset {offset})");
        self.diagnostics.push(Diagnostic { offset, message });
    }

    /// Read the whole export as one property mapping.
    ///
    /// Repeated property names accumulate into sequences. On success the
    /// cursor sits exactly at the end of the buffer.
    pub fn read_export(&mut self) -> Result<Value, Error> {
        let mut root = ChainMap::new();
        while !self.cursor.eof() {
            if let Some((name, value)) = self.read_property_once()? {
                root.insert_chained(name, value);
            }
        }
        Ok(Value::Struct(root))
    }

    /// Read one `(name, type, payload)` property record.
    ///
    /// Returns `None` when the name position holds the `"None"` terminator
    /// with its expected zero trailer. A non-zero trailer means this was no
    /// terminator at all: the cursor is rewound to the `"None"` name and the
    /// export fails at that offset.
    pub fn read_property_once(&mut self) -> Result<Option<(String, Value)>, Error> {
        let name_offset = self.cursor.position();
        let property_name = self.read_fname()?;
        if property_name == "None" {
            // a terminator at the very end of the buffer has no trailer word
            if self.cursor.eof() {
                return Ok(None);
            }
            let trailer = self.cursor.read_u32()?;
            if trailer != 0 {
                log::warn!(
                    "\"None\" at offset {name_offset} has non-zero trailer {trailer:#x}, not a terminator"
                );
                self.cursor.seek(SeekFrom::Current(-12))?;
                return Err(PropertyError::NoneTrailer {
                    trailer,
                    offset: self.cursor.position(),
                }
                .into());
            }
            return Ok(None);
        }

        let property_type = self.read_fname()?;
        let Some(ty) = PropertyType::from_tag(&property_type) else {
            return Err(PropertyError::unknown_property(property_type).into());
        };
        log::debug!("{property_name}: {property_type} at offset {name_offset}");
        let value = self.read_value(ty, &property_name, false)?;
        Ok(Some((property_name, value)))
    }

    pub(crate) fn read_value(
        &mut self,
        ty: PropertyType,
        element_name: &str,
        from_array: bool,
    ) -> Result<Value, Error> {
        match ty {
            PropertyType::Bool => self.read_bool_property(from_array),
            PropertyType::Byte => self.read_byte_property(from_array),
            PropertyType::Int8 => self.read_int_property(1, true, from_array),
            PropertyType::Int16 => self.read_int_property(2, true, from_array),
            PropertyType::Int => self.read_int_property(4, true, from_array),
            PropertyType::Int64 => self.read_int_property(8, true, from_array),
            PropertyType::UInt16 => self.read_int_property(2, false, from_array),
            PropertyType::UInt32 => self.read_int_property(4, false, from_array),
            PropertyType::UInt64 => self.read_int_property(8, false, from_array),
            PropertyType::Float => self.read_float_property(4, from_array),
            PropertyType::Double => self.read_float_property(8, from_array),
            PropertyType::Enum => self.read_enum_property(from_array),
            PropertyType::Str => self.read_str_property(from_array),
            PropertyType::Name => self.read_name_property(from_array),
            PropertyType::Text => self.read_text_property(),
            PropertyType::SoftObject => self.read_soft_object_property(from_array),
            PropertyType::Object => self.read_object_property(element_name, from_array),
            PropertyType::Array => self.read_array_property(),
            PropertyType::Map => self.read_map_property(),
            PropertyType::Struct => self.read_struct_property(1),
            PropertyType::FieldPath => self.read_field_path_property(from_array),
        }
    }

    /// Read an fname pair and resolve it through the name table
    pub fn read_fname(&mut self) -> Result<String, Error> {
        let index = self.cursor.read_u32()?;
        let suffix = self.cursor.read_u32()?;
        Ok(self.name_map.get_ref().resolve(index, suffix))
    }

    /// Read a signed single-word fname. Negative indices resolve with a
    /// leading minus flag.
    pub fn read_fname_signed(&mut self) -> Result<String, Error> {
        let index = self.cursor.read_i32()?;
        let names = self.name_map.get_ref();
        Ok(match (index < 0, names.get(index.unsigned_abs() as usize)) {
            (false, Some(name)) => name.to_string(),
            (true, Some(name)) => format!("-{name}"),
            (_, None) => {
                log::warn!(
                    "Signed name index {index} is out of range for a table of {} names",
                    names.len()
                );
                NameMap::placeholder(index.unsigned_abs() as usize)
            }
        })
    }

    /// Read an object reference. The referenced name lives one slot past the
    /// absolute index; resolution is best-effort.
    pub fn read_object_ref(&mut self) -> Result<ObjectRef, Error> {
        let raw = self.cursor.read_i32()?;
        let index = raw.unsigned_abs();
        let name = self
            .name_map
            .get_ref()
            .get(index as usize + 1)
            .map(str::to_string);
        if name.is_none() {
            log::warn!("Object reference {raw:#x} points outside the name table");
        }
        Ok(ObjectRef {
            negative: raw < 0,
            index,
            name,
        })
    }

    /// Look ahead for the `"None"` terminator in name position.
    ///
    /// Returns `true` when the terminator was found (and consumed). Any
    /// other name rewinds the 8 bytes so the caller reads it again as a
    /// property name. With fewer than 8 bytes left nothing is read at all.
    pub(crate) fn peek_name_or_rewind(&mut self) -> Result<bool, Error> {
        if self.cursor.remaining() < 8 {
            return Ok(false);
        }
        let name = self.read_fname()?;
        if name == "None" {
            Ok(true)
        } else {
            self.cursor.seek(SeekFrom::Current(-8))?;
            Ok(false)
        }
    }
}
