//! Decoded value tree
//!
//! The deserializer produces values of this tagged sum. The tree owns its
//! data; name table strings are copied in at resolution time.

use std::fmt;

use ordered_float::OrderedFloat;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::containers::{ChainMap, Slot};

/// A decoded property value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value
    Null,
    /// Boolean
    Bool(bool),
    /// Any integer width, sign-extended
    Int(i64),
    /// 32 or 64 bit float
    Float(OrderedFloat<f64>),
    /// utf-8 string
    Str(String),
    /// Interned name, resolved through the name table
    Name(String),
    /// Enum class/value pair
    Enum(EnumValue),
    /// Reference to another object
    ObjectRef(ObjectRef),
    /// Soft object path with a sub-path index
    SoftObjectRef(SoftObjectRef),
    /// Localized text, either empty or source/id/default
    Text(Vec<String>),
    /// Homogeneous sequence
    Array(Vec<Value>),
    /// Ordered key/value mapping
    Map(ChainMap),
    /// Ordered property mapping with repeated-name accumulation
    Struct(ChainMap),
    /// `#rrggbbaa` color string
    Color(String),
    /// Date and time words
    DateTime(DateTime),
    /// Four float color channels
    LinearColor([OrderedFloat<f32>; 4]),
    /// Tick count
    Timespan(u64),
    /// Property path plus its owner object
    FieldPath(FieldPath),
}

/// Enum class and value names.
///
/// Either side can be missing when the stream carried an id outside the
/// known role set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumValue {
    /// Enum class name
    pub class: Option<String>,
    /// Enum value name
    pub value: Option<String>,
}

/// A reference to another object by signed name-table index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    /// Sign of the stored index
    pub negative: bool,
    /// Absolute index value
    pub index: u32,
    /// Best-effort resolved name, `None` when the lookup was out of range
    pub name: Option<String>,
}

impl ObjectRef {
    /// The stored index with its sign applied
    pub fn signed_index(&self) -> i64 {
        match self.negative {
            true => -(self.index as i64),
            false => self.index as i64,
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { "-" } else { "" };
        match &self.name {
            Some(name) => write!(f, "Object {sign}{:#X}: {name}", self.index),
            None => write!(
                f,
                "[ref:={:X}|{:X}]",
                self.signed_index(),
                self.index as u64 + 1
            ),
        }
    }
}

/// A soft object path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftObjectRef {
    /// Asset path name
    pub path: String,
    /// Sub-path index within the asset
    pub sub_path: u32,
}

/// Packed date and time words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    /// Date word
    pub date: u32,
    /// Time word
    pub time: u32,
}

/// A property path and the object that owns it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    /// Path segments, outermost first
    pub path: Vec<String>,
    /// Owner object
    pub owner: ObjectRef,
}

impl Value {
    /// Shorthand for an empty struct value
    pub fn empty_struct() -> Value {
        Value::Struct(ChainMap::new())
    }

    /// Get a field of a struct or map value, when it occurred exactly once
    pub fn field(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Struct(map) | Value::Map(map) => map.get_value(key),
            _ => None,
        }
    }

    /// The string content of a `Str` or `Name` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Name(s) => Some(s),
            _ => None,
        }
    }

    /// The elements of an `Array` value
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    /// The integer content of an `Int` value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Render this value as a map key
    pub fn as_key_string(&self) -> String {
        match self {
            Value::Str(s) | Value::Name(s) | Value::Color(s) => s.clone(),
            Value::Int(value) => value.to_string(),
            Value::Bool(value) => value.to_string(),
            Value::ObjectRef(reference) => reference.to_string(),
            Value::Enum(e) => e.value.clone().or_else(|| e.class.clone()).unwrap_or_default(),
            other => format!("{other:?}"),
        }
    }

    /// Whether this value is a mapping with no entries
    fn is_empty_mapping(&self) -> bool {
        match self {
            Value::Struct(map) | Value::Map(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Post-process for rendering: the sentinel string `"None"` becomes
    /// `Null` and entries holding an empty mapping are pruned, recursively.
    ///
    /// The operation is idempotent.
    pub fn cleaned(self) -> Value {
        match self {
            Value::Str(s) | Value::Name(s) if s == "None" => Value::Null,
            Value::Array(values) => {
                Value::Array(values.into_iter().map(Value::cleaned).collect())
            }
            Value::Struct(map) => Value::Struct(Self::cleaned_map(map)),
            Value::Map(map) => Value::Map(Self::cleaned_map(map)),
            other => other,
        }
    }

    fn cleaned_map(map: ChainMap) -> ChainMap {
        let mut cleaned = ChainMap::new();
        for (key, slot) in map {
            let slot = match slot {
                Slot::One(value) => Slot::One(value.cleaned()),
                Slot::Many(values) => {
                    Slot::Many(values.into_iter().map(Value::cleaned).collect())
                }
            };
            if let Slot::One(value) = &slot {
                if value.is_empty_mapping() {
                    continue;
                }
            }
            cleaned.insert_slot(key, slot);
        }
        cleaned
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(value) => serializer.serialize_bool(*value),
            Value::Int(value) => serializer.serialize_i64(*value),
            Value::Float(value) => serializer.serialize_f64(value.0),
            Value::Str(value) | Value::Name(value) | Value::Color(value) => {
                serializer.serialize_str(value)
            }
            Value::Enum(value) => {
                let len = value.class.is_some() as usize + value.value.is_some() as usize;
                let mut map = serializer.serialize_map(Some(len))?;
                if let Some(class) = &value.class {
                    map.serialize_entry("class", class)?;
                }
                if let Some(val) = &value.value {
                    map.serialize_entry("value", val)?;
                }
                map.end()
            }
            Value::ObjectRef(reference) => serializer.collect_str(reference),
            // the sub-path index stays available on the tree, the rendered
            // form is the bare asset path
            Value::SoftObjectRef(reference) => serializer.serialize_str(&reference.path),
            Value::Text(strings) => {
                let mut seq = serializer.serialize_seq(Some(strings.len()))?;
                for string in strings {
                    seq.serialize_element(string)?;
                }
                seq.end()
            }
            Value::Array(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Map(map) | Value::Struct(map) => map.serialize(serializer),
            Value::DateTime(value) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("date", &value.date)?;
                map.serialize_entry("time", &value.time)?;
                map.end()
            }
            Value::LinearColor(channels) => {
                let mut seq = serializer.serialize_seq(Some(4))?;
                for channel in channels {
                    seq.serialize_element(&channel.0)?;
                }
                seq.end()
            }
            Value::Timespan(ticks) => serializer.serialize_u64(*ticks),
            Value::FieldPath(field_path) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("path", &field_path.path)?;
                map.serialize_entry("owner", &field_path.owner.to_string())?;
                map.end()
            }
        }
    }
}
