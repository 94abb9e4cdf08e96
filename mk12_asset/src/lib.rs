#![deny(missing_docs)]

//! Mortal Kombat 1 asset container deserialization.
//!
//! An asset container carries a name table, import/export tables and one or
//! more exports, each of which is a self-describing tagged-property blob.
//! This crate parses the container, walks the property grammar of every
//! export and produces a JSON-ready [`Value`](value::Value) tree.

pub mod asset;
pub use asset::AssetFile;
pub mod catalog;
pub mod containers;
pub mod error;
pub use error::Error;
pub mod extract;
pub use extract::AssetDump;
pub mod name_map;
pub use name_map::NameMap;
pub mod properties;
pub use properties::ExportReader;
pub mod value;
pub use value::Value;
