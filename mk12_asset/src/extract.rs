//! Export extraction driver
//!
//! Exports are deserialized in isolation: one failing export is recorded
//! with its offset and does not stop the rest of the batch.

use crate::asset::AssetFile;
use crate::containers::SharedResource;
use crate::error::Error;
use crate::name_map::NameMap;
use crate::properties::{Diagnostic, ExportReader};
use crate::value::Value;

/// A successfully decoded export
#[derive(Debug)]
pub struct ExportDocument {
    /// Export display name
    pub name: String,
    /// Decoded property tree
    pub document: Value,
    /// Oddities recorded while decoding
    pub diagnostics: Vec<Diagnostic>,
}

/// A failed export
#[derive(Debug)]
pub struct ExportFailure {
    /// Export display name
    pub name: String,
    /// Cursor offset at the point of failure
    pub offset: u64,
    /// What went wrong
    pub error: String,
}

/// The outcome of deserializing every export of one container
#[derive(Debug, Default)]
pub struct AssetDump {
    /// Decoded exports, in table order
    pub documents: Vec<ExportDocument>,
    /// Exports that failed to decode
    pub failures: Vec<ExportFailure>,
}

/// Deserialize one export blob against a shared name table
pub fn deserialize_export(
    name_map: SharedResource<NameMap>,
    data: &[u8],
) -> (Result<Value, Error>, Vec<Diagnostic>, u64) {
    let mut reader = ExportReader::new(data, name_map);
    let result = reader.read_export();
    let offset = reader.position();
    (result, reader.into_diagnostics(), offset)
}

/// Deserialize every export of a parsed container
pub fn extract_asset(asset: &AssetFile) -> AssetDump {
    let mut dump = AssetDump::default();
    for export in &asset.exports {
        log::debug!("Export {} has {} bytes", export.name, export.data.len());
        let (result, diagnostics, offset) =
            deserialize_export(asset.name_map.clone(), &export.data);
        match result {
            Ok(document) => dump.documents.push(ExportDocument {
                name: export.name.clone(),
                document,
                diagnostics,
            }),
            Err(error) => {
                log::warn!("Export {} failed at offset {offset}: {error}", export.name);
                dump.failures.push(ExportFailure {
                    name: export.name.clone(),
                    offset,
                    error: error.to_string(),
                });
            }
        }
    }
    dump
}
