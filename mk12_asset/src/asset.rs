//! Asset container parsing
//!
//! A container file carries a fixed header, the name table, import/export
//! tables and the raw export payloads. This module pulls those apart; the
//! property grammar inside each export payload is handled by
//! [`ExportReader`](crate::properties::ExportReader).

use std::io::SeekFrom;

use mk12_helpers::ByteCursor;

use crate::containers::SharedResource;
use crate::error::Error;
use crate::name_map::NameMap;

/// Fixed container header
#[derive(Debug, Clone)]
pub struct AssetHeader {
    /// fname of the container's own file path
    pub file_path_fname: u64,
    /// Number of engine files
    pub engine_files_count: u64,
    /// Container flags
    pub flags: u32,
    /// Offset of the payload data inside the outer archive
    pub data_location_in_ucas: u32,
    /// Name table offset
    pub name_table_offset: u32,
    /// Name table byte size
    pub name_table_size: u32,
    /// Import data offset
    pub import_data_offset: u32,
    /// Import data byte size
    pub import_data_size: u32,
    /// Offset of the first gap table
    pub table0_location: u32,
    /// Export table offset
    pub exports_location: u32,
    /// Offset of the second gap table
    pub table2_location: u32,
    /// Import table offset
    pub import_table_offset: u32,
    /// Import table byte size
    pub import_table_size: u64,
}

impl AssetHeader {
    fn read(cursor: &mut ByteCursor) -> Result<Self, Error> {
        Ok(AssetHeader {
            file_path_fname: cursor.read_u64()?,
            engine_files_count: cursor.read_u64()?,
            flags: cursor.read_u32()?,
            data_location_in_ucas: cursor.read_u32()?,
            name_table_offset: cursor.read_u32()?,
            name_table_size: cursor.read_u32()?,
            import_data_offset: cursor.read_u32()?,
            import_data_size: cursor.read_u32()?,
            table0_location: cursor.read_u32()?,
            exports_location: cursor.read_u32()?,
            table2_location: cursor.read_u32()?,
            import_table_offset: cursor.read_u32()?,
            import_table_size: cursor.read_u64()?,
        })
    }
}

/// One export table record
#[derive(Debug, Clone)]
pub struct ExportTableEntry {
    /// Payload offset
    pub object_location: u64,
    /// Payload byte size
    pub object_size: u64,
    /// Name table index of the export's name
    pub object_name: u64,
    /// Unknown word
    pub unknown1: u64,
    /// Unknown word
    pub unknown2: u64,
    /// Unknown word
    pub unknown3: u64,
    /// Class guid
    pub class_signature: [u8; 16],
    /// Class id
    pub object_class: u64,
}

/// One import table record
#[derive(Debug, Clone)]
pub struct ImportTableEntry {
    /// Hash of the imported object
    pub unknown_hash: u64,
    /// Name table index of the imported object
    pub name_index: u64,
    /// Unknown word
    pub unknown: u32,
}

/// A raw export payload with its display name
#[derive(Debug, Clone)]
pub struct Export {
    /// Display name, `{index}_{name}_{class:x}`
    pub name: String,
    /// Class id from the export table
    pub class: u64,
    /// Raw tagged-property bytes
    pub data: Vec<u8>,
}

/// A parsed asset container
#[derive(Debug)]
pub struct AssetFile {
    /// Container header
    pub header: AssetHeader,
    /// Interned name table
    pub name_map: SharedResource<NameMap>,
    /// Raw import data blob
    pub import_data: Vec<u8>,
    /// Export table records
    pub export_table: Vec<ExportTableEntry>,
    /// Import table records
    pub import_table: Vec<ImportTableEntry>,
    /// Export payloads, in table order
    pub exports: Vec<Export>,
}

impl AssetFile {
    /// Parse a container from its raw bytes
    pub fn parse(data: &[u8]) -> Result<AssetFile, Error> {
        let mut cursor = ByteCursor::new(data);
        let header = AssetHeader::read(&mut cursor)?;

        cursor.seek(SeekFrom::Start(header.name_table_offset as u64))?;
        let name_map = Self::read_name_table(&mut cursor, header.name_table_size as u64)?;

        cursor.seek(SeekFrom::Start(header.import_data_offset as u64))?;
        let import_data = cursor.read(header.import_data_size as usize)?.to_vec();

        let export_table_size = Self::region_size(
            "export table",
            header.exports_location,
            header.table2_location,
        )?;
        cursor.seek(SeekFrom::Start(header.exports_location as u64))?;
        let export_table = Self::read_export_table(&mut cursor, export_table_size)?;

        cursor.seek(SeekFrom::Start(header.import_table_offset as u64))?;
        let import_table = Self::read_import_table(&mut cursor, &header)?;

        let names = name_map.get_ref();
        let mut exports = Vec::with_capacity(export_table.len());
        for (index, entry) in export_table.iter().enumerate() {
            let name = names
                .get(entry.object_name as usize)
                .map(str::to_string)
                .unwrap_or_else(|| NameMap::placeholder(entry.object_name as usize));
            exports.push(Export {
                name: format!("{index}_{name}_{:x}", entry.object_class),
                class: entry.object_class,
                data: cursor.read(entry.object_size as usize)?.to_vec(),
            });
        }
        drop(names);

        Ok(AssetFile {
            header,
            name_map,
            import_data,
            export_table,
            import_table,
            exports,
        })
    }

    /// Names are length-prefixed with a big-endian u16, packed back to back
    fn read_name_table(
        cursor: &mut ByteCursor,
        table_size: u64,
    ) -> Result<SharedResource<NameMap>, Error> {
        let start = cursor.position();
        let mut names = Vec::new();
        while cursor.position() - start < table_size {
            let name_size = cursor.read_u16_be()?;
            let name = String::from_utf8(cursor.read(name_size as usize)?.to_vec())
                .map_err(|_| Error::invalid_file("Name table entry is not utf-8".to_string()))?;
            names.push(name);
        }
        Ok(NameMap::from_name_batch(&names))
    }

    fn read_export_table(
        cursor: &mut ByteCursor,
        table_size: u64,
    ) -> Result<Vec<ExportTableEntry>, Error> {
        let start = cursor.position();
        let mut entries = Vec::new();
        while cursor.position() - start < table_size {
            let mut entry = ExportTableEntry {
                object_location: cursor.read_u64()?,
                object_size: cursor.read_u64()?,
                object_name: cursor.read_u64()?,
                unknown1: cursor.read_u64()?,
                unknown2: cursor.read_u64()?,
                unknown3: cursor.read_u64()?,
                class_signature: [0; 16],
                object_class: 0,
            };
            entry.class_signature.copy_from_slice(cursor.read(16)?);
            entry.object_class = cursor.read_u64()?;
            entries.push(entry);
        }
        Ok(entries)
    }

    fn read_import_table(
        cursor: &mut ByteCursor,
        header: &AssetHeader,
    ) -> Result<Vec<ImportTableEntry>, Error> {
        let count = cursor.read_u32()?;
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            entries.push(ImportTableEntry {
                unknown_hash: cursor.read_u64()?,
                name_index: cursor.read_u64()?,
                unknown: cursor.read_u32()?,
            });
        }
        let consumed = cursor.position() - header.import_table_offset as u64;
        if consumed != header.import_table_size {
            return Err(Error::invalid_file(format!(
                "Import table declares {} bytes but {consumed} were read",
                header.import_table_size
            )));
        }
        Ok(entries)
    }

    fn region_size(context: &str, start: u32, end: u32) -> Result<u64, Error> {
        (end as u64).checked_sub(start as u64).ok_or_else(|| {
            Error::invalid_file(format!(
                "Header places the {context} end {end:#x} before its start {start:#x}"
            ))
        })
    }
}
