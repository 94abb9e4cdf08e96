use serde_json::json;

use mk12_asset::extract;
use mk12_asset::AssetFile;

use shared::StreamBuilder;

/// A minimal two-export container: a bool-carrying export and one with an
/// unknown property type.
///
/// Layout: 64 byte header, name table, export table, import table, export
/// payloads back to back.
fn container_bytes() -> Vec<u8> {
    let names: &[&str] = &["Foo", "BoolProperty", "None", "FrobProperty"];
    let name_table_size: usize = names.iter().map(|n| 2 + n.len()).sum();

    let name_table_offset = 64u32;
    let exports_location = name_table_offset + name_table_size as u32; // 103
    let table2_location = exports_location + 2 * 72; // 247
    let import_table_offset = table2_location;
    let import_table_size = 4 + 20u64; // count word plus one entry
    let payload_offset = import_table_offset as u64 + import_table_size; // 271

    let good_export = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(0)
        .u8(1)
        .u8(0)
        .fname(2, 0)
        .finish();
    let bad_export = StreamBuilder::new().fname(0, 0).fname(3, 0).finish();

    let mut builder = StreamBuilder::new()
        // header
        .u64(0) // file path fname
        .u64(0) // engine files count
        .u32(0) // flags
        .u32(0) // ucas data location
        .u32(name_table_offset)
        .u32(name_table_size as u32)
        .u32(exports_location) // import data offset (empty region)
        .u32(0) // import data size
        .u32(exports_location) // table 0 location
        .u32(exports_location)
        .u32(table2_location)
        .u32(import_table_offset)
        .u64(import_table_size);

    // name table, big-endian length prefixes
    for name in names {
        builder = builder.u16_be(name.len() as u16).bytes(name.as_bytes());
    }

    // export table
    builder = builder
        .u64(payload_offset)
        .u64(good_export.len() as u64)
        .u64(0) // name: Foo
        .u64(0)
        .u64(0)
        .u64(0)
        .bytes(&[0u8; 16])
        .u64(0x2A);
    builder = builder
        .u64(payload_offset + good_export.len() as u64)
        .u64(bad_export.len() as u64)
        .u64(3) // name: FrobProperty
        .u64(0)
        .u64(0)
        .u64(0)
        .bytes(&[0u8; 16])
        .u64(0x1B);

    // import table
    builder = builder.u32(1).u64(0xDEAD_BEEF).u64(1).u32(0);

    builder.bytes(&good_export).bytes(&bad_export).finish()
}

#[test]
fn parse_container() {
    let data = container_bytes();
    let asset = AssetFile::parse(&data).expect("parse failed");

    assert_eq!(asset.header.name_table_offset, 64);
    assert_eq!(asset.name_map.get_ref().len(), 4);
    assert_eq!(asset.name_map.get_ref().get(1), Some("BoolProperty"));

    assert_eq!(asset.export_table.len(), 2);
    assert_eq!(asset.export_table[0].object_size, 34);
    assert_eq!(asset.export_table[1].object_class, 0x1B);

    assert_eq!(asset.import_table.len(), 1);
    assert_eq!(asset.import_table[0].name_index, 1);

    assert_eq!(asset.exports.len(), 2);
    assert_eq!(asset.exports[0].name, "0_Foo_2a");
    assert_eq!(asset.exports[1].name, "1_FrobProperty_1b");
    assert_eq!(asset.exports[0].data.len(), 34);
}

#[test]
fn extract_isolates_failing_exports() {
    let data = container_bytes();
    let asset = AssetFile::parse(&data).expect("parse failed");
    let dump = extract::extract_asset(&asset);

    assert_eq!(dump.documents.len(), 1);
    assert_eq!(dump.documents[0].name, "0_Foo_2a");
    assert_eq!(
        serde_json::to_value(&dump.documents[0].document).expect("serialize failed"),
        json!({ "Foo": true })
    );

    assert_eq!(dump.failures.len(), 1);
    assert_eq!(dump.failures[0].name, "1_FrobProperty_1b");
    assert_eq!(dump.failures[0].offset, 16);
    assert!(dump.failures[0].error.contains("FrobProperty"));
}

#[test]
fn import_table_size_disagreement_is_fatal() {
    let mut data = container_bytes();
    // corrupt the declared import table size
    let size_field = 56;
    data[size_field] = 12;
    assert!(AssetFile::parse(&data).is_err());
}
