use serde_json::json;

use mk12_asset::error::{Error, PropertyError};
use mk12_asset::{ExportReader, Value};

use shared::{name_map, StreamBuilder};

/// Deserialize one export stream and check the cursor consumed every byte
fn decode(names: &[&str], data: Vec<u8>) -> Result<Value, Error> {
    let mut reader = ExportReader::new(&data, name_map(names));
    let document = reader.read_export()?;
    assert_eq!(reader.position(), data.len() as u64);
    Ok(document)
}

fn decode_json(names: &[&str], data: Vec<u8>) -> serde_json::Value {
    let document = decode(names, data).expect("decode failed");
    serde_json::to_value(&document).expect("serialize failed")
}

#[test]
fn bool_in_struct() {
    let data = StreamBuilder::new()
        .fname(0, 0) // Foo
        .fname(1, 0) // BoolProperty
        .u64(0)
        .u8(1)
        .u8(0)
        .fname(2, 0) // None
        .finish();
    let parsed = decode_json(&["Foo", "BoolProperty", "None"], data);
    assert_eq!(parsed, json!({ "Foo": true }));
}

#[test]
fn int32_value() {
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(4)
        .u8(0)
        .i32(-7)
        .finish();
    let parsed = decode_json(&["N", "IntProperty", "None"], data);
    assert_eq!(parsed, json!({ "N": -7 }));
}

#[test]
fn int32_size_mismatch_warns_but_proceeds() {
    // the declared size says 8 but the tag reads 4 bytes
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(8)
        .u8(0)
        .i32(-7)
        .finish();
    let parsed = decode_json(&["N", "IntProperty", "None"], data);
    assert_eq!(parsed, json!({ "N": -7 }));
}

#[test]
fn uint64_value() {
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(8)
        .u8(0)
        .u64(1 << 40)
        .finish();
    let parsed = decode_json(&["N", "UInt64Property", "None"], data);
    assert_eq!(parsed, json!({ "N": 1u64 << 40 }));
}

#[test]
fn float_and_double() {
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(2, 0)
        .u64(4)
        .u8(0)
        .f32(2.5)
        .fname(1, 0)
        .fname(3, 0)
        .u64(8)
        .u8(0)
        .f64(1.5)
        .finish();
    let parsed = decode_json(&["F", "D", "FloatProperty", "DoubleProperty"], data);
    assert_eq!(parsed, json!({ "F": 2.5, "D": 1.5 }));
}

#[test]
fn color_struct() {
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u32(4)
        .u32(0)
        .fname(2, 0) // Color
        .u8(0)
        .u64(0)
        .u64(0)
        .u32(0xAABBCCDD)
        .finish();
    let parsed = decode_json(&["C", "StructProperty", "Color"], data);
    // alpha is the top byte, red/green/blue follow high to low
    assert_eq!(parsed, json!({ "C": "#bbccddaa" }));
}

#[test]
fn array_of_names() {
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(20) // count word plus two fnames
        .fname(2, 0) // NameProperty
        .u8(0)
        .u32(2)
        .fname(3, 0)
        .fname(4, 0)
        .finish();
    let parsed = decode_json(&["Arr", "ArrayProperty", "NameProperty", "A", "B"], data);
    assert_eq!(parsed, json!({ "Arr": ["A", "B"] }));
}

#[test]
fn array_size_mismatch_is_fatal() {
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(16)
        .fname(2, 0)
        .u8(0)
        .u32(2)
        .fname(3, 0)
        .fname(4, 0)
        .finish();
    let err = decode(&["Arr", "ArrayProperty", "NameProperty", "A", "B"], data)
        .expect_err("Expected err");
    assert!(matches!(
        err,
        Error::Property(PropertyError::SizeMismatch {
            declared: 16,
            consumed: 20,
            ..
        })
    ));
}

#[test]
fn map_name_to_int() {
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(32)
        .fname(2, 0) // key type NameProperty
        .fname(3, 0) // value type IntProperty
        .u8(0)
        .u32(0)
        .u32(2)
        .fname(4, 0)
        .i32(1)
        .fname(5, 0)
        .i32(2)
        .finish();
    let names = ["M", "MapProperty", "NameProperty", "IntProperty", "k1", "k2"];
    let document = decode(&names, data).expect("decode failed");
    // insertion order must survive the JSON rendering
    assert_eq!(
        serde_json::to_string(&document).expect("serialize failed"),
        r#"{"M":{"k1":1,"k2":2}}"#
    );
}

#[test]
fn repeated_key_accumulates() {
    let mut builder = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u32(95)
        .u32(0)
        .fname(2, 0) // Generic
        .u8(0)
        .u64(0)
        .u64(0);
    for value in [10, 10, 20] {
        builder = builder.fname(3, 0).fname(4, 0).u64(4).u8(0).i32(value);
    }
    let data = builder.fname(5, 0).finish();
    let names = ["S", "StructProperty", "Generic", "x", "IntProperty", "None"];
    let parsed = decode_json(&names, data);
    assert_eq!(parsed, json!({ "S": { "x": [10, 10, 20] } }));
}

#[test]
fn text_empty_form() {
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(17)
        .u16(0)
        .u32(0xFF00_0000)
        .u32(0)
        .finish();
    let parsed = decode_json(&["T", "TextProperty"], data);
    assert_eq!(parsed, json!({ "T": [] }));
}

#[test]
fn text_string_triple() {
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(0)
        .u16(0)
        .u32(0)
        .u32(3)
        .bytes(b"S1\0")
        .u32(3)
        .bytes(b"K2\0")
        .u32(3)
        .bytes(b"D3\0")
        .finish();
    let parsed = decode_json(&["T", "TextProperty"], data);
    assert_eq!(parsed, json!({ "T": ["S1", "K2", "D3"] }));
}

#[test]
fn enum_roles_from_ids() {
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(8) // class id
        .fname(2, 0)
        .u8(0) // value id
        .fname(3, 0)
        .finish();
    let parsed = decode_json(&["E", "EnumProperty", "EClass", "EClass::V2"], data);
    assert_eq!(
        parsed,
        json!({ "E": { "class": "EClass", "value": "EClass::V2" } })
    );
}

#[test]
fn enum_equal_ids_are_fatal() {
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(0)
        .fname(2, 0)
        .u8(0)
        .fname(3, 0)
        .finish();
    let err = decode(&["E", "EnumProperty", "EClass", "EClass::V2"], data)
        .expect_err("Expected err");
    assert!(matches!(
        err,
        Error::Property(PropertyError::EnumAmbiguity(0))
    ));
}

#[test]
fn unknown_property_type_is_fatal() {
    let data = StreamBuilder::new().fname(0, 0).fname(1, 0).finish();
    let err = decode(&["X", "FrobProperty"], data).expect_err("Expected err");
    assert!(matches!(
        err,
        Error::Property(PropertyError::UnknownProperty(_))
    ));
}

#[test]
fn name_suffix_is_biased_by_one() {
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(8)
        .u8(0)
        .fname(2, 3)
        .finish();
    let parsed = decode_json(&["Named", "NameProperty", "BG_Ashrah"], data);
    assert_eq!(parsed, json!({ "Named": "BG_Ashrah_2" }));

    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(8)
        .u8(0)
        .fname(2, 0)
        .finish();
    let parsed = decode_json(&["Named", "NameProperty", "BG_Ashrah"], data);
    assert_eq!(parsed, json!({ "Named": "BG_Ashrah" }));
}

#[test]
fn out_of_range_name_resolves_to_placeholder() {
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(8)
        .u8(0)
        .fname(99, 0)
        .finish();
    let parsed = decode_json(&["Named", "NameProperty"], data);
    assert_eq!(parsed, json!({ "Named": "[name:=63]" }));
}

#[test]
fn byte_property_raw_and_enum_like() {
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(1)
        .fname(2, 0) // sub type None
        .u8(0)
        .u8(42)
        .finish();
    let parsed = decode_json(&["B", "ByteProperty", "None"], data);
    assert_eq!(parsed, json!({ "B": 42 }));

    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(8)
        .fname(2, 0) // sub type ERarity
        .u8(0)
        .fname(3, 0)
        .finish();
    let parsed = decode_json(&["B", "ByteProperty", "ERarity", "ERarity::R1"], data);
    assert_eq!(parsed, json!({ "B": "ERarity::R1" }));
}

#[test]
fn soft_object_renders_as_path() {
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(12)
        .u8(0)
        .fname(2, 0)
        .u32(0)
        .finish();
    let parsed = decode_json(&["SO", "SoftObjectProperty", "/Game/Some/Path"], data);
    assert_eq!(parsed, json!({ "SO": "/Game/Some/Path" }));
}

#[test]
fn plain_object_reference() {
    let names = ["Obj", "ObjectProperty", "X", "Target"];
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(4)
        .u8(0)
        .i32(2) // name lives one slot past the index
        .finish();
    let parsed = decode_json(&names, data);
    assert_eq!(parsed, json!({ "Obj": "Object 0x2: Target" }));

    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(4)
        .u8(0)
        .i32(-2)
        .finish();
    let parsed = decode_json(&names, data);
    assert_eq!(parsed, json!({ "Obj": "Object -0x2: Target" }));

    // out of range lookups fall back to the bracketed reference form
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(4)
        .u8(0)
        .i32(100)
        .finish();
    let parsed = decode_json(&names, data);
    assert_eq!(parsed, json!({ "Obj": "[ref:=64|65]" }));
}

#[test]
fn row_struct_container() {
    let names = [
        "RowStruct",
        "ObjectProperty",
        "SuperX",
        "TableFile",
        "Item1",
        "IntProperty",
        "Cost",
        "None",
    ];
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(4)
        .u8(0)
        .i32(0) // object reference
        .fname(2, 0) // super
        .i32(3) // source file, signed fname
        .u32(1) // row count
        .fname(4, 0) // row key
        .fname(6, 0) // Cost
        .fname(5, 0) // IntProperty
        .u64(4)
        .u8(0)
        .i32(250)
        .fname(7, 0) // row body terminator
        .finish();
    let parsed = decode_json(&names, data);
    assert_eq!(parsed, json!({ "RowStruct": { "Item1": { "Cost": 250 } } }));
}

#[test]
fn prereq_struct_reads_owner_frames() {
    let names = [
        "mPreReqStruct",
        "ObjectProperty",
        "SuperY",
        "Cnt",
        "IntProperty",
        "None",
    ];
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(4)
        .u8(0)
        .i32(0)
        .fname(2, 0) // owner frame fname
        .i32(1) // owner frame reference
        .fname(3, 0)
        .fname(4, 0)
        .u64(4)
        .u8(0)
        .i32(7)
        .fname(5, 0)
        .finish();
    let parsed = decode_json(&names, data);
    assert_eq!(parsed, json!({ "mPreReqStruct": { "Cnt": 7 } }));
}

#[test]
fn script_struct_is_flagged_best_effort() {
    let names = ["ScriptStruct", "ObjectProperty", "SrcClass", "A", "IntProperty"];
    let mut builder = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(4)
        .u8(0)
        .i32(0)
        .fname(2, 0) // source class
        .i32(1); // referenced object
    for value in [1, 2, 3] {
        builder = builder.fname(3, 0).fname(4, 0).u64(4).u8(0).i32(value);
    }
    let data = builder.finish();

    let mut reader = ExportReader::new(&data, name_map(&names));
    let document = reader.read_export().expect("decode failed");
    assert_eq!(reader.position(), data.len() as u64);
    assert_eq!(reader.diagnostics().len(), 1);
    assert_eq!(
        serde_json::to_value(&document).expect("serialize failed"),
        json!({ "ScriptStruct": { "A": [1, 2, 3] } })
    );
}

#[test]
fn none_with_nonzero_trailer_rewinds_and_fails() {
    let data = StreamBuilder::new().fname(0, 0).u32(5).u64(0).finish();
    let err = decode(&["None"], data).expect_err("Expected err");
    assert!(matches!(
        err,
        Error::Property(PropertyError::NoneTrailer {
            trailer: 5,
            offset: 0,
        })
    ));
}

#[test]
fn none_with_zero_trailer_is_skipped() {
    let data = StreamBuilder::new()
        .fname(0, 0)
        .u32(0)
        .fname(1, 0)
        .fname(2, 0)
        .u64(0)
        .u8(1)
        .u8(0)
        .finish();
    let parsed = decode_json(&["None", "Foo", "BoolProperty"], data);
    assert_eq!(parsed, json!({ "Foo": true }));
}

#[test]
fn date_time_and_timespan_structs() {
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(2, 0)
        .u32(8)
        .u32(0)
        .fname(3, 0) // DateTime
        .u8(0)
        .u64(0)
        .u64(0)
        .u32(20231225)
        .u32(1200)
        .fname(1, 0)
        .fname(2, 0)
        .u32(8)
        .u32(0)
        .fname(4, 0) // Timespan
        .u8(0)
        .u64(0)
        .u64(0)
        .u64(3600)
        .finish();
    let parsed = decode_json(&["D", "TS", "StructProperty", "DateTime", "Timespan"], data);
    assert_eq!(
        parsed,
        json!({ "D": { "date": 20231225, "time": 1200 }, "TS": 3600 })
    );
}

#[test]
fn linear_color_struct() {
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u32(16)
        .u32(0)
        .fname(2, 0)
        .u8(0)
        .u64(0)
        .u64(0)
        .f32(1.0)
        .f32(0.5)
        .f32(0.25)
        .f32(1.0)
        .finish();
    let parsed = decode_json(&["LC", "StructProperty", "LinearColor"], data);
    assert_eq!(parsed, json!({ "LC": [1.0, 0.5, 0.25, 1.0] }));
}

#[test]
fn struct_size_mismatch_is_fatal() {
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u32(8) // Color bodies only consume 4
        .u32(0)
        .fname(2, 0)
        .u8(0)
        .u64(0)
        .u64(0)
        .u32(0xAABBCCDD)
        .finish();
    let err = decode(&["C", "StructProperty", "Color"], data).expect_err("Expected err");
    assert!(matches!(
        err,
        Error::Property(PropertyError::SizeMismatch {
            declared: 8,
            consumed: 4,
            ..
        })
    ));
}

#[test]
fn array_of_structs_shares_one_header() {
    let names = [
        "AS",
        "ArrayProperty",
        "StructProperty",
        "Elem",
        "Generic",
        "v",
        "IntProperty",
        "None",
    ];
    let mut builder = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(127)
        .fname(2, 0) // element type StructProperty
        .u8(0)
        .u32(2) // element count
        .fname(3, 0) // repeated element name
        .fname(2, 0) // inner type tag
        .u32(74) // struct size covers both bodies
        .u32(0)
        .fname(4, 0) // Generic
        .u8(0)
        .u64(0)
        .u64(0);
    for value in [5, 6] {
        builder = builder
            .fname(5, 0)
            .fname(6, 0)
            .u64(4)
            .u8(0)
            .i32(value)
            .fname(7, 0);
    }
    let parsed = decode_json(&names, builder.finish());
    assert_eq!(parsed, json!({ "AS": [{ "v": 5 }, { "v": 6 }] }));
}

#[test]
fn field_path_property() {
    let names = ["FP", "FieldPathProperty", "propA", "propB", "Owner"];
    let data = StreamBuilder::new()
        .fname(0, 0)
        .fname(1, 0)
        .u64(24)
        .u8(0)
        .u32(2)
        .fname(2, 0)
        .fname(3, 0)
        .i32(3)
        .finish();
    let parsed = decode_json(&names, data);
    assert_eq!(
        parsed,
        json!({ "FP": { "path": ["propA", "propB"], "owner": "Object 0x3: Owner" } })
    );
}
