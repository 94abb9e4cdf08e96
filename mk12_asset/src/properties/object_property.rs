//! Object reference properties
//!
//! A plain object property is just a reference. A few element names carry
//! inline payloads behind the reference: the data-table row container, the
//! loot table wrapper, script structs and the prerequisite wrapper.

use crate::containers::ChainMap;
use crate::error::Error;
use crate::properties::ExportReader;
use crate::value::{FieldPath, SoftObjectRef, Value};

impl ExportReader<'_> {
    pub(crate) fn read_object_property(
        &mut self,
        element_name: &str,
        from_array: bool,
    ) -> Result<Value, Error> {
        if from_array {
            return Ok(Value::ObjectRef(self.read_object_ref()?));
        }

        let _declared = self.cursor.read_u64()?;
        let _pad = self.cursor.read_u8()?;
        let reference = self.read_object_ref()?;
        log::debug!("{element_name}: ObjectProperty {reference}");

        match element_name {
            "RowStruct" => self.read_row_struct(),
            "mLootStruct" => self.read_loot_struct(),
            "ScriptStruct" => self.read_script_struct(),
            "mPreReqStruct" => Ok(Value::Struct(self.read_struct_body(true)?)),
            _ => Ok(Value::ObjectRef(reference)),
        }
    }

    /// A data-table row container: a keyed mapping of struct bodies
    fn read_row_struct(&mut self) -> Result<Value, Error> {
        let _super_name = self.read_fname()?;
        let _source_file = self.read_fname_signed()?;
        let row_count = self.cursor.read_u32()?;
        log::debug!("RowStruct with {row_count} rows");

        let mut rows = ChainMap::new();
        for _ in 0..row_count {
            let row_key = self.read_fname()?;
            let row = self.read_struct_body(false)?;
            rows.insert_chained(row_key, Value::Struct(row));
        }
        Ok(Value::Struct(rows))
    }

    /// A loot table wrapper: one nested property behind a super fname
    fn read_loot_struct(&mut self) -> Result<Value, Error> {
        let _super_name = self.read_fname()?;
        let mut value = ChainMap::new();
        if let Some((name, inner)) = self.read_property_once()? {
            value.insert(name, inner);
        }
        Ok(Value::Struct(value))
    }

    /// A script struct's real layout is defined by the class of the object
    /// it references. That dispatch is not implemented; the fixed
    /// three-property form below matches every sample seen so far and the
    /// export is flagged so downstream consumers know it is best-effort.
    fn read_script_struct(&mut self) -> Result<Value, Error> {
        let source = self.read_fname()?;
        let reference = self.read_object_ref()?;
        let offset = self.cursor.position();
        self.diagnose(
            offset,
            format!("ScriptStruct {source} ({reference}) decoded with the fixed three-property layout"),
        );

        let mut body = ChainMap::new();
        for _ in 0..3 {
            let Some((name, value)) = self.read_property_once()? else {
                break;
            };
            body.insert_chained(name, value);
        }
        Ok(Value::Struct(body))
    }

    pub(crate) fn read_soft_object_property(&mut self, from_array: bool) -> Result<Value, Error> {
        if !from_array {
            let _declared = self.cursor.read_u64()?;
            let _pad = self.cursor.read_u8()?;
        }
        let path = self.read_fname()?;
        let sub_path = self.cursor.read_u32()?;
        Ok(Value::SoftObjectRef(SoftObjectRef { path, sub_path }))
    }

    pub(crate) fn read_field_path_property(&mut self, from_array: bool) -> Result<Value, Error> {
        if !from_array {
            let _declared = self.cursor.read_u64()?;
            let _pad = self.cursor.read_u8()?;
        }
        let segment_count = self.cursor.read_u32()?;
        let mut path = Vec::with_capacity(segment_count as usize);
        for _ in 0..segment_count {
            path.push(self.read_fname()?);
        }
        let owner = self.read_object_ref()?;
        Ok(Value::FieldPath(FieldPath { path, owner }))
    }
}
