//! Asset name map
//!
//! Every string in an asset container is interned into one ordered table
//! that is fully materialized before any export is deserialized. Lookups
//! never mutate the table, so it is shared by reference between all readers
//! of one file.

use crate::containers::SharedResource;
use crate::error::Error;

/// Asset name map
#[derive(Debug, Clone, Default)]
pub struct NameMap {
    names: Vec<String>,
}

impl NameMap {
    /// Creates a new empty `NameMap` instance
    pub fn new() -> SharedResource<NameMap> {
        SharedResource::new(NameMap { names: Vec::new() })
    }

    /// Creates a new `NameMap` instance from a name batch
    pub fn from_name_batch(name_batch: &[String]) -> SharedResource<NameMap> {
        SharedResource::new(NameMap {
            names: name_batch.to_vec(),
        })
    }

    /// Creates a new `NameMap` instance from a dumped name table file.
    ///
    /// The format is one record per line, `HEXINDEX: NAME`. Indices must be
    /// contiguous from zero.
    pub fn from_table_file(text: &str) -> Result<SharedResource<NameMap>, Error> {
        let mut names = Vec::new();
        for (line_number, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let (index, name) = line.split_once(": ").ok_or_else(|| {
                Error::invalid_name_table(format!(
                    "Name table line {} has no `HEXINDEX: NAME` separator",
                    line_number + 1
                ))
            })?;
            let index = usize::from_str_radix(index.trim(), 16).map_err(|_| {
                Error::invalid_name_table(format!(
                    "Name table line {} has a bad hex index {index:?}",
                    line_number + 1
                ))
            })?;
            if index != names.len() {
                return Err(Error::invalid_name_table(format!(
                    "Name table indices are not contiguous, expected {:x}, got {index:x}",
                    names.len()
                )));
            }
            names.push(name.to_string());
        }
        Ok(SharedResource::new(NameMap { names }))
    }

    /// Number of interned names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the table has no names
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Get a name by table index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Resolve an fname pair into a name.
    ///
    /// The suffix is stored biased by one: 0 means no suffix, any other
    /// value `s` appends `_{s-1}`. Out-of-range indices resolve to a
    /// bracketed placeholder instead of failing.
    pub fn resolve(&self, index: u32, suffix: u32) -> String {
        let name = match self.get(index as usize) {
            Some(name) => name.to_string(),
            None => {
                log::warn!(
                    "Name index {index:#x} is out of range for a table of {} names",
                    self.names.len()
                );
                Self::placeholder(index as usize)
            }
        };
        match suffix {
            0 => name,
            suffix => format!("{name}_{}", suffix - 1),
        }
    }

    /// The placeholder emitted for an out-of-range name index
    pub fn placeholder(index: usize) -> String {
        format!("[name:={index:X}]")
    }
}
