//! Insertion-ordered property map
//!
//! Struct bodies keep their fields in stream order, and the format allows a
//! property name to repeat within one struct. A repeated name promotes the
//! slot to a sequence and every further occurrence appends to it.

use rustc_hash::FxHashMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::value::Value;

/// A value slot inside a [`ChainMap`]
///
/// A name that appeared once holds its value directly. The second insert
/// under the same name promotes the slot to a sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Single occurrence
    One(Value),
    /// Accumulated repeated occurrences, in stream order
    Many(Vec<Value>),
}

impl Slot {
    /// The value of a single-occurrence slot
    pub fn as_single(&self) -> Option<&Value> {
        match self {
            Slot::One(value) => Some(value),
            Slot::Many(_) => None,
        }
    }

    /// All values in this slot, in stream order
    pub fn values(&self) -> &[Value] {
        match self {
            Slot::One(value) => std::slice::from_ref(value),
            Slot::Many(values) => values,
        }
    }
}

/// An insertion-ordered map from property name to value
#[derive(Debug, Clone, Default)]
pub struct ChainMap {
    entries: Vec<(String, Slot)>,
    index: FxHashMap<String, usize>,
}

impl ChainMap {
    /// Create a new empty `ChainMap`
    pub fn new() -> Self {
        ChainMap::default()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a value, replacing any existing slot under `key`.
    ///
    /// The entry keeps its original position when the key already exists.
    pub fn insert(&mut self, key: String, value: Value) {
        self.insert_slot(key, Slot::One(value));
    }

    /// Insert a value with the repeated-name accumulation rule.
    ///
    /// The first insert stores the value directly, the second promotes the
    /// slot to a sequence, later ones append.
    pub fn insert_chained(&mut self, key: String, value: Value) {
        match self.index.get(&key) {
            Some(&at) => {
                let slot = &mut self.entries[at].1;
                if let Slot::Many(values) = slot {
                    values.push(value);
                } else {
                    let Slot::One(first) = std::mem::replace(slot, Slot::Many(Vec::new())) else {
                        unreachable!()
                    };
                    *slot = Slot::Many(vec![first, value]);
                }
            }
            None => self.push_entry(key, Slot::One(value)),
        }
    }

    /// Insert a pre-built slot, replacing any existing entry under `key`
    pub fn insert_slot(&mut self, key: String, slot: Slot) {
        match self.index.get(&key) {
            Some(&at) => self.entries[at].1 = slot,
            None => self.push_entry(key, slot),
        }
    }

    fn push_entry(&mut self, key: String, slot: Slot) {
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, slot));
    }

    /// Get the slot stored under `key`
    pub fn get(&self, key: &str) -> Option<&Slot> {
        self.index.get(key).map(|&at| &self.entries[at].1)
    }

    /// Get the value stored under `key`, if it occurred exactly once
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.get(key).and_then(Slot::as_single)
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.entries.iter().map(|(key, slot)| (key.as_str(), slot))
    }
}

impl IntoIterator for ChainMap {
    type Item = (String, Slot);
    type IntoIter = std::vec::IntoIter<(String, Slot)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl PartialEq for ChainMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Serialize for ChainMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, slot) in &self.entries {
            map.serialize_entry(key, slot)?;
        }
        map.end()
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Slot::One(value) => value.serialize(serializer),
            Slot::Many(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
        }
    }
}
