//! Item catalog assembly
//!
//! Decoded inventory documents are taxonomized into a nested catalog:
//! category, then owning character (or `Shared`), then an optional slot
//! (gear id, skin id, taunt kind), then the item record. Matching is driven
//! by item tags and a handful of slug patterns, with the rosters supplied as
//! explicit configuration.

use std::collections::{BTreeSet, HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Map, Value as Json};

use crate::value::Value;

lazy_static! {
    static ref CHARACTER_TAG_RE: Regex = Regex::new(r"(?:Character|Kameo)-?(.+\b)").unwrap();
    static ref GEAR_SLUG_RE: Regex = Regex::new(r"(.+)_Gear(\d+)(?:_(.+))?").unwrap();
    static ref PLAYER_MODULE_RE: Regex = Regex::new(r"(F|B)G_([A-Za-z]+|T1000)(_.+)+").unwrap();
    static ref SKIN_SLUG_RE: Regex = Regex::new(r"([A-Za-z]+|T1000)_Skin(\d+)(.*)").unwrap();
    static ref TAUNT_SLUG_RE: Regex = Regex::new(r"([A-Za-z]+|T1000)_([A-Za-z]+)(\d+)").unwrap();
}

/// The rosters and labels driving catalog assembly
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Tags accepted as catalog categories
    pub categories: HashSet<String>,
    /// Playable character roster
    pub characters: HashSet<String>,
    /// Kameo roster
    pub kameos: HashSet<String>,
    /// Rarity enum value to display label
    pub rarities: HashMap<String, String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let categories = [
            "Fatality",
            "Brutality",
            "Announcer",
            "Skin",
            "Gear",
            "Bundle",
            "Consumable",
            "Environment",
            "EnvironmentArt",
            "Ladder-Ending",
            "PlayerModule",
            "Taunt",
            "Music",
            "Progression",
            "MapMode-Movie",
        ];
        let characters = [
            "Ashrah",
            "Baraka",
            "Geras",
            "Havik",
            "JohnnyCage",
            "Kenshi",
            "Kitana",
            "KungLao",
            "LiMei",
            "LiuKang",
            "Mileena",
            "Nitara",
            "Raiden",
            "RainMage",
            "Rain",
            "Reiko",
            "Reptile",
            "Scorpion",
            "ShangTsung",
            "ShaoKahn",
            "GeneralShao",
            "GShao",
            "Sindel",
            "Smoke",
            "SubZero",
            "Tanya",
            // DLC
            "OmniMan",
            "QuanChi",
            "Peacemaker",
            "Ermac",
            "Homelander",
            "Takeda",
            // Story DLC
            "Cyrax",
            "Sektor",
            "NoobSaibot",
            // Guest DLC
            "Ghostface",
            "T1000",
            "Conan",
            // Leaked DLC
            "Jade",
            "CassieCage",
            "KungJin",
            "JacquiBriggs",
        ];
        let kameos = [
            "Darrius", "Sareena", "Cyrax", "Kano", "Sonya", "Sektor", "Frost", "Jax", "Stryker",
            "Scorpion", "SubZero", "KungLao", "Shujinko", "Motaro", "Goro",
            // DLC
            "Tremor", "Khameleon", "JohnnyCage", "JanetCage", "Mavado", "Ferra",
            // Extra
            "Floyd", "Onyx",
            // Leaked DLC
            "KungJin",
        ];
        let rarities = [
            ("None", "Default"),
            ("Rarity1", "Common"),
            ("Rarity2", "UnCommon"),
            ("Rarity3", "Rare"),
            ("Rarity4", "Very Rare"),
            ("Rarity5", "Ultra Rare"),
        ];

        CatalogConfig {
            categories: categories.iter().map(|s| s.to_string()).collect(),
            characters: characters.iter().map(|s| s.to_string()).collect(),
            kameos: kameos
                .iter()
                .map(|s| format!("{s}KAM"))
                .collect(),
            rarities: rarities
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl CatalogConfig {
    fn rarity_label(&self, rarity: &str) -> String {
        self.rarities
            .get(rarity)
            .cloned()
            .unwrap_or_else(|| "Other".to_string())
    }
}

/// Accumulates item records from decoded inventory documents
#[derive(Debug, Default)]
pub struct Catalog {
    config: CatalogConfig,
    root: Map<String, Json>,
}

impl Catalog {
    /// Create a new catalog with the given configuration
    pub fn new(config: CatalogConfig) -> Self {
        Catalog {
            config,
            root: Map::new(),
        }
    }

    /// Finish assembly, producing the nested catalog as JSON
    pub fn into_json(self) -> Json {
        Json::Object(self.root)
    }

    /// Add every item of one cleaned export document.
    ///
    /// Documents without a `RowStruct` or `LootTable` mapping are skipped.
    pub fn add_document(&mut self, export_name: &str, document: &Value) {
        let rows = document
            .field("RowStruct")
            .or_else(|| document.field("LootTable"));
        let Some(Value::Struct(rows)) = rows else {
            log::info!("{export_name} is not an inventory document, skipping");
            return;
        };

        let origin = origin_label(export_name);
        for (item_id, slot) in rows.iter() {
            for item in slot.values() {
                if let Value::Struct(_) = item {
                    self.add_item(&origin, item_id, item);
                }
            }
        }
    }

    fn add_item(&mut self, origin: &str, item_id: &str, item: &Value) {
        let mut tags: BTreeSet<String> = BTreeSet::new();
        for key in ["Tags", "InternalTags"] {
            if let Some(values) = item.field(key).and_then(Value::as_array) {
                tags.extend(values.iter().filter_map(|v| v.as_str().map(str::to_string)));
            }
        }
        if self.config.characters.contains(item_id) || self.config.kameos.contains(item_id) {
            tags.insert(item_id.to_string());
        }

        let mut character = item
            .field("Character")
            .and_then(|c| c.field("RowName"))
            .and_then(Value::as_str)
            .map(str::to_string);
        if character.is_none() {
            character = pick_tagged_roster_entry(item_id, &self.config.characters, &tags);
        }
        if character.is_none() {
            character = pick_tagged_roster_entry(item_id, &self.config.kameos, &tags);
        }
        if let Some(character) = &character {
            if !tags.contains(character) {
                log::warn!("Character {character} of item {item_id} is not in its tags");
            }
        }

        // first matching character tag wins; a bare category tag can still
        // be overridden by a later character tag
        let mut found_type: Option<String> = None;
        let mut bucket: Vec<String> = vec!["OtherCategories".to_string()];
        for tag in &tags {
            if let Some(capture) = CHARACTER_TAG_RE.captures(tag) {
                let category = capture[1].to_string();
                let owner = match &character {
                    Some(character) => character.clone(),
                    None => {
                        log::warn!("Character subtag {category} of item {item_id} has no character");
                        "OtherCharacter".to_string()
                    }
                };
                bucket = vec![category.clone(), owner];
                found_type = Some(category);
                break;
            } else if self.config.categories.contains(tag) {
                let owner = character.clone().unwrap_or_else(|| "Shared".to_string());
                bucket = vec![tag.clone(), owner];
                found_type = Some(tag.clone());
            }
        }
        if found_type.is_none() {
            log::warn!("Item {item_id} has no allowed tags: {tags:?}");
        }

        let asset = name_field(item, "Asset");
        let small_icon = name_field(item, "PreviewIcon");
        let mut large_icon = name_field(item, "LargePreviewIcon");
        let icon_fallback = matches!(
            found_type.as_deref(),
            Some("PlayerModule") | Some("EnvironmentArt")
        );
        if icon_fallback && small_icon == "None" && large_icon == "None" {
            large_icon = asset.clone();
        }
        if found_type.as_deref() == Some("PlayerModule") {
            if let Some(capture) = PLAYER_MODULE_RE.captures(item_id) {
                bucket = vec!["PlayerModule".to_string(), capture[2].to_string()];
            }
        }

        let rarity = item
            .field("Rarity")
            .and_then(|r| match r {
                Value::Enum(e) => e.value.as_deref(),
                _ => None,
            })
            .map(|v| v.rsplit("::").next().unwrap_or(v).to_string())
            .unwrap_or_default();
        let bundled_items: Vec<Json> = item
            .field("BundledItems")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|e| e.field("RowName").and_then(Value::as_str))
                    .map(|name| json!(name))
                    .collect()
            })
            .unwrap_or_default();

        let record = json!({
            "id": item_id,
            "name": text_record(item.field("Title"), &[]),
            "unlockRequirements": text_record(
                item.field("UnlockRequirement"),
                &[(
                    "altUnlockRequirements",
                    item.field("ReferencerContexts")
                        .and_then(|contexts| serde_json::to_value(contexts).ok())
                        .unwrap_or_else(|| json!([])),
                )],
            ),
            "rarity": self.config.rarity_label(&rarity),
            "previewImages": {
                "small": small_icon,
                "large": large_icon,
            },
            "colors": serde_json::to_value(
                item.field("ColorPaletteSwatch").and_then(|s| s.field("Colors"))
            ).unwrap_or(Json::Null),
            "bundledItems": bundled_items,
            "max": item.field("MaxCount").and_then(Value::as_i64).unwrap_or(1),
            "origin": origin,
            "asset": asset,
        });

        // gear, skins and taunts get one more nesting level from their slug
        match found_type.as_deref() {
            Some("Gear") => match GEAR_SLUG_RE.captures(item_id) {
                Some(capture) => bucket.push(capture[2].to_string()),
                None => log::warn!("Couldn't parse gear slug {item_id}"),
            },
            Some("Skin") => match SKIN_SLUG_RE.captures(item_id) {
                Some(capture) => bucket.push(capture[2].to_string()),
                None => log::warn!("Couldn't parse skin slug {item_id}"),
            },
            Some("Taunt") => match TAUNT_SLUG_RE.captures(item_id) {
                Some(capture) => bucket.push(title_case(&capture[2])),
                None if tags.contains("Passive-Bonus") => bucket.push("Passive".to_string()),
                None => log::warn!("Couldn't parse taunt slug {item_id}"),
            },
            _ => {}
        }

        bucket.push(item_id.to_string());
        insert_nested(&mut self.root, &bucket, record);
    }
}

/// The middle portion of an export display name, `{index}_{name}_{class}`
fn origin_label(export_name: &str) -> String {
    let tail = export_name
        .split_once('_')
        .map(|(_, tail)| tail)
        .unwrap_or(export_name);
    tail.rsplit_once('_')
        .map(|(head, _)| head)
        .unwrap_or(tail)
        .to_string()
}

/// Find the single roster entry present in the item's tags
fn pick_tagged_roster_entry(
    item_id: &str,
    roster: &HashSet<String>,
    tags: &BTreeSet<String>,
) -> Option<String> {
    let mut matches = tags.iter().filter(|tag| roster.contains(*tag));
    let first = matches.next()?;
    if matches.next().is_some() {
        log::warn!("Item {item_id} is tagged with more than one roster entry");
        return None;
    }
    Some(first.clone())
}

/// A localization triple record: source, id, default text
fn text_record(text: Option<&Value>, extra: &[(&str, Json)]) -> Json {
    let strings = match text {
        Some(Value::Text(strings)) => strings.as_slice(),
        _ => &[],
    };
    let mut record = Map::new();
    record.insert(
        "localizationSource".to_string(),
        strings.first().map(|s| json!(s)).unwrap_or(Json::Null),
    );
    record.insert(
        "localizationId".to_string(),
        strings.get(1).map(|s| json!(s)).unwrap_or(Json::Null),
    );
    record.insert(
        "default".to_string(),
        strings.get(2).map(|s| json!(s)).unwrap_or(Json::Null),
    );
    for (key, value) in extra {
        record.insert(key.to_string(), value.clone());
    }
    Json::Object(record)
}

fn name_field(item: &Value, key: &str) -> String {
    item.field(key)
        .and_then(Value::as_str)
        .unwrap_or("None")
        .to_string()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn insert_nested(root: &mut Map<String, Json>, path: &[String], record: Json) {
    let mut node = root;
    for segment in &path[..path.len() - 1] {
        let entry = node
            .entry(segment.clone())
            .or_insert_with(|| Json::Object(Map::new()));
        node = match entry {
            Json::Object(map) => map,
            other => {
                *other = Json::Object(Map::new());
                match other {
                    Json::Object(map) => map,
                    _ => unreachable!(),
                }
            }
        };
    }
    if let Some(last) = path.last() {
        node.insert(last.clone(), record);
    }
}
