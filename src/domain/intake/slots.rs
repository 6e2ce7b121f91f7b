//! Complaint slots and the department catalogue.
//!
//! A slot is one named field of the complaint record. The six keys are
//! always present on the wire, whatever shape the extraction collaborator
//! returned.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Name of a single slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotName {
    Title,
    Department,
    Description,
    Address,
    Timing,
    SpecificDetails,
}

impl SlotName {
    /// Every slot, in record order.
    pub const ALL: [SlotName; 6] = [
        SlotName::Title,
        SlotName::Department,
        SlotName::Description,
        SlotName::Address,
        SlotName::Timing,
        SlotName::SpecificDetails,
    ];

    /// Slots tracked for completeness, in the order the missing list is reported.
    pub const CORE: [SlotName; 5] = [
        SlotName::Title,
        SlotName::Department,
        SlotName::Description,
        SlotName::Address,
        SlotName::Timing,
    ];

    /// Core slots that block submission when empty.
    pub const REQUIRED: [SlotName; 3] = [
        SlotName::Department,
        SlotName::Description,
        SlotName::Address,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotName::Title => "title",
            SlotName::Department => "department",
            SlotName::Description => "description",
            SlotName::Address => "address",
            SlotName::Timing => "timing",
            SlotName::SpecificDetails => "specific_details",
        }
    }

    /// Parses a core slot name, ignoring case and surrounding whitespace.
    ///
    /// `specific_details` is deliberately not a core field and yields `None`.
    pub fn parse_core(name: &str) -> Option<SlotName> {
        let name = name.trim().to_ascii_lowercase();
        SlotName::CORE.into_iter().find(|slot| slot.as_str() == name)
    }

    pub fn is_core(&self) -> bool {
        SlotName::CORE.contains(self)
    }

    pub fn blocks_submission(&self) -> bool {
        SlotName::REQUIRED.contains(self)
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collected complaint fields for one session.
///
/// Absent keys deserialize to their defaults, so a partial document from an
/// external source always yields all six slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Slots {
    pub title: Option<String>,
    pub department: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub timing: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub specific_details: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Slots {
    /// Creates an empty slot set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot's value, `None` when unset.
    pub fn get(&self, slot: SlotName) -> Option<&str> {
        match slot {
            SlotName::Title => self.title.as_deref(),
            SlotName::Department => self.department.as_deref(),
            SlotName::Description => self.description.as_deref(),
            SlotName::Address => self.address.as_deref(),
            SlotName::Timing => self.timing.as_deref(),
            SlotName::SpecificDetails => Some(self.specific_details.as_str()),
        }
    }

    /// Assigns a value to a slot.
    pub fn set(&mut self, slot: SlotName, value: impl Into<String>) {
        let value = value.into();
        match slot {
            SlotName::Title => self.title = Some(value),
            SlotName::Department => self.department = Some(value),
            SlotName::Description => self.description = Some(value),
            SlotName::Address => self.address = Some(value),
            SlotName::Timing => self.timing = Some(value),
            SlotName::SpecificDetails => self.specific_details = value,
        }
    }

    /// A slot is filled when it holds non-blank text.
    pub fn is_filled(&self, slot: SlotName) -> bool {
        self.get(slot).is_some_and(|v| !v.trim().is_empty())
    }

    /// Core slots still empty, in [`SlotName::CORE`] order.
    pub fn missing_core(&self) -> Vec<SlotName> {
        SlotName::CORE
            .into_iter()
            .filter(|slot| !self.is_filled(*slot))
            .collect()
    }

    /// Merges extracted values from an untyped JSON object.
    ///
    /// Only non-null values for known slot keys are applied; a known slot is
    /// never overwritten with null. Strings are taken as-is, numbers and
    /// booleans by their textual form. Returns the slots that changed value.
    pub fn merge_extracted(&mut self, extracted: &Map<String, Value>) -> Vec<SlotName> {
        let mut changed = Vec::new();
        for slot in SlotName::ALL {
            let text = match extracted.get(slot.as_str()) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::Bool(b)) => b.to_string(),
                _ => continue,
            };
            if self.get(slot) != Some(text.as_str()) {
                self.set(slot, text);
                changed.push(slot);
            }
        }
        changed
    }
}

/// A municipal department the complaint can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Department {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

/// Departments in quick-action order, with keyword hints for the extraction prompt.
pub const DEPARTMENTS: [Department; 6] = [
    Department {
        name: "Electricity",
        keywords: &["electricity", "power", "light", "outage", "streetlight"],
    },
    Department {
        name: "Water",
        keywords: &["water", "pipe", "leak", "tap", "sewage"],
    },
    Department {
        name: "Roads",
        keywords: &["road", "pothole", "street", "traffic", "signal"],
    },
    Department {
        name: "Sanitation",
        keywords: &["garbage", "trash", "waste", "collection", "cleaning"],
    },
    Department {
        name: "Parks",
        keywords: &["park", "playground", "tree"],
    },
    Department {
        name: "Other",
        keywords: &["other", "general", "issue"],
    },
];

/// Department names in catalogue order.
pub fn department_names() -> Vec<String> {
    DEPARTMENTS.iter().map(|d| d.name.to_string()).collect()
}

/// The catalogue as a `{name: [keywords]}` JSON object.
pub fn department_keyword_hints() -> Value {
    let mut map = Map::new();
    for dept in DEPARTMENTS.iter() {
        map.insert(
            dept.name.to_string(),
            Value::from(dept.keywords.iter().map(|k| k.to_string()).collect::<Vec<_>>()),
        );
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_slots_serialize_all_six_keys() {
        let value = serde_json::to_value(Slots::new()).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), 6);
        for slot in SlotName::ALL {
            assert!(obj.contains_key(slot.as_str()), "missing {}", slot);
        }
        assert_eq!(obj["specific_details"], json!(""));
        assert_eq!(obj["title"], Value::Null);
    }

    #[test]
    fn partial_document_fills_defaults() {
        let slots: Slots =
            serde_json::from_value(json!({"department": "Water", "specific_details": null}))
                .unwrap();

        assert_eq!(slots.department.as_deref(), Some("Water"));
        assert_eq!(slots.specific_details, "");
        assert!(slots.address.is_none());
    }

    #[test]
    fn merge_ignores_nulls_and_unknown_keys() {
        let mut slots = Slots::new();
        slots.set(SlotName::Address, "Oak Avenue");

        let extracted = json!({
            "address": null,
            "department": "Roads",
            "priority": "high",
            "timing": 3
        });
        let changed = slots.merge_extracted(extracted.as_object().unwrap());

        assert_eq!(slots.address.as_deref(), Some("Oak Avenue"));
        assert_eq!(slots.department.as_deref(), Some("Roads"));
        assert_eq!(slots.timing.as_deref(), Some("3"));
        assert_eq!(changed, vec![SlotName::Department, SlotName::Timing]);
    }

    #[test]
    fn merge_skips_nested_values() {
        let mut slots = Slots::new();
        let extracted = json!({"description": {"text": "leak"}, "title": ["a"]});
        assert!(slots.merge_extracted(extracted.as_object().unwrap()).is_empty());
        assert_eq!(slots, Slots::new());
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut slots = Slots::new();
        slots.set(SlotName::Department, "Roads");
        slots.set(SlotName::Description, "   ");

        assert_eq!(
            slots.missing_core(),
            vec![
                SlotName::Title,
                SlotName::Description,
                SlotName::Address,
                SlotName::Timing
            ]
        );
    }

    #[test]
    fn parse_core_accepts_only_core_names() {
        assert_eq!(SlotName::parse_core(" Address "), Some(SlotName::Address));
        assert_eq!(SlotName::parse_core("specific_details"), None);
        assert_eq!(SlotName::parse_core("phone"), None);
    }

    #[test]
    fn required_slots_block_submission() {
        assert!(SlotName::Address.blocks_submission());
        assert!(!SlotName::Timing.blocks_submission());
        assert!(SlotName::Timing.is_core());
        assert!(!SlotName::SpecificDetails.is_core());
    }

    #[test]
    fn catalogue_order_is_stable() {
        assert_eq!(
            department_names(),
            vec!["Electricity", "Water", "Roads", "Sanitation", "Parks", "Other"]
        );
        let hints = department_keyword_hints();
        assert_eq!(hints["Roads"][1], json!("pothole"));
    }
}
