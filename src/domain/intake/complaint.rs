//! Finalized complaint record handed to registration.

use serde::{Deserialize, Serialize};

use super::slots::{SlotName, Slots};

/// Maximum title length in characters.
pub const MAX_TITLE_CHARS: usize = 100;

/// Secondary fields of a finalized complaint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_timing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_details: Option<String>,
}

impl AdditionalDetails {
    pub fn is_empty(&self) -> bool {
        self.location_details.is_none()
            && self.issue_timing.is_none()
            && self.specific_details.is_none()
    }
}

/// Normalized complaint produced when the user confirms the summary.
///
/// # Invariants
///
/// - No field holds blank text; blank values are dropped.
/// - `additional_details` is absent rather than empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedComplaint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "additionalDetails",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_details: Option<AdditionalDetails>,
}

impl FinalizedComplaint {
    /// Builds the record from the session's slots.
    pub fn from_slots(slots: &Slots) -> Self {
        let filled = |slot: SlotName| {
            slots
                .is_filled(slot)
                .then(|| slots.get(slot).unwrap_or_default().to_string())
        };

        let title = filled(SlotName::Title).unwrap_or_else(|| {
            format!(
                "Complaint: {}",
                filled(SlotName::Department).unwrap_or_else(|| "Issue".to_string())
            )
        });

        let details = AdditionalDetails {
            location_details: filled(SlotName::Address),
            issue_timing: filled(SlotName::Timing),
            specific_details: filled(SlotName::SpecificDetails),
        };

        Self {
            title: Some(truncate_chars(&title, MAX_TITLE_CHARS)),
            department: filled(SlotName::Department),
            description: filled(SlotName::Description),
            additional_details: (!details.is_empty()).then_some(details),
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
