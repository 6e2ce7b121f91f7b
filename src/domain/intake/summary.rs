//! Deterministic confirmation summary appended to `ask_confirmation` replies.

use super::slots::{SlotName, Slots};

const SUMMARY_HEADER: &str = "Okay, let's confirm the details I have:";
const SUMMARY_PROMPT: &str = "Is this information correct and complete? (yes/no)";

fn label(slot: SlotName) -> &'static str {
    match slot {
        SlotName::Title => "Title",
        SlotName::Department => "Department",
        SlotName::Description => "Description",
        SlotName::Address => "Location",
        SlotName::Timing => "Timing",
        SlotName::SpecificDetails => "Specific Details",
    }
}

/// Lists every populated slot, then asks for a yes/no answer.
pub fn confirmation_summary(slots: &Slots) -> String {
    let mut summary = String::from(SUMMARY_HEADER);
    summary.push('\n');
    for slot in SlotName::ALL {
        if !slots.is_filled(slot) {
            continue;
        }
        if let Some(value) = slots.get(slot) {
            summary.push_str(&format!("- {}: {}\n", label(slot), value.trim()));
        }
    }
    summary.push('\n');
    summary.push_str(SUMMARY_PROMPT);
    summary
}
