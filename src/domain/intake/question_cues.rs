//! Cues read from the extraction oracle's suggested question.
//!
//! The quick-action sets depend on plain substring checks against free text.
//! They live here so a structured question category can replace them without
//! touching the dialogue policy.

use super::slots::SlotName;

/// True when the department list should be offered as quick-actions.
pub fn asks_for_department(question: &str, missing: &[SlotName]) -> bool {
    let question = question.to_lowercase();
    missing.contains(&SlotName::Department)
        && (question.contains("department") || question.contains("which department"))
}

/// True when the question asks the user to confirm the collected details.
pub fn asks_for_confirmation(question: &str) -> bool {
    question.to_lowercase().contains("confirm")
}
