//! Fixed bot texts and quick-action labels.

/// First bot message of every session.
pub const SEED_GREETING: &str = "Hello! I'm the Grievance Chatbot. Please describe the issue you're facing, including the location and when it started, if possible.";

pub const HELP_TEXT: &str = "I can help you register a municipal complaint. Please describe the issue, location, and timing. Key details needed are the department, a description of the problem, and the address/location.";

pub const CANCELLED_TEXT: &str = "Okay, I've cancelled this complaint registration. Let me know if you need help with anything else.";

/// Reply sent after the session was reset because the turn failed.
pub const APOLOGY_TEXT: &str =
    "I encountered an unexpected issue and had to reset our conversation. Please start again.";

/// Reply sent when the user confirms the summary.
pub const REGISTRATION_ACK: &str = "Okay, proceeding with registration...";

pub const RESTART_ACTIONS: [&str; 2] = ["Register Complaint", "Check Status"];

pub const CONFIRM_ACTIONS: [&str; 2] = ["Yes, submit", "No, change details"];

pub const OPTIONAL_DETAIL_ACTIONS: [&str; 2] = ["Skip this detail", "Confirm all details now"];

pub const CHANGE_ACTIONS: [&str; 6] = [
    "Change Title",
    "Change Department",
    "Change Description",
    "Change Location",
    "Change Timing",
    "Change Specific Details",
];

/// Converts a label array into owned quick-actions.
pub fn actions(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}
