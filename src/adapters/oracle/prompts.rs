//! Prompt construction for the extraction and reply oracles.

use crate::domain::intake::{department_keyword_hints, HistoryEntry, ReplyHint, SlotName, Slots};

/// Renders history as `User: ...` / `Bot: ...` lines.
pub fn format_history(history: &[HistoryEntry]) -> String {
    history
        .iter()
        .map(|entry| format!("{}: {}", entry.role.label(), entry.text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn slots_json(slots: &Slots) -> String {
    serde_json::to_string_pretty(slots).unwrap_or_else(|_| "{}".to_string())
}

fn names(slots: &[SlotName]) -> String {
    let quoted: Vec<String> = slots.iter().map(|s| format!("\"{}\"", s)).collect();
    format!("[{}]", quoted.join(", "))
}

pub const EXTRACTION_SYSTEM_PROMPT: &str =
    "You analyze conversations for a municipal grievance intake desk and answer with JSON only.";

/// Builds the extraction prompt.
pub fn extraction_prompt(history: &[HistoryEntry], slots: &Slots, message: &str) -> String {
    let core = names(&SlotName::CORE);
    let all = names(&SlotName::ALL);
    let hints = department_keyword_hints();

    format!(
        r#"Analyze the following conversation history and the latest user message for a municipal grievance report.

Current known data:
{known}

Conversation History:
{history}
User: {message}

Department Keywords Hint (use if helpful): {hints}

Tasks:
1. Extract/Update Data: Based only on the history and latest message, provide the most likely values for the fields {all}.
   - Infer the `department` from the description and context. Only leave it null if truly ambiguous.
   - Generate a concise `title` (max 15 words) summarizing the issue if not explicitly given.
   - Update fields if the new message contradicts or refines previous info.
   - Output this as a JSON object under the key "extracted_data". Use null for fields not mentioned or unclear.
2. Identify Missing Core Info: List the core fields {core} that are still null or unclear in the updated data. Output this as a JSON list under the key "missing_core_fields".
3. Assess Plausibility: Briefly assess whether the description and address seem plausible for a municipal complaint. Output this as a string under the key "plausibility_assessment".
4. Suggest Next Question: Based only on "missing_core_fields":
   - If the list is not empty, suggest the single most important question to gather one missing core field (prioritize department, description, address, then timing, then title).
   - If the list is empty, suggest a specific question to gather more `specific_details` based on the department and description. If no specific detail seems needed, suggest asking the user to confirm the details.
   - Output this as a string under the key "next_question_suggestion".

Respond only with a valid JSON object containing the four keys "extracted_data", "missing_core_fields", "plausibility_assessment", "next_question_suggestion".

Example Output (missing timing):
{{
  "extracted_data": {{
    "title": "Street light out at Main and Elm",
    "department": "Electricity",
    "description": "The street light at the corner of Main St and Elm St is not working.",
    "address": "Corner of Main St and Elm St",
    "timing": null,
    "specific_details": null
  }},
  "missing_core_fields": ["timing"],
  "plausibility_assessment": "Description and address seem plausible.",
  "next_question_suggestion": "When did you first notice the street light was out?"
}}

Example Output (core complete, asking specific detail):
{{
  "extracted_data": {{
    "title": "Pothole on Oak Avenue",
    "department": "Roads",
    "description": "There is a large pothole causing issues for traffic.",
    "address": "Approx 123 Oak Avenue, near the park entrance",
    "timing": "Appeared last week after the rain",
    "specific_details": null
  }},
  "missing_core_fields": [],
  "plausibility_assessment": "Description and address seem plausible.",
  "next_question_suggestion": "How large is the pothole, approximately?"
}}"#,
        known = slots_json(slots),
        history = format_history(history),
        message = message,
        hints = hints,
        all = all,
        core = core,
    )
}

pub const REPLY_SYSTEM_PROMPT: &str = "You are a helpful and concise municipal grievance chatbot.";

/// Task description handed to the reply model for each hint.
pub fn reply_task(hint: ReplyHint, suggested_question: &str) -> String {
    match hint {
        ReplyHint::AskNextQuestion => format!(
            "Your primary goal is to ask the user the following question: '{}'. Be polite and conversational. Acknowledge their last message briefly if appropriate.",
            suggested_question
        ),
        ReplyHint::AskConfirmation => "All core details seem gathered. Briefly acknowledge the user's last message and ask them to confirm if the details are correct, or if they want to add or change anything. Do NOT include the summary details yourself; just ask for confirmation.".to_string(),
        ReplyHint::ClarifyConfirmation => "The user provided an ambiguous confirmation response. Ask them to clearly confirm (e.g., 'Yes, submit') or deny and request changes (e.g., 'No, change details').".to_string(),
        ReplyHint::AskChangeDetails => "The user wants to change details (they said 'no' to confirmation). Ask them specifically what they would like to change or add.".to_string(),
        ReplyHint::Generic => "Respond helpfully and conversationally to the user's latest message, keeping the context of the grievance report in mind. Keep the response concise.".to_string(),
    }
}

/// Builds the reply prompt.
pub fn reply_prompt(
    history: &[HistoryEntry],
    slots: &Slots,
    message: &str,
    hint: ReplyHint,
    suggested_question: &str,
) -> String {
    format!(
        "Current Complaint Data:\n{}\n\nConversation History:\n{}\nUser: {}\n\nYour Task: {}\n\nResponse:",
        slots_json(slots),
        format_history(history),
        message,
        reply_task(hint, suggested_question),
    )
}
