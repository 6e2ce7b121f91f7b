//! Intake domain - municipal complaint collection through dialogue.
//!
//! The dialogue is driven by the action taken on the previous turn:
//!
//! ```text
//! gather_info  -> gather_info | confirm_info | reset
//! confirm_info -> trigger_registration | gather_info | confirm_info | reset
//! ```
//!
//! `trigger_registration` and `reset` are transient; the next turn continues
//! gathering. Nothing here performs I/O.

mod complaint;
mod dialogue;
mod errors;
mod intent;
mod messages;
mod normalizer;
mod question_cues;
mod session;
mod slots;
mod summary;
mod values;

pub use complaint::{AdditionalDetails, FinalizedComplaint, MAX_TITLE_CHARS};
pub use dialogue::{DialoguePolicy, ReplyPlan, ShortCircuit, TurnContext, TurnDecision};
pub use errors::IntakeError;
pub use intent::{classify_intent, IntentClassifier};
pub use messages::{
    actions, APOLOGY_TEXT, CANCELLED_TEXT, CHANGE_ACTIONS, CONFIRM_ACTIONS, HELP_TEXT,
    OPTIONAL_DETAIL_ACTIONS, REGISTRATION_ACK, RESTART_ACTIONS, SEED_GREETING,
};
pub use normalizer::{normalize, NormalizedText};
pub use question_cues::{asks_for_confirmation, asks_for_department};
pub use session::{
    HistoryEntry, IntakeSession, SessionPhase, SessionUpdate, DEFAULT_HISTORY_LIMIT,
};
pub use slots::{
    department_keyword_hints, department_names, Department, SlotName, Slots, DEPARTMENTS,
};
pub use summary::confirmation_summary;
pub use values::{Intent, NextAction, ReplyHint, Speaker};
