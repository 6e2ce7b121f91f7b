//! Value Objects for the Intake Domain
//!
//! Closed enumerations that drive the dialogue: the action tag persisted on a
//! session, the reply hint handed to the reply oracle, and the locally
//! detected user intent.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Action taken by the bot on a turn; persisted as the session's `last_action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    /// Still collecting fields.
    #[default]
    GatherInfo,
    /// Summary shown, waiting for a yes/no.
    ConfirmInfo,
    /// User confirmed; the finalized complaint is ready for registration.
    TriggerRegistration,
    /// Session was discarded and recreated.
    Reset,
    /// Set only by the external registration-completion collaborator.
    PostRegistration,
}

impl NextAction {
    /// Wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            NextAction::GatherInfo => "gather_info",
            NextAction::ConfirmInfo => "confirm_info",
            NextAction::TriggerRegistration => "trigger_registration",
            NextAction::Reset => "reset",
            NextAction::PostRegistration => "post_registration",
        }
    }
}

impl fmt::Display for NextAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateMachine for NextAction {
    fn valid_transitions(&self) -> Vec<Self> {
        use NextAction::*;
        match self {
            ConfirmInfo => vec![TriggerRegistration, GatherInfo, ConfirmInfo, Reset],
            GatherInfo | TriggerRegistration | Reset | PostRegistration => {
                vec![GatherInfo, ConfirmInfo, Reset]
            }
        }
    }
}

/// What kind of reply the next bot message needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyHint {
    /// Ask the oracle's suggested question.
    AskNextQuestion,
    /// Ask the user to confirm; a deterministic summary is appended.
    AskConfirmation,
    /// The answer to a confirmation prompt was neither yes nor no.
    ClarifyConfirmation,
    /// The user rejected the summary; ask what to change.
    AskChangeDetails,
    /// Free conversational reply.
    Generic,
}

/// Intent detected locally from the normalized user text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Farewell,
    StatusCheck,
    Restart,
    Help,
    Cancel,
    ConfirmationYes,
    ConfirmationNo,
    Unknown,
}

impl Intent {
    /// Wire name of the intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Farewell => "farewell",
            Intent::StatusCheck => "status_check",
            Intent::Restart => "restart",
            Intent::Help => "help",
            Intent::Cancel => "cancel",
            Intent::ConfirmationYes => "confirmation_yes",
            Intent::ConfirmationNo => "confirmation_no",
            Intent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Author of a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

impl Speaker {
    /// Label used when rendering history into prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Bot => "Bot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_action_serializes_snake_case() {
        let json = serde_json::to_string(&NextAction::TriggerRegistration).unwrap();
        assert_eq!(json, "\"trigger_registration\"");
        assert_eq!(NextAction::default(), NextAction::GatherInfo);
    }

    #[test]
    fn confirm_info_can_reach_registration() {
        assert!(NextAction::ConfirmInfo.can_transition_to(&NextAction::TriggerRegistration));
    }

    #[test]
    fn gathering_cannot_jump_to_registration() {
        assert!(NextAction::GatherInfo
            .transition_to(NextAction::TriggerRegistration)
            .is_err());
        assert!(NextAction::TriggerRegistration
            .transition_to(NextAction::TriggerRegistration)
            .is_err());
    }

    #[test]
    fn no_action_is_terminal() {
        for action in [
            NextAction::GatherInfo,
            NextAction::ConfirmInfo,
            NextAction::TriggerRegistration,
            NextAction::Reset,
            NextAction::PostRegistration,
        ] {
            assert!(!action.is_terminal(), "{} should not be terminal", action);
            assert!(action.can_transition_to(&NextAction::Reset));
        }
    }

    #[test]
    fn intent_wire_names_match_serde() {
        for intent in [Intent::StatusCheck, Intent::ConfirmationNo, Intent::Unknown] {
            let json = serde_json::to_string(&intent).unwrap();
            assert_eq!(json, format!("\"{}\"", intent.as_str()));
        }
    }

    #[test]
    fn speaker_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Speaker::Bot).unwrap(), "\"bot\"");
        assert_eq!(Speaker::User.label(), "User");
    }
}
