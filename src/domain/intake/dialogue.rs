//! Dialogue policy.
//!
//! Pure per-turn decision: given the action taken on the previous turn, the
//! detected intent and the extraction outcome, choose the next action, the
//! kind of reply and the quick-actions to offer. No I/O happens here.

use super::complaint::FinalizedComplaint;
use super::errors::IntakeError;
use super::messages::{
    actions, CANCELLED_TEXT, CHANGE_ACTIONS, CONFIRM_ACTIONS, HELP_TEXT, OPTIONAL_DETAIL_ACTIONS,
    REGISTRATION_ACK, RESTART_ACTIONS, SEED_GREETING,
};
use super::question_cues::{asks_for_confirmation, asks_for_department};
use super::slots::{department_names, SlotName, Slots};
use super::values::{Intent, NextAction, ReplyHint};
use crate::domain::foundation::StateMachine;

/// Intents answered with fixed text, bypassing the oracles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortCircuit {
    /// Discard the session and greet again.
    Restart,
    /// Discard the session and acknowledge.
    Cancel,
    /// Explain what is needed; the session is kept.
    Help,
}

impl ShortCircuit {
    pub fn from_intent(intent: Intent) -> Option<Self> {
        match intent {
            Intent::Restart => Some(ShortCircuit::Restart),
            Intent::Cancel => Some(ShortCircuit::Cancel),
            Intent::Help => Some(ShortCircuit::Help),
            _ => None,
        }
    }

    /// Whether the session is discarded and recreated.
    pub fn resets_session(&self) -> bool {
        matches!(self, ShortCircuit::Restart | ShortCircuit::Cancel)
    }

    pub fn action(&self) -> NextAction {
        match self {
            ShortCircuit::Restart | ShortCircuit::Cancel => NextAction::Reset,
            ShortCircuit::Help => NextAction::GatherInfo,
        }
    }

    pub fn reply(&self) -> &'static str {
        match self {
            ShortCircuit::Restart => SEED_GREETING,
            ShortCircuit::Cancel => CANCELLED_TEXT,
            ShortCircuit::Help => HELP_TEXT,
        }
    }

    pub fn quick_actions(&self) -> Vec<String> {
        match self {
            ShortCircuit::Restart => actions(&RESTART_ACTIONS),
            ShortCircuit::Cancel | ShortCircuit::Help => Vec::new(),
        }
    }
}

/// How the reply text for a turn is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyPlan {
    /// Fixed text, no oracle call.
    Fixed(&'static str),
    /// Ask the reply oracle with this hint.
    Draft(ReplyHint),
}

/// Inputs to the per-turn decision.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    /// Action stored on the session before this turn.
    pub last_action: NextAction,
    pub intent: Intent,
    /// Slots after this turn's extraction was merged.
    pub slots: &'a Slots,
    /// Core slots the extraction step reports as missing.
    pub missing: &'a [SlotName],
    pub suggested_question: &'a str,
}

/// Outcome of the per-turn decision.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnDecision {
    pub action: NextAction,
    pub reply: ReplyPlan,
    pub quick_actions: Vec<String>,
    pub complaint: Option<FinalizedComplaint>,
}

impl TurnDecision {
    fn new(action: NextAction, reply: ReplyPlan, quick_actions: Vec<String>) -> Self {
        Self {
            action,
            reply,
            quick_actions,
            complaint: None,
        }
    }

    /// True once a finalized complaint is attached.
    pub fn complaint_ready(&self) -> bool {
        self.complaint.is_some()
    }
}

/// Chooses the next action for a turn that reached the extraction step.
#[derive(Debug, Clone, Copy, Default)]
pub struct DialoguePolicy;

impl DialoguePolicy {
    pub fn new() -> Self {
        Self
    }

    /// Decides the next action and validates it against `last_action`.
    ///
    /// A missing submission-blocking slot always sends the dialogue back to
    /// gathering, even while a confirmation is pending.
    pub fn decide(&self, ctx: TurnContext<'_>) -> Result<TurnDecision, IntakeError> {
        let blocked = ctx.missing.iter().any(SlotName::blocks_submission);

        let decision = if ctx.last_action == NextAction::ConfirmInfo && !blocked {
            Self::answer_confirmation(&ctx)
        } else if !ctx.missing.is_empty() {
            let quick_actions = if asks_for_department(ctx.suggested_question, ctx.missing) {
                department_names()
            } else {
                Vec::new()
            };
            TurnDecision::new(
                NextAction::GatherInfo,
                ReplyPlan::Draft(ReplyHint::AskNextQuestion),
                quick_actions,
            )
        } else if asks_for_confirmation(ctx.suggested_question) {
            TurnDecision::new(
                NextAction::ConfirmInfo,
                ReplyPlan::Draft(ReplyHint::AskConfirmation),
                actions(&CONFIRM_ACTIONS),
            )
        } else {
            TurnDecision::new(
                NextAction::GatherInfo,
                ReplyPlan::Draft(ReplyHint::AskNextQuestion),
                actions(&OPTIONAL_DETAIL_ACTIONS),
            )
        };

        ctx.last_action.transition_to(decision.action)?;
        Ok(decision)
    }

    fn answer_confirmation(ctx: &TurnContext<'_>) -> TurnDecision {
        match ctx.intent {
            Intent::ConfirmationYes => {
                let mut decision = TurnDecision::new(
                    NextAction::TriggerRegistration,
                    ReplyPlan::Fixed(REGISTRATION_ACK),
                    Vec::new(),
                );
                decision.complaint = Some(FinalizedComplaint::from_slots(ctx.slots));
                decision
            }
            Intent::ConfirmationNo => TurnDecision::new(
                NextAction::GatherInfo,
                ReplyPlan::Draft(ReplyHint::AskChangeDetails),
                actions(&CHANGE_ACTIONS),
            ),
            _ => TurnDecision::new(
                NextAction::ConfirmInfo,
                ReplyPlan::Draft(ReplyHint::ClarifyConfirmation),
                actions(&CONFIRM_ACTIONS),
            ),
        }
    }
}
