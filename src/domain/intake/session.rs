//! Intake session entity.
//!
//! One session per client key. Holds the collected slots, a bounded
//! conversation history and the action taken on the previous turn, which
//! selects the branch for the next one.

use serde::{Deserialize, Serialize};

use super::complaint::FinalizedComplaint;
use super::messages::SEED_GREETING;
use super::slots::Slots;
use super::values::{NextAction, Speaker};
use crate::domain::foundation::{SessionKey, Timestamp};

/// Default number of history entries kept per session.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Progress marker; `Start` until the first bot action, then mirrors it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Start,
    GatherInfo,
    ConfirmInfo,
    TriggerRegistration,
    Reset,
    PostRegistration,
}

impl From<NextAction> for SessionPhase {
    fn from(action: NextAction) -> Self {
        match action {
            NextAction::GatherInfo => SessionPhase::GatherInfo,
            NextAction::ConfirmInfo => SessionPhase::ConfirmInfo,
            NextAction::TriggerRegistration => SessionPhase::TriggerRegistration,
            NextAction::Reset => SessionPhase::Reset,
            NextAction::PostRegistration => SessionPhase::PostRegistration,
        }
    }
}

/// One line of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Speaker,
    pub text: String,
}

impl HistoryEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Speaker::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: Speaker::Bot,
            text: text.into(),
        }
    }
}

/// Partial update merged into a session; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionUpdate {
    pub phase: Option<SessionPhase>,
    pub slots: Option<Slots>,
    pub last_action: Option<NextAction>,
    pub prepared_complaint: Option<FinalizedComplaint>,
}

impl SessionUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slots(mut self, slots: Slots) -> Self {
        self.slots = Some(slots);
        self
    }

    /// Sets the last action and moves the phase along with it.
    pub fn with_last_action(mut self, action: NextAction) -> Self {
        self.last_action = Some(action);
        self.phase = Some(action.into());
        self
    }

    pub fn with_prepared_complaint(mut self, complaint: FinalizedComplaint) -> Self {
        self.prepared_complaint = Some(complaint);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.phase.is_none()
            && self.slots.is_none()
            && self.last_action.is_none()
            && self.prepared_complaint.is_none()
    }
}

/// State of one intake conversation.
///
/// # Invariants
///
/// - `history` never holds more than `history_limit` entries; the oldest go first.
/// - A fresh session holds exactly the seed greeting and `last_action = gather_info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntakeSession {
    key: SessionKey,
    phase: SessionPhase,
    slots: Slots,
    conversation_history: Vec<HistoryEntry>,
    last_action: NextAction,
    prepared_complaint: Option<FinalizedComplaint>,
    #[serde(skip)]
    history_limit: usize,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl IntakeSession {
    /// Creates a session seeded with the greeting.
    pub fn new(key: SessionKey, history_limit: usize) -> Self {
        let now = Timestamp::now();
        let mut session = Self {
            key,
            phase: SessionPhase::Start,
            slots: Slots::new(),
            conversation_history: Vec::new(),
            last_action: NextAction::GatherInfo,
            prepared_complaint: None,
            history_limit: history_limit.max(1),
            created_at: now,
            updated_at: now,
        };
        session.push_history(HistoryEntry::bot(SEED_GREETING));
        session
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn slots(&self) -> &Slots {
        &self.slots
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.conversation_history
    }

    pub fn last_action(&self) -> NextAction {
        self.last_action
    }

    pub fn prepared_complaint(&self) -> Option<&FinalizedComplaint> {
        self.prepared_complaint.as_ref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Time of the last mutation.
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Appends an entry, dropping the oldest ones beyond the limit.
    pub fn push_history(&mut self, entry: HistoryEntry) {
        self.conversation_history.push(entry);
        let overflow = self
            .conversation_history
            .len()
            .saturating_sub(self.history_limit);
        if overflow > 0 {
            self.conversation_history.drain(..overflow);
        }
        self.touch();
    }

    /// Merges a partial update.
    pub fn apply(&mut self, update: SessionUpdate) {
        if let Some(phase) = update.phase {
            self.phase = phase;
        }
        if let Some(slots) = update.slots {
            self.slots = slots;
        }
        if let Some(action) = update.last_action {
            self.last_action = action;
        }
        if let Some(complaint) = update.prepared_complaint {
            self.prepared_complaint = Some(complaint);
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intake::slots::SlotName;
    use proptest::prelude::*;

    fn key() -> SessionKey {
        SessionKey::new("s-1").unwrap()
    }

    #[test]
    fn new_session_holds_seed_greeting() {
        let session = IntakeSession::new(key(), DEFAULT_HISTORY_LIMIT);

        assert_eq!(session.history(), &[HistoryEntry::bot(SEED_GREETING)]);
        assert_eq!(session.last_action(), NextAction::GatherInfo);
        assert_eq!(session.phase(), SessionPhase::Start);
        assert_eq!(session.slots(), &Slots::new());
        assert!(session.prepared_complaint().is_none());
    }

    #[test]
    fn history_keeps_most_recent_entries() {
        let mut session = IntakeSession::new(key(), 3);
        for i in 0..5 {
            session.push_history(HistoryEntry::user(format!("msg {}", i)));
        }

        let texts: Vec<_> = session.history().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["msg 2", "msg 3", "msg 4"]);
    }

    #[test]
    fn apply_leaves_unset_fields_alone() {
        let mut session = IntakeSession::new(key(), DEFAULT_HISTORY_LIMIT);
        let mut slots = Slots::new();
        slots.set(SlotName::Department, "Parks");

        session.apply(SessionUpdate::new().with_slots(slots.clone()));
        session.apply(SessionUpdate::new().with_last_action(NextAction::ConfirmInfo));

        assert_eq!(session.slots(), &slots);
        assert_eq!(session.last_action(), NextAction::ConfirmInfo);
        assert_eq!(session.phase(), SessionPhase::ConfirmInfo);
    }

    #[test]
    fn mutations_advance_updated_at() {
        let mut session = IntakeSession::new(key(), DEFAULT_HISTORY_LIMIT);
        let before = session.updated_at();
        session.push_history(HistoryEntry::user("hi"));
        assert!(session.updated_at() >= before);
        assert!(session.created_at() <= session.updated_at());
    }

    proptest! {
        #[test]
        fn history_never_exceeds_limit(limit in 1usize..30, pushes in 0usize..80) {
            let mut session = IntakeSession::new(key(), limit);
            for i in 0..pushes {
                session.push_history(HistoryEntry::user(i.to_string()));
            }

            let history = session.history();
            prop_assert!(history.len() <= limit);
            prop_assert_eq!(history.len(), (pushes + 1).min(limit));
            if pushes > 0 {
                prop_assert_eq!(
                    history.last().map(|e| e.text.clone()),
                    Some((pushes - 1).to_string())
                );
            }
        }
    }

    #[test]
    fn snapshot_serializes_history_roles() {
        let session = IntakeSession::new(key(), DEFAULT_HISTORY_LIMIT);
        let value = serde_json::to_value(&session).unwrap();

        assert_eq!(value["conversation_history"][0]["role"], "bot");
        assert_eq!(value["last_action"], "gather_info");
        assert_eq!(value["phase"], "start");
        assert!(value.get("history_limit").is_none());
    }
}
