//! State machine trait for action and status enums.
//!
//! Gives enums that model a lifecycle a single place to declare which
//! transitions are legal, plus a validated `transition_to`.

use super::ValidationError;

/// Trait for enums that represent state machines.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for NextAction {
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             ConfirmInfo => vec![TriggerRegistration, GatherInfo, ConfirmInfo, Reset],
///             _ => vec![GatherInfo, ConfirmInfo, Reset],
///         }
///     }
/// }
///
/// let next = last_action.transition_to(NextAction::ConfirmInfo)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
