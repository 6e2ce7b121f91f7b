//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, errors, state machine trait)
//! - `intake` - Complaint intake dialogue: slots, session, normalizer, intents, policy

pub mod foundation;
pub mod intake;
