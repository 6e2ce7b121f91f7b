//! Intake command and query handlers.

mod get_session;
mod process_turn;
mod reset_session;

pub use get_session::{GetSessionError, GetSessionHandler, GetSessionQuery};
pub use process_turn::{ProcessTurnCommand, ProcessTurnHandler, TurnResponse};
pub use reset_session::{ResetSessionCommand, ResetSessionHandler};
