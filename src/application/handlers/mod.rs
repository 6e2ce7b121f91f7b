//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod intake;

pub use intake::{
    GetSessionError, GetSessionHandler, GetSessionQuery, ProcessTurnCommand, ProcessTurnHandler,
    ResetSessionCommand, ResetSessionHandler, TurnResponse,
};
