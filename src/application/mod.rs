//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (turn, reset) are kept apart from query handlers (inspect).

pub mod handlers;

pub use handlers::{
    GetSessionError, GetSessionHandler, GetSessionQuery, ProcessTurnCommand, ProcessTurnHandler,
    ResetSessionCommand, ResetSessionHandler, TurnResponse,
};
