//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - LLM completion backends (Anthropic, OpenAI, mock)
//! - `oracle` - extraction and reply oracles built on an `AIProvider`
//! - `storage` - in-memory session store and idle sweeper
//! - `http` - axum routes

pub mod ai;
pub mod http;
pub mod oracle;
pub mod storage;

pub use oracle::{LlmExtractionOracle, LlmReplyOracle, OracleSettings};
pub use storage::{spawn_eviction_sweeper, InMemorySessionStore, SweeperConfig};
