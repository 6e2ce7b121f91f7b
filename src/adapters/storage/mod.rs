//! Storage Adapters
//!
//! Implementations of the SessionStore port.
//!
//! ## Available Adapters
//!
//! - **InMemorySessionStore** - process-local sessions with per-key turn gates
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{spawn_eviction_sweeper, InMemorySessionStore, SweeperConfig};
//!
//! let store = Arc::new(InMemorySessionStore::new(20, 10_000));
//! let sweeper = spawn_eviction_sweeper(store.clone(), SweeperConfig::default(), shutdown_rx);
//! ```

mod eviction_sweeper;
mod in_memory_session_store;

pub use eviction_sweeper::{spawn_eviction_sweeper, EvictionSweeper, SweeperConfig};
pub use in_memory_session_store::{InMemorySessionStore, DEFAULT_MAX_SESSIONS};
