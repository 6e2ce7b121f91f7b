//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Collaborator Ports
//!
//! - `AIProvider` - Text-generation backend behind both oracles
//! - `ExtractionOracle` - Structured slot extraction from free text
//! - `ReplyOracle` - Natural-language reply drafting
//!
//! ## Storage Ports
//!
//! - `SessionStore` - Process-lifetime session ownership and turn gating

mod ai_provider;
mod extraction_oracle;
mod reply_oracle;
mod session_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, ResponseFormat, TokenUsage,
};
pub use extraction_oracle::{
    DegradationReason, ExtractionOracle, ExtractionOutcome, ExtractionRequest, ExtractionResult,
};
pub use reply_oracle::{ReplyOracle, ReplyOutcome, ReplyRequest};
pub use session_store::{SessionStore, SessionStoreError, TurnLease};
