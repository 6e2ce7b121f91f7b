//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing
//! - `OpenAIProvider` - OpenAI chat models
//! - `AnthropicProvider` - Anthropic Claude models

mod anthropic_provider;
mod mock_provider;
mod openai_provider;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
