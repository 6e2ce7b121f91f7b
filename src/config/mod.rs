//! Application configuration module
//!
//! Configuration is loaded from environment variables using the `config` and
//! `dotenvy` crates. Variables carry the `GRIEVANCE_DESK` prefix and nested
//! values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use grievance_desk::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod ai;
mod error;
mod server;
mod session;

pub use ai::{AiConfig, AiProvider};
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use session::SessionConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads. Whether it
/// validates depends on the AI provider selection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// AI provider configuration (Anthropic/OpenAI/disabled)
    #[serde(default)]
    pub ai: AiConfig,

    /// Session retention and eviction
    #[serde(default)]
    pub sessions: SessionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `GRIEVANCE_DESK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `GRIEVANCE_DESK__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `GRIEVANCE_DESK__AI__PRIMARY_PROVIDER=openai` -> `ai.primary_provider = openai`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GRIEVANCE_DESK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.sessions.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; tests touching them run one at a time.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "GRIEVANCE_DESK__AI__ANTHROPIC_API_KEY",
        "GRIEVANCE_DESK__AI__PRIMARY_PROVIDER",
        "GRIEVANCE_DESK__SERVER__PORT",
        "GRIEVANCE_DESK__SERVER__ENVIRONMENT",
        "GRIEVANCE_DESK__SESSIONS__MAX_SESSIONS",
    ];

    fn set_minimal_env() {
        env::set_var("GRIEVANCE_DESK__AI__ANTHROPIC_API_KEY", "sk-ant-xxx");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = lock_env();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.ai.anthropic_api_key.as_deref(), Some("sk-ant-xxx"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let _guard = lock_env();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.sessions.history_limit, 20);
        assert_eq!(config.ai.primary_provider, AiProvider::Anthropic);
    }

    #[test]
    fn test_missing_key_fails_validation() {
        let _guard = lock_env();
        clear_env();
        let config = AppConfig::load().unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_disabled_provider_validates_without_key() {
        let _guard = lock_env();
        env::set_var("GRIEVANCE_DESK__AI__PRIMARY_PROVIDER", "disabled");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.primary_provider, AiProvider::Disabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_production() {
        let _guard = lock_env();
        set_minimal_env();
        env::set_var("GRIEVANCE_DESK__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }

    #[test]
    fn test_custom_values() {
        let _guard = lock_env();
        set_minimal_env();
        env::set_var("GRIEVANCE_DESK__SERVER__PORT", "3000");
        env::set_var("GRIEVANCE_DESK__SESSIONS__MAX_SESSIONS", "50");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.sessions.max_sessions, 50);
    }
}
