//! AI provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::OracleSettings;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// Provider backing both oracles
    #[serde(default = "default_provider")]
    pub primary_provider: AiProvider,

    /// Model override; each provider has its own default
    pub model: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    #[serde(default = "default_extraction_temperature")]
    pub extraction_temperature: f32,

    #[serde(default = "default_reply_temperature")]
    pub reply_temperature: f32,

    #[serde(default = "default_reply_max_tokens")]
    pub reply_max_tokens: u32,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAI,
    #[default]
    Anthropic,
    /// No provider; every oracle call degrades to its fallback.
    Disabled,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if Anthropic is configured
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Sampling parameters handed to the oracles.
    pub fn oracle_settings(&self) -> OracleSettings {
        OracleSettings {
            extraction_temperature: self.extraction_temperature,
            reply_temperature: self.reply_temperature,
            reply_max_tokens: self.reply_max_tokens,
        }
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.primary_provider {
            AiProvider::OpenAI if !self.has_openai() => {
                return Err(ValidationError::MissingRequired("OPENAI_API_KEY"));
            }
            AiProvider::Anthropic if !self.has_anthropic() => {
                return Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"));
            }
            _ => {}
        }

        if !(0.0..=2.0).contains(&self.extraction_temperature) {
            return Err(ValidationError::InvalidTemperature("extraction"));
        }
        if !(0.0..=2.0).contains(&self.reply_temperature) {
            return Err(ValidationError::InvalidTemperature("reply"));
        }
        if self.reply_max_tokens == 0 {
            return Err(ValidationError::NonPositive("reply_max_tokens"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            primary_provider: default_provider(),
            model: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            extraction_temperature: default_extraction_temperature(),
            reply_temperature: default_reply_temperature(),
            reply_max_tokens: default_reply_max_tokens(),
        }
    }
}

fn default_provider() -> AiProvider {
    AiProvider::Anthropic
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    0
}

fn default_extraction_temperature() -> f32 {
    0.2
}

fn default_reply_temperature() -> f32 {
    0.7
}

fn default_reply_max_tokens() -> u32 {
    150
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.primary_provider, AiProvider::Anthropic);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.reply_max_tokens, 150);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: 15,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_has_provider_checks() {
        let config = AiConfig {
            openai_api_key: Some("sk-xxx".to_string()),
            anthropic_api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(config.has_openai());
        assert!(!config.has_anthropic());
    }

    #[test]
    fn test_oracle_settings_follow_config() {
        let config = AiConfig {
            reply_temperature: 0.4,
            reply_max_tokens: 90,
            ..Default::default()
        };
        let settings = config.oracle_settings();
        assert_eq!(settings.extraction_temperature, 0.2);
        assert_eq!(settings.reply_temperature, 0.4);
        assert_eq!(settings.reply_max_tokens, 90);
    }

    #[test]
    fn test_validation_primary_missing_key() {
        let config = AiConfig {
            primary_provider: AiProvider::Anthropic,
            openai_api_key: Some("sk-xxx".to_string()),
            anthropic_api_key: None,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))
        );
    }

    #[test]
    fn test_validation_openai_primary() {
        let config = AiConfig {
            primary_provider: AiProvider::OpenAI,
            openai_api_key: Some("sk-xxx".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_disabled_needs_no_key() {
        let config = AiConfig {
            primary_provider: AiProvider::Disabled,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_temperature() {
        let config = AiConfig {
            primary_provider: AiProvider::Disabled,
            reply_temperature: 3.5,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidTemperature("reply"))
        );
    }
}
