use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{BlockbotError, Result};

/// Top-level configuration for the BlockBot application.
///
/// Loaded from `~/.blockbot/config.toml` by default. Every section is
/// optional; missing sections and fields fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockbotConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl BlockbotConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BlockbotConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| BlockbotError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// HTTP API port (used with `--serve`).
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            port: 3040,
        }
    }
}

/// Conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Open every session with the assistant's welcome turn.
    pub welcome_message: bool,
    /// Maximum accepted message length in characters.
    pub max_message_length: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            welcome_message: true,
            max_message_length: 4000,
        }
    }
}

/// Simulated fund-transfer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Artificial latency of the confirmation check, in milliseconds.
    pub verification_delay_ms: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            verification_delay_ms: 1000,
        }
    }
}

/// Text-generation backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Backend: "gemini" or "disabled".
    pub provider: String,
    /// Model name passed to the backend.
    pub model: String,
    /// API base URL.
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-pro".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}
