//! Command-line flags and how they fold into [`BlockbotConfig`].
//!
//! Every setting resolves as flag > `BLOCKBOT_*` env var > config file >
//! built-in default. Unparsable env values are ignored with a warning.

use std::path::PathBuf;

use clap::Parser;

use blockbot_core::config::BlockbotConfig;

/// BlockBot: a blockchain assistant with guided KYC, transfer and contract flows.
#[derive(Parser, Debug)]
#[command(name = "blockbot", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// API server port (with --serve).
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Text-generation provider ("gemini" or "disabled").
    #[arg(short = 'g', long = "generator")]
    pub generator: Option<String>,

    /// Start the session without the welcome turn.
    #[arg(long = "no-welcome")]
    pub no_welcome: bool,

    /// Serve the HTTP API instead of the interactive terminal.
    #[arg(long = "serve")]
    pub serve: bool,
}

impl CliArgs {
    /// Load the config file and apply flag and environment overrides.
    ///
    /// Returns the path that was read alongside the resolved config.
    pub fn load_config(&self) -> (PathBuf, BlockbotConfig) {
        let env = |key: &str| std::env::var(key).ok();
        let path = self.config_path(env);
        let mut config = BlockbotConfig::load_or_default(&path);
        self.apply_overrides(&mut config, env);
        (path, config)
    }

    /// --config > BLOCKBOT_CONFIG > ~/.blockbot/config.toml.
    fn config_path(&self, env: impl Fn(&str) -> Option<String>) -> PathBuf {
        self.config
            .clone()
            .or_else(|| env("BLOCKBOT_CONFIG").map(PathBuf::from))
            .unwrap_or_else(|| default_config_path(&env))
    }

    fn apply_overrides(&self, config: &mut BlockbotConfig, env: impl Fn(&str) -> Option<String>) {
        if let Some(port) = self.port.or_else(|| parsed_env(&env, "BLOCKBOT_PORT")) {
            config.general.port = port;
        }
        if let Some(level) = self.log_level.clone().or_else(|| env("BLOCKBOT_LOG_LEVEL")) {
            config.general.log_level = level;
        }
        if let Some(provider) = self.generator.clone().or_else(|| env("BLOCKBOT_GENERATOR")) {
            config.generator.provider = provider;
        }
        if self.no_welcome {
            config.chat.welcome_message = false;
        }
    }
}

fn parsed_env<T: std::str::FromStr>(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = env(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}

fn default_config_path(env: &impl Fn(&str) -> Option<String>) -> PathBuf {
    let home_var = if cfg!(target_os = "windows") {
        "USERPROFILE"
    } else {
        "HOME"
    };
    match env(home_var) {
        Some(home) => PathBuf::from(home).join(".blockbot").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}
