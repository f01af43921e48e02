use thiserror::Error;

/// Top-level error type for the BlockBot system.
///
/// Subsystem crates define their own error types and convert into
/// `BlockbotError` where a failure has to cross a crate boundary (the binary,
/// the HTTP server startup).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BlockbotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for BlockbotError {
    fn from(err: toml::de::Error) -> Self {
        BlockbotError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for BlockbotError {
    fn from(err: toml::ser::Error) -> Self {
        BlockbotError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for BlockbotError {
    fn from(err: serde_json::Error) -> Self {
        BlockbotError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for BlockBot operations.
pub type Result<T> = std::result::Result<T, BlockbotError>;
