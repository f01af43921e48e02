pub mod config;
pub mod error;
pub mod types;

pub use config::BlockbotConfig;
pub use error::{BlockbotError, Result};
pub use types::*;
