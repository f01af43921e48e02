//! BlockBot API crate: axum HTTP surface over one dialogue session.
//!
//! Exposes the conversation (submit a turn, read the log), the preset topic
//! list, flow progress and completed transfers as JSON.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
