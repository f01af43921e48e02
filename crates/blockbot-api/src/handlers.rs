//! Route handler functions for all API endpoints.
//!
//! Each handler extracts its input via axum extractors, talks to the
//! dialogue controller in AppState, and returns JSON responses.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use blockbot_chat::{
    FlowKind, FlowSteps, KycDocument, PresetTopic, TransferReceipt, Turn, TurnInput,
};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request / response types
// =============================================================================

/// Body of POST /api/chat. Exactly one of the fields is expected; `topic`
/// wins when both are present.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub topic: Option<String>,
}

impl ChatRequest {
    fn into_input(self) -> Result<TurnInput, ApiError> {
        if let Some(topic) = self.topic {
            let topic: PresetTopic = topic.parse()?;
            return Ok(TurnInput::Topic(topic));
        }
        self.message
            .map(TurnInput::Text)
            .ok_or_else(|| ApiError::BadRequest("either 'message' or 'topic' is required".into()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub turns: usize,
    pub busy: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopicsResponse {
    pub topics: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub turns: Vec<Turn>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FlowsResponse {
    pub steps: FlowSteps,
    pub active: Option<FlowKind>,
    pub documents: Vec<KycDocument>,
    pub identity_verified: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransfersResponse {
    pub transfers: Vec<TransferReceipt>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        turns: state.controller.turn_count(),
        busy: state.controller.is_busy(),
    })
}

/// GET /api/topics - preset topic labels in display order.
pub async fn topics() -> Json<TopicsResponse> {
    Json(TopicsResponse {
        topics: PresetTopic::ALL
            .iter()
            .map(|t| t.label().to_string())
            .collect(),
    })
}

/// POST /api/chat - submit one user turn.
///
/// Responds with the assistant turn, or 204 when the input was blank.
/// The turn runs on its own task so a dropped connection cannot leave a
/// user turn without its answer.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    let input = request.into_input()?;
    let controller = state.controller.clone();

    let outcome = tokio::spawn(async move { controller.handle_turn(input).await })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Turn task failed");
            ApiError::Internal("turn processing failed".to_string())
        })?;

    match outcome? {
        Some(turn) => Ok((StatusCode::OK, Json(turn)).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// GET /api/history - the full conversation log.
pub async fn history(State(state): State<AppState>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        turns: state.controller.history(),
    })
}

/// GET /api/flows - current step of every flow.
pub async fn flows(State(state): State<AppState>) -> Json<FlowsResponse> {
    let steps = state.controller.flow_steps();
    Json(FlowsResponse {
        steps,
        active: steps.active(),
        documents: state.controller.documents(),
        identity_verified: state.controller.identity_verified(),
    })
}

/// GET /api/transfers - completed transfers, oldest first.
pub async fn transfers(State(state): State<AppState>) -> Json<TransfersResponse> {
    Json(TransfersResponse {
        transfers: state.controller.transfers(),
    })
}
