use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tron_editor::{EditorSession, Intent, SessionError, SessionView};
use tron_offer::SkippedRow;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse<'a> {
    #[serde(flatten)]
    view: SessionView<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped_rows: Vec<SkippedRow>,
}

fn session_body(
    session: &EditorSession,
    skipped_rows: Vec<SkippedRow>,
) -> Result<Json<Value>, AppError> {
    let view = session.view().ok_or(SessionError::NoCampaignLoaded)?;
    Ok(Json(serde_json::to_value(SessionResponse { view, skipped_rows })?))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/campaign", get(get_campaign))
        .route("/v1/campaign/json", post(upload_json))
        .route("/v1/campaign/csv", post(upload_csv))
        .route("/v1/campaign/intents", post(apply_intent))
        .route("/v1/campaign/reset", post(reset_campaign))
        .route("/v1/campaign/export", get(export_campaign))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/campaign
/// Current campaign and editing context
async fn get_campaign(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let session = state.session.lock().await;
    session_body(&session, Vec::new())
}

/// POST /v1/campaign/json
/// Replace the open document with an uploaded campaign
async fn upload_json(State(state): State<AppState>, body: String) -> Result<Json<Value>, AppError> {
    let mut session = state.session.lock().await;
    session.load_json(&body)?;
    session_body(&session, Vec::new())
}

/// POST /v1/campaign/csv
/// Replace the open document with a campaign generated from an offer sheet
async fn upload_csv(State(state): State<AppState>, body: String) -> Result<Json<Value>, AppError> {
    let mut session = state.session.lock().await;
    let skipped = session.load_csv(&body)?;
    session_body(&session, skipped)
}

/// POST /v1/campaign/intents
async fn apply_intent(
    State(state): State<AppState>,
    Json(intent): Json<Intent>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.session.lock().await;
    session.apply(&intent)?;
    session_body(&session, Vec::new())
}

/// POST /v1/campaign/reset
async fn reset_campaign(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let mut session = state.session.lock().await;
    session.reset_to_loaded()?;
    session_body(&session, Vec::new())
}

/// GET /v1/campaign/export
/// Enabled offers in editing order, as a formatted campaign document
async fn export_campaign(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let session = state.session.lock().await;
    let text = session.export()?;
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], text))
}
