//! Game-result ingest endpoint
//!
//! The games write their telemetry documents here under the result key
//! they synthesize from the session id. Keys are accepted as-is; the
//! dual-key convention is handled at lookup time by the resolver.

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::{IngestResultResponse, SessionResult};
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// PUT /api/results/:key
pub async fn ingest(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthenticatedUser>,
    Path(result_key): Path<String>,
    Json(payload): Json<SessionResult>,
) -> Result<Json<IngestResultResponse>> {
    // The key prefix up to the `_result(s)_` marker names the patient.
    let patient_id = result_key
        .split_once("_result")
        .map(|(prefix, _)| prefix)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("Malformed result key {}", result_key)))?;

    let body = serde_json::to_string(&payload)
        .map_err(|e| ApiError::Internal(format!("Failed to encode result: {}", e)))?;

    state
        .db
        .upsert_game_result(&result_key, patient_id, &body)
        .await?;

    tracing::info!("Stored result document {}", result_key);

    Ok(Json(IngestResultResponse { result_key }))
}
