//! Session endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use rehab_core::resolver::resolve_result;
use rehab_core::types::{session_id, SessionResult};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/patients/:id/sessions
pub async fn list_for_patient(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthenticatedUser>,
    Path(patient_id): Path<String>,
) -> Result<Json<SessionListResponse>> {
    let patient = state
        .db
        .get_patient(&patient_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Patient {}", patient_id)))?;

    let (sessions, results) = tokio::join!(
        state.db.get_sessions_for_patient(&patient.id),
        state.db.results_for_patient(&patient.id),
    );
    let sessions = sessions?;
    let results = results?;

    let sessions = sessions
        .iter()
        .map(|s| {
            let session = s.to_api_session();
            let has_result = resolve_result(&session, &results).is_some();
            SessionSummary {
                session,
                has_result,
            }
        })
        .collect();

    Ok(Json(SessionListResponse { sessions }))
}

/// POST /api/patients/:id/sessions
pub async fn create(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthenticatedUser>,
    Path(patient_id): Path<String>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Json<Session>> {
    let patient = state
        .db
        .get_patient(&patient_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Patient {}", patient_id)))?;

    let ordinal = state.db.next_session_ordinal(&patient.id).await?;
    let session = DbSession {
        id: session_id(&patient.id, ordinal as u32),
        patient_id: patient.id.clone(),
        ordinal,
        session_date: payload.date,
        start_time: payload.start_time,
        game: payload.game.as_str().to_string(),
        created_at: chrono::Utc::now(),
    };
    state.db.create_session(&session).await?;

    tracing::info!("Created session {} for patient {}", session.id, patient.id);

    Ok(Json(session.to_api_session()))
}

/// GET /api/sessions/:id
pub async fn detail(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionDetailResponse>> {
    let session = state
        .db
        .get_session(&session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Session {}", session_id)))?;

    let comments = state.db.get_comments_for_session(&session.id).await?;

    Ok(Json(SessionDetailResponse {
        session: session.to_api_session(),
        comments: comments.iter().map(|c| c.to_api_comment()).collect(),
    }))
}

/// POST /api/sessions/:id/comments
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<String>,
    Json(payload): Json<AddCommentRequest>,
) -> Result<Json<SessionComment>> {
    if payload.body.trim().is_empty() {
        return Err(ApiError::BadRequest("Comment body is empty".to_string()));
    }

    let session = state
        .db
        .get_session(&session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Session {}", session_id)))?;

    let comment = DbSessionComment {
        id: Uuid::new_v4(),
        session_id: session.id,
        author_id: auth.user_id,
        body: payload.body,
        created_at: chrono::Utc::now(),
    };
    state.db.insert_comment(&comment).await?;

    Ok(Json(comment.to_api_comment()))
}

/// GET /api/sessions/:id/result
/// Resolves the session's result document through the dual-key convention
pub async fn result(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResult>> {
    let session = state
        .db
        .get_session(&session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Session {}", session_id)))?;

    let api_session = session.to_api_session();
    let results = state.db.results_for_patient(&session.patient_id).await?;

    let result = resolve_result(&api_session, &results)
        .ok_or_else(|| ApiError::NotFound(format!("Result for session {}", session_id)))?;

    Ok(Json(result.clone()))
}
