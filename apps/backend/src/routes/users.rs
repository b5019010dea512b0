//! Staff registration and identity endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::{MeResponse, RegisterRequest, RegisterResponse};
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// POST /api/users/register
/// Creates a staff account and returns its token. Production deployments
/// front this with the clinic's identity provider.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Option<RegisterRequest>>,
) -> Result<Json<RegisterResponse>> {
    let payload = payload.unwrap_or(RegisterRequest {
        name: None,
        role: None,
    });
    let role = payload.role.unwrap_or_default();
    let user = state.db.create_user(payload.name.as_deref(), role).await?;

    tracing::info!("Registered new {} account: {}", role.as_str(), user.id);

    Ok(Json(RegisterResponse {
        user_id: user.id,
        token: user.token,
        role,
    }))
}

/// GET /api/users/me
/// Returns the authenticated identity and role
pub async fn me(
    Extension(auth): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<MeResponse>> {
    let user = state
        .db
        .get_user_by_token(&auth.token)
        .await?
        .ok_or_else(|| crate::error::ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse {
        user_id: user.id,
        name: user.name.clone(),
        role: user.role(),
        last_seen_at: user.last_seen_at,
    }))
}
