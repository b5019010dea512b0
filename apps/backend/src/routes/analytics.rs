//! Analytics endpoints

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use rehab_core::metrics::{compute_metrics, MetricsOptions, TrendWindow};
use rehab_core::types::{PerformanceMetrics, Session};

use crate::error::{ApiError, Result};
use crate::models::MetricsQuery;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/patients/:id/metrics
pub async fn metrics(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthenticatedUser>,
    Path(patient_id): Path<String>,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<PerformanceMetrics>> {
    let patient = state
        .db
        .get_patient(&patient_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Patient {}", patient_id)))?;

    // Sessions and result documents have no ordering dependency, so the
    // fetches run concurrently.
    let (sessions, results) = tokio::join!(
        state.db.get_sessions_for_patient(&patient.id),
        state.db.results_for_patient(&patient.id),
    );
    let sessions: Vec<Session> = sessions?.iter().map(|s| s.to_api_session()).collect();
    let results = results?;

    let options = MetricsOptions {
        trend_window: match query.trend_window {
            Some(n) if n > 0 => TrendWindow::Fixed(n),
            _ => TrendWindow::Thirds,
        },
    };

    Ok(Json(compute_metrics(&sessions, &results, &options)))
}
