//! Patient record endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::{require_admin, AuthenticatedUser};
use crate::AppState;

/// GET /api/patients
pub async fn list(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthenticatedUser>,
) -> Result<Json<PatientListResponse>> {
    let patients = state.db.get_all_patients().await?;
    Ok(Json(PatientListResponse {
        patients: patients.iter().map(|p| p.to_api_patient()).collect(),
    }))
}

/// GET /api/patients/:id
pub async fn get_one(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthenticatedUser>,
    Path(patient_id): Path<String>,
) -> Result<Json<Patient>> {
    let patient = state
        .db
        .get_patient(&patient_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Patient {}", patient_id)))?;

    Ok(Json(patient.to_api_patient()))
}

/// POST /api/patients
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<CreatePatientRequest>,
) -> Result<Json<Patient>> {
    require_admin(&auth)?;

    let now = Utc::now();
    let patient = DbPatient {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        age: payload.age as i32,
        diagnosis: payload.diagnosis,
        affected_limb: payload.affected_limb,
        rom_limit_degrees: payload.rom_limit_degrees,
        status: payload.status.unwrap_or_default().as_str().to_string(),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    state.db.create_patient(&patient).await?;

    tracing::info!("Created patient {}", patient.id);

    Ok(Json(patient.to_api_patient()))
}

/// PUT /api/patients/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(patient_id): Path<String>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Patient>> {
    require_admin(&auth)?;

    // Get current record
    let mut current = state
        .db
        .get_patient(&patient_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Patient {}", patient_id)))?;

    // Apply updates
    if let Some(name) = request.name {
        current.name = name;
    }
    if let Some(age) = request.age {
        current.age = age as i32;
    }
    if let Some(diagnosis) = request.diagnosis {
        current.diagnosis = diagnosis;
    }
    if let Some(affected_limb) = request.affected_limb {
        current.affected_limb = affected_limb;
    }
    if let Some(rom_limit_degrees) = request.rom_limit_degrees {
        current.rom_limit_degrees = rom_limit_degrees;
    }
    if let Some(status) = request.status {
        current.status = status.as_str().to_string();
    }

    // Save
    state.db.update_patient(&current).await?;

    Ok(Json(current.to_api_patient()))
}

/// DELETE /api/patients/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(patient_id): Path<String>,
) -> Result<Json<DeletePatientResponse>> {
    require_admin(&auth)?;

    let deleted = state.db.soft_delete_patient(&patient_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Patient {}", patient_id)));
    }

    tracing::info!("Soft-deleted patient {}", patient_id);

    Ok(Json(DeletePatientResponse { deleted }))
}
