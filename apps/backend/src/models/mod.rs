//! Database models and API types

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from rehab-core
pub use rehab_core::types::{
    ActivityEntry, AppleGameResult, Finger, FingerDanceResult, GameKind, Hand, NoteRecord,
    Patient, PatientStatus, PerformanceMetrics, RomReading, Session, SessionResult,
};

/// Staff role. The aggregator is role-agnostic; roles only gate routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Therapist,
}

impl Default for Role {
    fn default() -> Self {
        Self::Therapist
    }
}

impl Role {
    /// Get the role as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Therapist => "therapist",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "therapist" => Some(Self::Therapist),
            _ => None,
        }
    }
}

// === Database Entity Types ===

/// Staff account (admin or therapist).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub token: String,
    pub name: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl DbUser {
    /// Parsed role, defaulting to therapist for unknown values.
    pub fn role(&self) -> Role {
        Role::from_str(&self.role).unwrap_or_default()
    }
}

/// Patient record stored in PostgreSQL.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPatient {
    pub id: String,
    pub name: String,
    pub age: i32,
    pub diagnosis: String,
    pub affected_limb: String,
    pub rom_limit_degrees: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl DbPatient {
    /// Convert to API patient type
    pub fn to_api_patient(&self) -> Patient {
        Patient {
            id: self.id.clone(),
            name: self.name.clone(),
            age: self.age.max(0) as u32,
            diagnosis: self.diagnosis.clone(),
            affected_limb: self.affected_limb.clone(),
            rom_limit_degrees: self.rom_limit_degrees,
            status: PatientStatus::from_str(&self.status).unwrap_or_default(),
        }
    }
}

/// Session stored in PostgreSQL.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSession {
    pub id: String,
    pub patient_id: String,
    pub ordinal: i32,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub game: String,
    pub created_at: DateTime<Utc>,
}

impl DbSession {
    /// Convert to API session type
    pub fn to_api_session(&self) -> Session {
        Session {
            id: self.id.clone(),
            patient_id: self.patient_id.clone(),
            date: self.session_date,
            start_time: self.start_time,
            game: GameKind::from_str(&self.game).unwrap_or(GameKind::AppleGame),
        }
    }
}

/// Therapist commentary attached to a session. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSessionComment {
    pub id: Uuid,
    pub session_id: String,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl DbSessionComment {
    /// Convert to API comment type
    pub fn to_api_comment(&self) -> SessionComment {
        SessionComment {
            id: self.id,
            author_id: self.author_id,
            body: self.body.clone(),
            created_at: self.created_at,
        }
    }
}

/// Game-result document mirrored from the telemetry store, keyed by the
/// synthesized result key rather than the session id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbGameResult {
    pub result_key: String,
    pub patient_id: String,
    pub payload: String,
    pub recorded_at: DateTime<Utc>,
}

impl DbGameResult {
    /// Decode the stored JSON document.
    pub fn decode(&self) -> serde_json::Result<SessionResult> {
        serde_json::from_str(&self.payload)
    }
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub role: Role,
    pub last_seen_at: DateTime<Utc>,
}

// Patient types

#[derive(Debug, Serialize, Deserialize)]
pub struct PatientListResponse {
    pub patients: Vec<Patient>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub age: u32,
    pub diagnosis: String,
    pub affected_limb: String,
    pub rom_limit_degrees: f64,
    pub status: Option<PatientStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub diagnosis: Option<String>,
    pub affected_limb: Option<String>,
    pub rom_limit_degrees: Option<f64>,
    pub status: Option<PatientStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletePatientResponse {
    pub deleted: bool,
}

// Session types

/// Session plus whether a result document resolves for it, so the list
/// view can mark sessions with missing telemetry.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionSummary {
    #[serde(flatten)]
    pub session: Session,
    pub has_result: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub game: GameKind,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionComment {
    pub id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionDetailResponse {
    pub session: Session,
    pub comments: Vec<SessionComment>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddCommentRequest {
    pub body: String,
}

// Result ingest types

#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResultResponse {
    pub result_key: String,
}

// Analytics types

#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsQuery {
    /// Fixed trend window size; defaults to thirds-based windowing.
    pub trend_window: Option<usize>,
}
