//! PostgreSQL database operations

use std::collections::HashMap;

use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === User Repository ===

    /// Create a new staff account with a generated token
    pub async fn create_user(&self, name: Option<&str>, role: Role) -> Result<DbUser> {
        let token = Uuid::new_v4().to_string();
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            INSERT INTO users (token, name, role)
            VALUES ($1, $2, $3)
            RETURNING id, token, name, role, created_at, last_seen_at
            "#,
        )
        .bind(&token)
        .bind(name)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by token
    pub async fn get_user_by_token(&self, token: &str) -> Result<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, token, name, role, created_at, last_seen_at
            FROM users
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user last_seen_at timestamp
    pub async fn update_last_seen(&self, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Patient Repository ===

    /// Insert a new patient record
    pub async fn create_patient(&self, patient: &DbPatient) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO patients (id, name, age, diagnosis, affected_limb,
                                 rom_limit_degrees, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&patient.id)
        .bind(&patient.name)
        .bind(patient.age)
        .bind(&patient.diagnosis)
        .bind(&patient.affected_limb)
        .bind(patient.rom_limit_degrees)
        .bind(&patient.status)
        .bind(patient.created_at)
        .bind(patient.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a patient by id, excluding soft-deleted records
    pub async fn get_patient(&self, patient_id: &str) -> Result<Option<DbPatient>> {
        let patient = sqlx::query_as::<_, DbPatient>(
            r#"
            SELECT id, name, age, diagnosis, affected_limb, rom_limit_degrees,
                   status, created_at, updated_at, deleted_at
            FROM patients
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(patient)
    }

    /// Get all patients, excluding soft-deleted records
    pub async fn get_all_patients(&self) -> Result<Vec<DbPatient>> {
        let patients = sqlx::query_as::<_, DbPatient>(
            r#"
            SELECT id, name, age, diagnosis, affected_limb, rom_limit_degrees,
                   status, created_at, updated_at, deleted_at
            FROM patients
            WHERE deleted_at IS NULL
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(patients)
    }

    /// Update a patient record
    pub async fn update_patient(&self, patient: &DbPatient) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE patients
            SET name = $2,
                age = $3,
                diagnosis = $4,
                affected_limb = $5,
                rom_limit_degrees = $6,
                status = $7,
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(&patient.id)
        .bind(&patient.name)
        .bind(patient.age)
        .bind(&patient.diagnosis)
        .bind(&patient.affected_limb)
        .bind(patient.rom_limit_degrees)
        .bind(&patient.status)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Soft delete a patient. Records are never physically removed.
    pub async fn soft_delete_patient(&self, patient_id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE patients
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(patient_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // === Session Repository ===

    /// Next ordinal sequence number for a patient's sessions, starting at 1
    pub async fn next_session_ordinal(&self, patient_id: &str) -> Result<i32> {
        let next: i32 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(MAX(ordinal), 0) + 1
            FROM sessions
            WHERE patient_id = $1
            "#,
        )
        .bind(patient_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(next)
    }

    /// Insert a session record
    pub async fn create_session(&self, session: &DbSession) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, patient_id, ordinal, session_date, start_time, game)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&session.id)
        .bind(&session.patient_id)
        .bind(session.ordinal)
        .bind(session.session_date)
        .bind(session.start_time)
        .bind(&session.game)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a session by id
    pub async fn get_session(&self, session_id: &str) -> Result<Option<DbSession>> {
        let session = sqlx::query_as::<_, DbSession>(
            r#"
            SELECT id, patient_id, ordinal, session_date, start_time, game, created_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Get all sessions for a patient, newest first
    pub async fn get_sessions_for_patient(&self, patient_id: &str) -> Result<Vec<DbSession>> {
        let sessions = sqlx::query_as::<_, DbSession>(
            r#"
            SELECT id, patient_id, ordinal, session_date, start_time, game, created_at
            FROM sessions
            WHERE patient_id = $1
            ORDER BY session_date DESC, start_time DESC
            "#,
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    // === Session Comment Repository ===

    /// Append a therapist comment to a session
    pub async fn insert_comment(&self, comment: &DbSessionComment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO session_comments (id, session_id, author_id, body)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(comment.id)
        .bind(&comment.session_id)
        .bind(comment.author_id)
        .bind(&comment.body)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get all comments for a session, oldest first
    pub async fn get_comments_for_session(
        &self,
        session_id: &str,
    ) -> Result<Vec<DbSessionComment>> {
        let comments = sqlx::query_as::<_, DbSessionComment>(
            r#"
            SELECT id, session_id, author_id, body, created_at
            FROM session_comments
            WHERE session_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    // === Game Result Repository ===

    /// Upsert a game-result document under its result key
    pub async fn upsert_game_result(
        &self,
        result_key: &str,
        patient_id: &str,
        payload: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO game_results (result_key, patient_id, payload, recorded_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (result_key) DO UPDATE SET
                patient_id = EXCLUDED.patient_id,
                payload = EXCLUDED.payload,
                recorded_at = NOW()
            "#,
        )
        .bind(result_key)
        .bind(patient_id)
        .bind(payload)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All result documents for a patient as the key-to-result map the
    /// aggregator consumes. Rows whose payload no longer decodes are
    /// skipped with a warning.
    pub async fn results_for_patient(
        &self,
        patient_id: &str,
    ) -> Result<HashMap<String, SessionResult>> {
        let rows = sqlx::query_as::<_, DbGameResult>(
            r#"
            SELECT result_key, patient_id, payload, recorded_at
            FROM game_results
            WHERE patient_id = $1
            "#,
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;

        let mut results = HashMap::with_capacity(rows.len());
        for row in rows {
            match row.decode() {
                Ok(result) => {
                    results.insert(row.result_key, result);
                }
                Err(e) => {
                    tracing::warn!("Skipping undecodable result {}: {}", row.result_key, e);
                }
            }
        }

        Ok(results)
    }
}
