//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up test environment with database
//! - Helper functions for creating test data
//! - Authentication helpers
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL env var).

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use uuid::Uuid;

use rehab_panel_backend::db::Database;
use rehab_panel_backend::models::Role;
use rehab_panel_backend::{build_router, AppState};

/// Test context containing database connection and test server.
///
/// Use this to set up integration tests with a real database connection.
/// Requires DATABASE_URL environment variable to be set.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);
        let state = AppState { db: db.clone() };
        let app = build_router(state);

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test staff account and return its ID and token.
    pub async fn create_test_user(&self, role: Role) -> (Uuid, String) {
        let user = self
            .db
            .create_user(None, role)
            .await
            .expect("Failed to create test user");
        (user.id, user.token)
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Clean up a patient and everything hanging off it.
    ///
    /// Call this after tests to remove test data.
    pub async fn cleanup_patient(&self, patient_id: &str) {
        // Delete in order due to foreign keys
        let _ = sqlx::query(
            "DELETE FROM session_comments WHERE session_id IN \
             (SELECT id FROM sessions WHERE patient_id = $1)",
        )
        .bind(patient_id)
        .execute(self.db.pool())
        .await;

        let _ = sqlx::query("DELETE FROM game_results WHERE patient_id = $1")
            .bind(patient_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM sessions WHERE patient_id = $1")
            .bind(patient_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(patient_id)
            .execute(self.db.pool())
            .await;
    }

    /// Clean up a staff account.
    pub async fn cleanup_user(&self, user_id: Uuid) {
        let _ = sqlx::query("DELETE FROM session_comments WHERE author_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }
}
