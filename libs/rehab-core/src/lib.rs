//! Core domain library shared by the rehab admin panel backend.
//!
//! Provides:
//! - Patient, session and game-result data model
//! - Session-to-result key resolution (dual-key store convention)
//! - Performance-metrics aggregation for the analytics views

pub mod error;
pub mod metrics;
pub mod resolver;
pub mod types;

pub use error::{IdError, Result};
pub use metrics::{compute_metrics, MetricsOptions, TrendWindow};
pub use resolver::{resolve_result, result_keys};
pub use types::{
    ActivityEntry, AppleGameResult, Finger, FingerDanceResult, FingerPerformance, GameKind, Hand,
    LevelProgress, NoteRecord, Patient, PatientStatus, PerformanceMetrics, RomReading, RomSummary,
    Session, SessionResult, WeeklyProgress,
};
