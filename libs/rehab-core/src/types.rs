//! Core types for the rehab clinic admin panel.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{IdError, Result};

/// Patient lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientStatus {
    Active,
    Paused,
    Completed,
}

impl Default for PatientStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl PatientStatus {
    /// Get the status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Serious-game modality a session was played in.
///
/// The string values match what the games write into the result store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameKind {
    AppleGame,
    FingerDance,
}

impl GameKind {
    /// Get the game kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppleGame => "appleGame",
            Self::FingerDance => "fingerDance",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "appleGame" => Some(Self::AppleGame),
            "fingerDance" => Some(Self::FingerDance),
            _ => None,
        }
    }
}

/// Hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    Left,
    Right,
}

/// Named finger. Telemetry records fingers as raw indices; the physical
/// layout maps 1 to the thumb through 5 to the pinky on either hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// Map a raw 1-5 telemetry index to the named finger.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Self::Thumb),
            2 => Some(Self::Index),
            3 => Some(Self::Middle),
            4 => Some(Self::Ring),
            5 => Some(Self::Pinky),
            _ => None,
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Thumb => "thumb",
            Self::Index => "index",
            Self::Middle => "middle",
            Self::Ring => "ring",
            Self::Pinky => "pinky",
        }
    }
}

/// A patient record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub diagnosis: String,
    pub affected_limb: String,
    pub rom_limit_degrees: f64,
    pub status: PatientStatus,
}

/// One timed therapy activity instance performed by a patient.
///
/// Immutable once created, apart from therapist commentary which lives
/// outside this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Generated identifier, `{patient_id}_{ordinal}`.
    pub id: String,
    pub patient_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub game: GameKind,
}

/// Synthesize a session id from a patient id and ordinal sequence number.
pub fn session_id(patient_id: &str, ordinal: u32) -> String {
    format!("{}_{}", patient_id, ordinal)
}

/// Recover the ordinal sequence number from a session id.
pub fn session_ordinal(id: &str) -> Result<u32> {
    let (_, suffix) = id
        .rsplit_once('_')
        .ok_or_else(|| IdError::MissingOrdinal { id: id.to_string() })?;
    suffix.parse().map_err(|_| IdError::InvalidOrdinal {
        id: id.to_string(),
        value: suffix.to_string(),
    })
}

/// One leveled activity outcome recorded during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub activity: String,
    pub level: u32,
    pub percent: f64,
    pub timestamp: DateTime<Utc>,
}

/// One note of a finger-dance run. `finger` keeps the raw 1-5 index the
/// game records; out-of-range indices are skipped during aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub hand: Hand,
    pub finger: u8,
    pub hit: bool,
}

/// A range-of-motion reading for one finger, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RomReading {
    pub hand: Hand,
    pub finger: u8,
    pub degrees: f64,
}

/// Recorded outcome of an apple-game (reach/grasp) session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppleGameResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
    pub mistakes: u32,
    #[serde(default)]
    pub history: Vec<ActivityEntry>,
    #[serde(default)]
    pub rom: Vec<RomReading>,
}

/// Recorded outcome of a finger-dance (dexterity) session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerDanceResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
    pub combo: u32,
    #[serde(default)]
    pub notes: Vec<NoteRecord>,
    #[serde(default)]
    pub rom: Vec<RomReading>,
}

/// Recorded outcome data for one session, discriminated by game modality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SessionResult {
    #[serde(rename = "appleGame")]
    AppleGame(AppleGameResult),
    #[serde(rename = "fingerDance")]
    FingerDance(FingerDanceResult),
}

impl SessionResult {
    /// The modality this result belongs to.
    pub fn kind(&self) -> GameKind {
        match self {
            Self::AppleGame(_) => GameKind::AppleGame,
            Self::FingerDance(_) => GameKind::FingerDance,
        }
    }

    /// Leveled activity history, empty for modalities that record none.
    pub fn history(&self) -> &[ActivityEntry] {
        match self {
            Self::AppleGame(r) => &r.history,
            Self::FingerDance(_) => &[],
        }
    }

    /// Range-of-motion readings carried by this result.
    pub fn rom(&self) -> &[RomReading] {
        match self {
            Self::AppleGame(r) => &r.rom,
            Self::FingerDance(r) => &r.rom,
        }
    }
}

/// Hit/miss accuracy for one finger. Fingers with no recorded attempts
/// never appear, so absence is distinguishable from a 0% entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerPerformance {
    pub hand: Hand,
    pub finger: Finger,
    pub hits: u32,
    pub misses: u32,
    pub accuracy: u8,
}

/// Success rate for one difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
    pub success_rate: u8,
    pub attempts: usize,
}

/// Session count and mean score for one ISO calendar week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyProgress {
    /// ISO week label, e.g. `2026-W05`.
    pub week: String,
    pub sessions: usize,
    pub average_score: u32,
}

/// Average range of motion for one finger across all matched results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RomSummary {
    pub hand: Hand,
    pub finger: Finger,
    pub average_degrees: f64,
    pub samples: usize,
}

/// Aggregate performance view for one patient, computed on demand from
/// the session and result collections. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_sessions: usize,
    pub average_score: u32,
    pub best_score: u32,
    pub improvement_trend: i32,
    pub finger_performance: Vec<FingerPerformance>,
    pub difficulty_progress: Vec<LevelProgress>,
    pub weekly_progress: Vec<WeeklyProgress>,
    pub rom_analysis: Vec<RomSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn session_id_round_trip() {
        let id = session_id("p1", 3);
        assert_eq!(id, "p1_3");
        assert_eq!(session_ordinal(&id).unwrap(), 3);
    }

    #[test]
    fn session_ordinal_accepts_underscored_patient_ids() {
        // Only the final suffix is the ordinal.
        assert_eq!(session_ordinal("ward_7_p1_12").unwrap(), 12);
    }

    #[test]
    fn session_ordinal_rejects_missing_suffix() {
        assert!(matches!(
            session_ordinal("p1"),
            Err(IdError::MissingOrdinal { .. })
        ));
    }

    #[test]
    fn session_ordinal_rejects_non_numeric_suffix() {
        assert!(matches!(
            session_ordinal("p1_abc"),
            Err(IdError::InvalidOrdinal { .. })
        ));
    }

    #[test]
    fn finger_index_mapping() {
        assert_eq!(Finger::from_index(1), Some(Finger::Thumb));
        assert_eq!(Finger::from_index(5), Some(Finger::Pinky));
        assert_eq!(Finger::from_index(0), None);
        assert_eq!(Finger::from_index(6), None);
    }

    #[test]
    fn game_kind_strings_match_store_values() {
        assert_eq!(GameKind::AppleGame.as_str(), "appleGame");
        assert_eq!(
            GameKind::from_str("fingerDance"),
            Some(GameKind::FingerDance)
        );
        assert_eq!(GameKind::from_str("tetris"), None);
    }

    #[test]
    fn session_result_kind_tag_round_trips() {
        let result = SessionResult::FingerDance(FingerDanceResult {
            score: Some(85.0),
            success_rate: None,
            combo: 12,
            notes: vec![NoteRecord {
                hand: Hand::Right,
                finger: 2,
                hit: true,
            }],
            rom: vec![],
        });

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "fingerDance");

        let back: SessionResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
