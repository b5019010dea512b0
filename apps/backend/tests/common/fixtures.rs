//! Test fixtures and factory functions for creating test data.

use chrono::{NaiveDate, NaiveTime};
use serde_json::{json, Value};

use rehab_panel_backend::models::{CreatePatientRequest, CreateSessionRequest, GameKind};

/// Create a patient request with sensible clinical defaults.
pub fn patient_request(name: &str) -> CreatePatientRequest {
    CreatePatientRequest {
        name: name.to_string(),
        age: 54,
        diagnosis: "post-stroke hemiparesis".to_string(),
        affected_limb: "right hand".to_string(),
        rom_limit_degrees: 60.0,
        status: None,
    }
}

/// Create a session request for the given date and hour.
pub fn session_request(date: &str, hour: u32, game: GameKind) -> CreateSessionRequest {
    CreateSessionRequest {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date"),
        start_time: NaiveTime::from_hms_opt(hour, 0, 0).expect("valid time"),
        game,
    }
}

/// Apple-game result document with an explicit score.
pub fn apple_result(score: f64) -> Value {
    json!({
        "kind": "appleGame",
        "score": score,
        "mistakes": 2,
        "history": [],
        "rom": [],
    })
}

/// Finger-dance result document: `hits` hits then `misses` misses on one
/// finger of the right hand.
pub fn finger_dance_result(finger: u8, hits: usize, misses: usize) -> Value {
    let mut notes = Vec::new();
    for _ in 0..hits {
        notes.push(json!({"hand": "right", "finger": finger, "hit": true}));
    }
    for _ in 0..misses {
        notes.push(json!({"hand": "right", "finger": finger, "hit": false}));
    }
    json!({
        "kind": "fingerDance",
        "combo": 4,
        "notes": notes,
        "rom": [],
    })
}
