//! Session-to-result lookup.
//!
//! Result documents are not keyed by the session id directly. The games
//! derive the document key from the session id, and the two modalities
//! disagree on the form: most records use `{patient}_results_{n}`, older
//! ones `{patient}_result_{n}`. Both forms are valid lookups; when both
//! exist the plural form wins. Key synthesis lives here so call sites
//! cannot drift apart on the convention.

use std::collections::HashMap;

use crate::types::{session_ordinal, Session, SessionResult};

/// Candidate result keys for a session, `(plural, singular)`.
///
/// Returns `None` when the session id carries no parseable ordinal
/// suffix; such a session can never match a result document.
pub fn result_keys(session: &Session) -> Option<(String, String)> {
    let ordinal = session_ordinal(&session.id).ok()?;
    Some((
        format!("{}_results_{}", session.patient_id, ordinal),
        format!("{}_result_{}", session.patient_id, ordinal),
    ))
}

/// Look up the result for a session, trying the plural key first.
pub fn resolve_result<'a>(
    session: &Session,
    results: &'a HashMap<String, SessionResult>,
) -> Option<&'a SessionResult> {
    let (plural, singular) = result_keys(session)?;
    results.get(&plural).or_else(|| results.get(&singular))
}
