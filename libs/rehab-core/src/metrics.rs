//! Performance-metrics aggregation.
//!
//! A pure pass over one patient's sessions and matched result documents.
//! Missing or partial data degrades the affected sub-metric to zero or an
//! empty list; nothing in here errors or panics. Identical inputs always
//! produce identical output, independent of input ordering.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;

use crate::resolver::resolve_result;
use crate::types::{
    Finger, FingerPerformance, Hand, LevelProgress, PerformanceMetrics, RomSummary, Session,
    SessionResult, WeeklyProgress,
};

/// Window used when comparing early sessions against recent ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendWindow {
    /// Compare the earliest third against the latest third (at least one
    /// session each).
    Thirds,
    /// Compare fixed-size windows of `n` sessions.
    Fixed(usize),
}

/// Aggregation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsOptions {
    pub trend_window: TrendWindow,
}

impl Default for MetricsOptions {
    fn default() -> Self {
        Self {
            trend_window: TrendWindow::Thirds,
        }
    }
}

/// Aggregate one patient's sessions and result documents into the
/// metrics view the analytics screens bind to.
pub fn compute_metrics(
    sessions: &[Session],
    results: &HashMap<String, SessionResult>,
    options: &MetricsOptions,
) -> PerformanceMetrics {
    // Chronological order drives the trend windows; the id tiebreak keeps
    // the output stable when two sessions share a timestamp.
    let mut ordered: Vec<&Session> = sessions.iter().collect();
    ordered.sort_by(|a, b| {
        (a.date, a.start_time, &a.id).cmp(&(b.date, b.start_time, &b.id))
    });

    let resolved: Vec<(&Session, Option<&SessionResult>)> = ordered
        .iter()
        .map(|s| (*s, resolve_result(s, results)))
        .collect();

    let scores: Vec<f64> = resolved
        .iter()
        .filter_map(|(_, result)| result.and_then(session_score))
        .collect();

    let average_score = mean(scores.iter().copied()).map(round_score).unwrap_or(0);
    let best_score = scores
        .iter()
        .copied()
        .fold(None, |best: Option<f64>, v| {
            Some(best.map_or(v, |b| b.max(v)))
        })
        .map(round_score)
        .unwrap_or(0);

    PerformanceMetrics {
        total_sessions: sessions.len(),
        average_score,
        best_score,
        improvement_trend: improvement_trend(&scores, options.trend_window),
        finger_performance: finger_performance(&resolved),
        difficulty_progress: difficulty_progress(&resolved),
        weekly_progress: weekly_progress(&resolved),
        rom_analysis: rom_analysis(&resolved),
    }
}

/// Numeric score for one result: explicit score, else success rate, else
/// the mean of the history percentages. A present but non-finite value
/// leaves the session unscored rather than falling through.
fn session_score(result: &SessionResult) -> Option<f64> {
    let (score, success_rate) = match result {
        SessionResult::AppleGame(r) => (r.score, r.success_rate),
        SessionResult::FingerDance(r) => (r.score, r.success_rate),
    };

    if let Some(v) = score {
        return v.is_finite().then_some(v);
    }
    if let Some(v) = success_rate {
        return v.is_finite().then_some(v);
    }
    mean(
        result
            .history()
            .iter()
            .map(|e| e.percent)
            .filter(|p| p.is_finite()),
    )
}

/// Signed score delta between the latest and earliest window of the
/// chronologically ordered scores. Zero when fewer than 2 scores exist.
fn improvement_trend(scores: &[f64], window: TrendWindow) -> i32 {
    if scores.len() < 2 {
        return 0;
    }

    let width = match window {
        TrendWindow::Thirds => (scores.len() / 3).max(1),
        TrendWindow::Fixed(n) => n.clamp(1, scores.len()),
    };

    let earliest = mean(scores[..width].iter().copied()).unwrap_or(0.0);
    let latest = mean(scores[scores.len() - width..].iter().copied()).unwrap_or(0.0);
    (latest - earliest).round() as i32
}

/// Hit/miss accuracy per finger across every note of every matched
/// finger-dance result. Fingers with no attempts are omitted.
fn finger_performance(
    resolved: &[(&Session, Option<&SessionResult>)],
) -> Vec<FingerPerformance> {
    let mut tallies: BTreeMap<(Hand, Finger), (u32, u32)> = BTreeMap::new();

    for (_, result) in resolved {
        let Some(SessionResult::FingerDance(r)) = result else {
            continue;
        };
        for note in &r.notes {
            let Some(finger) = Finger::from_index(note.finger) else {
                continue;
            };
            let (hits, misses) = tallies.entry((note.hand, finger)).or_default();
            if note.hit {
                *hits += 1;
            } else {
                *misses += 1;
            }
        }
    }

    tallies
        .into_iter()
        .map(|((hand, finger), (hits, misses))| FingerPerformance {
            hand,
            finger,
            hits,
            misses,
            accuracy: (100.0 * f64::from(hits) / f64::from(hits + misses)).round() as u8,
        })
        .collect()
}

/// Mean success percentage per difficulty level across all matched
/// leveled histories.
fn difficulty_progress(
    resolved: &[(&Session, Option<&SessionResult>)],
) -> Vec<LevelProgress> {
    let mut levels: BTreeMap<u32, Vec<f64>> = BTreeMap::new();

    for (_, result) in resolved {
        let Some(result) = result else { continue };
        for entry in result.history() {
            if entry.percent.is_finite() {
                levels.entry(entry.level).or_default().push(entry.percent);
            }
        }
    }

    levels
        .into_iter()
        .filter_map(|(level, percents)| {
            mean(percents.iter().copied()).map(|avg| LevelProgress {
                level,
                success_rate: avg.round().clamp(0.0, 255.0) as u8,
                attempts: percents.len(),
            })
        })
        .collect()
}

/// Session count and mean score per ISO calendar week. Weeks without
/// sessions never appear; a week whose sessions all lack scores reports
/// an average of zero.
fn weekly_progress(
    resolved: &[(&Session, Option<&SessionResult>)],
) -> Vec<WeeklyProgress> {
    let mut weeks: BTreeMap<(i32, u32), (usize, Vec<f64>)> = BTreeMap::new();

    for (session, result) in resolved {
        let iso = session.date.iso_week();
        let (count, scores) = weeks.entry((iso.year(), iso.week())).or_default();
        *count += 1;
        if let Some(score) = result.and_then(session_score) {
            scores.push(score);
        }
    }

    weeks
        .into_iter()
        .map(|((year, week), (sessions, scores))| WeeklyProgress {
            week: format!("{}-W{:02}", year, week),
            sessions,
            average_score: mean(scores.iter().copied()).map(round_score).unwrap_or(0),
        })
        .collect()
}

/// Average range of motion per finger across every reading of every
/// matched result. Fingers absent from all records are omitted.
fn rom_analysis(resolved: &[(&Session, Option<&SessionResult>)]) -> Vec<RomSummary> {
    let mut readings: BTreeMap<(Hand, Finger), (f64, usize)> = BTreeMap::new();

    for (_, result) in resolved {
        let Some(result) = result else { continue };
        for reading in result.rom() {
            if !reading.degrees.is_finite() {
                continue;
            }
            let Some(finger) = Finger::from_index(reading.finger) else {
                continue;
            };
            let (sum, count) = readings.entry((reading.hand, finger)).or_default();
            *sum += reading.degrees;
            *count += 1;
        }
    }

    readings
        .into_iter()
        .map(|((hand, finger), (sum, samples))| RomSummary {
            hand,
            finger,
            average_degrees: sum / samples as f64,
            samples,
        })
        .collect()
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

fn round_score(value: f64) -> u32 {
    value.round().max(0.0) as u32
}
