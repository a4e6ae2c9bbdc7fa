//! Derived figures over sessions and sets: totals, pace summaries, per-stroke
//! breakdowns, best set, and multi-session roll-ups.
//!
//! Everything here is a pure function of the records passed in. Sums stay
//! unrounded; rounding to two decimals happens once, on the value returned.

pub mod pace;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{SessionWithSets, SwimSet};

pub use pace::{format_seconds, mean2, pace_per, round2, DEFAULT_PACE_BASIS_M};

/// Bucket for sets stored without a stroke label.
pub const UNKNOWN_STROKE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionTotals {
    pub total_sets: usize,
    pub total_distance_m: f64,
    pub total_reps: u64,
    pub avg_rpe: Option<f64>,
    pub avg_rep_time_sec: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaceSummary {
    pub total_distance_m: f64,
    pub avg_rpe: Option<f64>,
    pub avg_pace_sec_per: Option<f64>,
    pub pace_basis_m: u32,
    pub avg_pace_formatted: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrokeBreakdown {
    pub total_distance_m: f64,
    pub total_time_sec: f64,
    pub avg_pace_sec_per: Option<f64>,
    pub avg_pace_formatted: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestSet {
    pub set_id: i64,
    pub stroke: String,
    pub distance_m: u32,
    pub reps: u32,
    pub total_distance_m: f64,
    pub total_time_sec: f64,
    pub pace_sec_per: f64,
    pub pace_basis_m: u32,
    pub pace_formatted: Option<String>,
}

/// Roll-up over any number of sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSummary {
    /// Sessions passed in, including ones without sets.
    pub sessions: usize,
    #[serde(flatten)]
    pub summary: PaceSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionDetail {
    pub id: i64,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub sets: Vec<SwimSet>,
    pub totals: SessionTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionAnalytics {
    pub detail: SessionDetail,
    pub summary: PaceSummary,
    pub by_stroke: BTreeMap<String, StrokeBreakdown>,
    pub best_set: Option<BestSet>,
}

/// One dashboard line: session identity plus its pace summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardRow {
    pub id: i64,
    pub date: NaiveDate,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub summary: PaceSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub swimmer_id: i64,
    pub email: String,
    pub username: Option<String>,
    #[serde(flatten)]
    pub rollup: RangeSummary,
}

#[derive(Debug, Default)]
struct Accumulator {
    sets: usize,
    reps: u64,
    distance_m: f64,
    time_sec: f64,
    rep_times: usize,
    rpe_sum: f64,
    rpe_count: usize,
}

impl Accumulator {
    fn over<'a>(sets: impl IntoIterator<Item = &'a SwimSet>) -> Self {
        let mut acc = Self::default();
        for set in sets {
            acc.add(set);
        }
        acc
    }

    fn add(&mut self, set: &SwimSet) {
        self.sets += 1;
        self.reps += u64::from(set.reps);
        self.distance_m += set.total_distance_m();
        self.time_sec += set.total_time_sec();
        self.rep_times += set.rep_times_sec.len();
        self.rpe_sum += set.rpe.iter().map(|&r| f64::from(r)).sum::<f64>();
        self.rpe_count += set.rpe.len();
    }

    fn avg_pace(&self, basis_m: u32) -> Option<f64> {
        pace_per(self.distance_m, self.time_sec, f64::from(basis_m)).map(round2)
    }

    fn summary(&self, basis_m: u32) -> PaceSummary {
        let avg_pace = self.avg_pace(basis_m);
        PaceSummary {
            total_distance_m: self.distance_m,
            avg_rpe: mean2(self.rpe_sum, self.rpe_count),
            avg_pace_sec_per: avg_pace,
            pace_basis_m: basis_m,
            avg_pace_formatted: format_seconds(avg_pace),
        }
    }
}

pub fn session_totals(sets: &[SwimSet]) -> SessionTotals {
    let acc = Accumulator::over(sets);
    SessionTotals {
        total_sets: acc.sets,
        total_distance_m: acc.distance_m,
        total_reps: acc.reps,
        avg_rpe: mean2(acc.rpe_sum, acc.rpe_count),
        avg_rep_time_sec: mean2(acc.time_sec, acc.rep_times),
    }
}

pub fn session_summary(sets: &[SwimSet], basis_m: u32) -> PaceSummary {
    Accumulator::over(sets).summary(basis_m)
}

/// Pace per stroke label, each stroke computed on its own sets only.
pub fn stroke_breakdown(sets: &[SwimSet], basis_m: u32) -> BTreeMap<String, StrokeBreakdown> {
    let mut groups: BTreeMap<String, Accumulator> = BTreeMap::new();
    for set in sets {
        let key = match set.stroke.trim() {
            "" => UNKNOWN_STROKE.to_string(),
            stroke => stroke.to_string(),
        };
        groups.entry(key).or_default().add(set);
    }

    groups
        .into_iter()
        .map(|(stroke, acc)| {
            let avg_pace = acc.avg_pace(basis_m);
            let breakdown = StrokeBreakdown {
                total_distance_m: acc.distance_m,
                total_time_sec: acc.time_sec,
                avg_pace_sec_per: avg_pace,
                avg_pace_formatted: format_seconds(avg_pace),
            };
            (stroke, breakdown)
        })
        .collect()
}

/// Fastest set by its own pace. Sets without distance or time are skipped;
/// equal paces go to the lowest set id.
pub fn best_set(sets: &[SwimSet], basis_m: u32) -> Option<BestSet> {
    let mut ordered: Vec<&SwimSet> = sets.iter().collect();
    ordered.sort_by_key(|set| set.id);

    let mut best: Option<(f64, &SwimSet)> = None;
    for set in ordered {
        let distance = set.total_distance_m();
        let time = set.total_time_sec();
        if distance <= 0.0 || time <= 0.0 {
            continue;
        }
        let Some(pace) = pace_per(distance, time, f64::from(basis_m)) else {
            continue;
        };
        if best.map_or(true, |(fastest, _)| pace < fastest) {
            best = Some((pace, set));
        }
    }

    best.map(|(pace, set)| {
        let rounded = round2(pace);
        BestSet {
            set_id: set.id,
            stroke: set.stroke.clone(),
            distance_m: set.distance_m,
            reps: set.reps,
            total_distance_m: set.total_distance_m(),
            total_time_sec: set.total_time_sec(),
            pace_sec_per: rounded,
            pace_basis_m: basis_m,
            pace_formatted: format_seconds(Some(rounded)),
        }
    })
}

/// Roll up every set of every session into one summary.
pub fn summarise_sessions(sessions: &[SessionWithSets], basis_m: u32) -> RangeSummary {
    let acc = Accumulator::over(sessions.iter().flat_map(|s| s.sets.iter()));
    RangeSummary {
        sessions: sessions.len(),
        summary: acc.summary(basis_m),
    }
}

pub fn session_detail(record: &SessionWithSets) -> SessionDetail {
    SessionDetail {
        id: record.session.id,
        date: record.session.date,
        notes: record.session.notes.clone(),
        sets: record.sets.clone(),
        totals: session_totals(&record.sets),
    }
}

/// Detail, summary, stroke breakdown, and best set from one snapshot, all at
/// the same pace basis.
pub fn session_analytics(record: &SessionWithSets, basis_m: u32) -> SessionAnalytics {
    SessionAnalytics {
        detail: session_detail(record),
        summary: session_summary(&record.sets, basis_m),
        by_stroke: stroke_breakdown(&record.sets, basis_m),
        best_set: best_set(&record.sets, basis_m),
    }
}

pub fn dashboard_row(record: &SessionWithSets, basis_m: u32) -> DashboardRow {
    DashboardRow {
        id: record.session.id,
        date: record.session.date,
        notes: record.session.notes.clone(),
        summary: session_summary(&record.sets, basis_m),
    }
}

/// Order by total distance, highest first; ties by swimmer id.
pub fn rank_by_distance(rows: &mut [LeaderboardRow]) {
    rows.sort_by(|a, b| {
        b.rollup
            .summary
            .total_distance_m
            .total_cmp(&a.rollup.summary.total_distance_m)
            .then(a.swimmer_id.cmp(&b.swimmer_id))
    });
}
