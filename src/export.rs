//! Flat CSV projection of sessions and their sets.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::SessionWithSets;

pub const CSV_HEADER: [&str; 11] = [
    "session_id",
    "date",
    "notes",
    "owner_user_id",
    "set_id",
    "distance_m",
    "reps",
    "interval_sec",
    "stroke",
    "rpe",
    "rep_times_sec",
];

/// One CSV line. Set columns are empty on the placeholder row of a session
/// without sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvRow {
    pub session_id: i64,
    pub date: NaiveDate,
    pub notes: String,
    pub owner_user_id: Option<i64>,
    pub set_id: Option<i64>,
    pub distance_m: Option<u32>,
    pub reps: Option<u32>,
    pub interval_sec: Option<u32>,
    pub stroke: String,
    pub rpe: String,
    pub rep_times_sec: String,
}

fn join(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn rows_for_session(record: &SessionWithSets) -> Vec<CsvRow> {
    let session = &record.session;
    let base = CsvRow {
        session_id: session.id,
        date: session.date,
        notes: session.notes.clone().unwrap_or_default(),
        owner_user_id: session.user_id,
        set_id: None,
        distance_m: None,
        reps: None,
        interval_sec: None,
        stroke: String::new(),
        rpe: String::new(),
        rep_times_sec: String::new(),
    };

    if record.sets.is_empty() {
        return vec![base];
    }

    record
        .sets
        .iter()
        .map(|set| CsvRow {
            set_id: Some(set.id),
            distance_m: Some(set.distance_m),
            reps: Some(set.reps),
            interval_sec: Some(set.interval_sec),
            stroke: set.stroke.clone(),
            rpe: join(&set.rpe),
            rep_times_sec: join(&set.rep_times_sec),
            ..base.clone()
        })
        .collect()
}

/// Render rows as CSV text. The header is written even when `rows` is empty.
pub fn write_csv(rows: &[CsvRow]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    let to_internal = |e: csv::Error| AppError::Internal(format!("CSV write failed: {}", e));

    writer.write_record(CSV_HEADER).map_err(to_internal)?;
    for row in rows {
        writer.serialize(row).map_err(to_internal)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(e.to_string()))
}

pub fn session_filename(session_id: i64) -> String {
    format!("session_{}.csv", session_id)
}

pub fn range_filename(start: NaiveDate, end: NaiveDate) -> String {
    format!("sessions_{}_{}.csv", start, end)
}
