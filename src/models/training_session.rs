use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{FromSqliteRow, SwimSet};

pub const MAX_NOTES_LEN: usize = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSession {
    pub id: i64,
    pub date: NaiveDate,
    pub notes: Option<String>,
    /// Owning user; `None` for unowned legacy sessions.
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for TrainingSession {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            notes: row.get("notes")?,
            user_id: row.get("user_id")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// A session together with its sets, loaded in one read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionWithSets {
    #[serde(flatten)]
    pub session: TrainingSession,
    pub sets: Vec<SwimSet>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSession {
    pub date: NaiveDate,
    pub notes: Option<String>,
}

impl CreateSession {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        match &self.notes {
            Some(notes) if notes.chars().count() > MAX_NOTES_LEN => Err(vec![format!(
                "notes must be at most {} characters",
                MAX_NOTES_LEN
            )]),
            _ => Ok(()),
        }
    }
}

/// Minimal echo returned after creating a session.
#[derive(Debug, Serialize)]
pub struct CreatedSession {
    pub id: i64,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

impl From<&TrainingSession> for CreatedSession {
    fn from(session: &TrainingSession) -> Self {
        Self {
            id: session.id,
            date: session.date,
            notes: session.notes.clone(),
        }
    }
}
