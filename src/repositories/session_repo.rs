use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension};

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, NewSet, SessionWithSets, SwimSet, TrainingSession};

/// Training sessions and the sets inside them.
#[derive(Clone)]
pub struct SessionRepository {
    pool: DbPool,
}

impl SessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create_session(
        &self,
        date: NaiveDate,
        notes: Option<String>,
        owner_id: Option<i64>,
    ) -> Result<TrainingSession> {
        let pool = self.pool.clone();
        let now = Utc::now();
        let stored_notes = notes.clone();

        let id = tokio::task::spawn_blocking(move || -> Result<i64> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO sessions (date, notes, user_id, created_at) VALUES (?, ?, ?, ?)",
                rusqlite::params![date, stored_notes, owner_id, now],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(TrainingSession {
            id,
            date,
            notes,
            user_id: owner_id,
            created_at: now,
        })
    }

    /// A session with its sets, read on one connection.
    pub async fn load_session(&self, id: i64) -> Result<Option<SessionWithSets>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            match find_session(&conn, id)? {
                Some(session) => {
                    let sets = sets_for(&conn, session.id)?;
                    Ok(Some(SessionWithSets { session, sets }))
                }
                None => Ok(None),
            }
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Newest first. `owner` narrows to one user's sessions.
    pub async fn list_sessions(
        &self,
        owner: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<SessionWithSets>> {
        let pool = self.pool.clone();
        // SQLite treats a negative LIMIT as no limit.
        let limit = limit.map(i64::from).unwrap_or(-1);

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM sessions
                 WHERE (?1 IS NULL OR user_id = ?1)
                 ORDER BY date DESC, id DESC
                 LIMIT ?2",
            )?;
            let sessions = stmt
                .query_map(rusqlite::params![owner, limit], TrainingSession::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            with_sets(&conn, sessions)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Sessions dated within `start..=end`, oldest first.
    pub async fn load_sessions_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        owner: Option<i64>,
    ) -> Result<Vec<SessionWithSets>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM sessions
                 WHERE date >= ?1 AND date <= ?2 AND (?3 IS NULL OR user_id = ?3)
                 ORDER BY date ASC, id ASC",
            )?;
            let sessions = stmt
                .query_map(rusqlite::params![start, end, owner], TrainingSession::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            with_sets(&conn, sessions)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn add_set(&self, session_id: i64, set: NewSet) -> Result<SwimSet> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<SwimSet> {
            let conn = pool.get()?;
            if find_session(&conn, session_id)?.is_none() {
                return Err(AppError::NotFound("Session not found.".to_string()));
            }

            let rpe = serde_json::to_string(&set.rpe)
                .map_err(|e| AppError::Internal(e.to_string()))?;
            let rep_times = serde_json::to_string(&set.rep_times_sec)
                .map_err(|e| AppError::Internal(e.to_string()))?;

            conn.execute(
                "INSERT INTO sets (session_id, distance_m, reps, interval_sec, stroke, rpe, rep_times_sec)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    session_id,
                    set.distance_m,
                    set.reps,
                    set.interval_sec,
                    set.stroke.as_str(),
                    rpe,
                    rep_times
                ],
            )?;

            Ok(SwimSet {
                id: conn.last_insert_rowid(),
                session_id,
                distance_m: set.distance_m,
                reps: set.reps,
                interval_sec: set.interval_sec,
                stroke: set.stroke.as_str().to_string(),
                rpe: set.rpe,
                rep_times_sec: set.rep_times_sec,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Delete every set and session. Returns the number of sessions removed.
    pub async fn wipe_all(&self) -> Result<usize> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM sets", [])?;
            let removed = tx.execute("DELETE FROM sessions", [])?;
            tx.commit()?;
            Ok(removed)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn find_session(conn: &Connection, id: i64) -> rusqlite::Result<Option<TrainingSession>> {
    conn.query_row(
        "SELECT * FROM sessions WHERE id = ?",
        [id],
        TrainingSession::from_row,
    )
    .optional()
}

fn sets_for(conn: &Connection, session_id: i64) -> rusqlite::Result<Vec<SwimSet>> {
    let mut stmt = conn.prepare("SELECT * FROM sets WHERE session_id = ? ORDER BY id")?;
    let sets = stmt
        .query_map([session_id], SwimSet::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(sets)
}

fn with_sets(conn: &Connection, sessions: Vec<TrainingSession>) -> Result<Vec<SessionWithSets>> {
    sessions
        .into_iter()
        .map(|session| {
            let sets = sets_for(conn, session.id)?;
            Ok(SessionWithSets { session, sets })
        })
        .collect()
}
