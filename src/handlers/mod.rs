pub mod auth;
pub mod coach;
pub mod exports;
pub mod sessions;
pub mod system;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::analytics::DEFAULT_PACE_BASIS_M;
use crate::error::{AppError, Result};

pub const MAX_LIST_LIMIT: u32 = 500;

#[derive(Debug, Default, Deserialize)]
pub struct PaceQuery {
    pub pace_per_m: Option<u32>,
}

impl PaceQuery {
    pub fn basis(&self) -> u32 {
        self.pace_per_m.unwrap_or(DEFAULT_PACE_BASIS_M)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub limit: Option<u32>,
    pub pace_per_m: Option<u32>,
}

impl DashboardQuery {
    pub fn basis(&self) -> u32 {
        self.pace_per_m.unwrap_or(DEFAULT_PACE_BASIS_M)
    }

    pub fn limit(&self) -> Result<Option<u32>> {
        check_bound("limit", self.limit, MAX_LIST_LIMIT)
    }
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub pace_per_m: Option<u32>,
    /// Honoured for coaches only.
    pub swimmer_id: Option<i64>,
}

impl RangeQuery {
    pub fn basis(&self) -> u32 {
        self.pace_per_m.unwrap_or(DEFAULT_PACE_BASIS_M)
    }

    /// Both ends are inclusive; a reversed window is a client error.
    pub fn window(&self) -> Result<(NaiveDate, NaiveDate)> {
        if self.end < self.start {
            return Err(AppError::BadRequest("end must be >= start".to_string()));
        }
        Ok((self.start, self.end))
    }
}

/// `Some(v)` must fall within `1..=max`.
pub(crate) fn check_bound(name: &str, value: Option<u32>, max: u32) -> Result<Option<u32>> {
    match value {
        Some(v) if v < 1 || v > max => Err(AppError::Validation(vec![format!(
            "{} must be between 1 and {} (got {})",
            name, max, v
        )])),
        other => Ok(other),
    }
}
