use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::from_row::json_column;
use super::FromSqliteRow;

pub const MAX_DISTANCE_M: u32 = 1500;
pub const MAX_REPS: u32 = 50;
pub const INTERVAL_RANGE_SEC: (u32, u32) = (10, 3600);
pub const REP_TIME_RANGE_SEC: (u32, u32) = (10, 3600);
pub const RPE_RANGE: (u32, u32) = (1, 10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stroke {
    Free,
    Fly,
    Back,
    Breast,
    Im,
}

impl Stroke {
    pub const ALL: [Stroke; 5] = [
        Stroke::Back,
        Stroke::Breast,
        Stroke::Fly,
        Stroke::Free,
        Stroke::Im,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stroke::Free => "free",
            Stroke::Fly => "fly",
            Stroke::Back => "back",
            Stroke::Breast => "breast",
            Stroke::Im => "im",
        }
    }

    /// Case-insensitive, whitespace-tolerant parse.
    pub fn parse(s: &str) -> Option<Self> {
        let normalised = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|stroke| stroke.as_str() == normalised)
    }
}

/// One stored set. `rpe` and `rep_times_sec` run parallel, one entry per rep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwimSet {
    pub id: i64,
    #[serde(skip_serializing)]
    pub session_id: i64,
    pub distance_m: u32,
    pub reps: u32,
    pub interval_sec: u32,
    pub stroke: String,
    pub rpe: Vec<u32>,
    pub rep_times_sec: Vec<u32>,
}

impl SwimSet {
    pub fn total_distance_m(&self) -> f64 {
        f64::from(self.distance_m) * f64::from(self.reps)
    }

    pub fn total_time_sec(&self) -> f64 {
        self.rep_times_sec.iter().map(|&t| f64::from(t)).sum()
    }
}

impl FromSqliteRow for SwimSet {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            session_id: row.get("session_id")?,
            distance_m: row.get("distance_m")?,
            reps: row.get("reps")?,
            interval_sec: row.get("interval_sec")?,
            stroke: row.get("stroke")?,
            rpe: json_column(row, "rpe")?,
            rep_times_sec: json_column(row, "rep_times_sec")?,
        })
    }
}

/// Raw set payload as submitted by a client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSet {
    pub distance_m: u32,
    pub reps: u32,
    pub interval_sec: u32,
    pub stroke: String,
    pub rpe: Vec<u32>,
    pub rep_times_sec: Vec<u32>,
}

/// A set that passed validation; only these reach the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSet {
    pub distance_m: u32,
    pub reps: u32,
    pub interval_sec: u32,
    pub stroke: Stroke,
    pub rpe: Vec<u32>,
    pub rep_times_sec: Vec<u32>,
}

fn within(value: u32, (min, max): (u32, u32)) -> bool {
    (min..=max).contains(&value)
}

impl CreateSet {
    /// Check the whole record at once. Any violation rejects the set; every
    /// violation found is reported.
    pub fn validate(self) -> Result<NewSet, Vec<String>> {
        let mut errors = Vec::new();

        if !within(self.distance_m, (1, MAX_DISTANCE_M)) {
            errors.push(format!(
                "distance_m must be between 1 and {} (got {})",
                MAX_DISTANCE_M, self.distance_m
            ));
        }
        if !within(self.reps, (1, MAX_REPS)) {
            errors.push(format!(
                "reps must be between 1 and {} (got {})",
                MAX_REPS, self.reps
            ));
        }
        if !within(self.interval_sec, INTERVAL_RANGE_SEC) {
            errors.push(format!(
                "interval_sec must be between {} and {} (got {})",
                INTERVAL_RANGE_SEC.0, INTERVAL_RANGE_SEC.1, self.interval_sec
            ));
        }

        let stroke = Stroke::parse(&self.stroke);
        if stroke.is_none() {
            errors.push("stroke must be one of: back, breast, fly, free, im".to_string());
        }

        for (i, &value) in self.rpe.iter().enumerate() {
            if !within(value, RPE_RANGE) {
                errors.push(format!(
                    "rpe number {} must be between {} and {} (got {})",
                    i, RPE_RANGE.0, RPE_RANGE.1, value
                ));
            }
        }
        for (i, &value) in self.rep_times_sec.iter().enumerate() {
            if !within(value, REP_TIME_RANGE_SEC) {
                errors.push(format!(
                    "rep time number {} must be between {} and {} seconds (got {})",
                    i, REP_TIME_RANGE_SEC.0, REP_TIME_RANGE_SEC.1, value
                ));
            }
        }

        let reps = self.reps as usize;
        if self.rpe.len() != reps {
            errors.push(format!(
                "Expected {} RPE inputs, got {}.",
                reps,
                self.rpe.len()
            ));
        }
        if self.rep_times_sec.len() != reps {
            errors.push(format!(
                "Expected {} rep time inputs, got {}.",
                reps,
                self.rep_times_sec.len()
            ));
        }

        match stroke {
            Some(stroke) if errors.is_empty() => Ok(NewSet {
                distance_m: self.distance_m,
                reps: self.reps,
                interval_sec: self.interval_sec,
                stroke,
                rpe: self.rpe,
                rep_times_sec: self.rep_times_sec,
            }),
            _ => Err(errors),
        }
    }
}

/// Minimal echo returned after appending a set.
#[derive(Debug, Serialize)]
pub struct CreatedSet {
    pub id: i64,
    pub session_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateSet {
        CreateSet {
            distance_m: 100,
            reps: 4,
            interval_sec: 90,
            stroke: "free".to_string(),
            rpe: vec![5, 6, 6, 5],
            rep_times_sec: vec![75, 76, 77, 75],
        }
    }

    #[test]
    fn test_stroke_parse_is_case_insensitive() {
        assert_eq!(Stroke::parse("FREE"), Some(Stroke::Free));
        assert_eq!(Stroke::parse(" Breast "), Some(Stroke::Breast));
        assert_eq!(Stroke::parse("IM"), Some(Stroke::Im));
        assert_eq!(Stroke::parse("freestyle"), None);
    }

    #[test]
    fn test_valid_set_passes() {
        let set = payload().validate().unwrap();
        assert_eq!(set.stroke, Stroke::Free);
        assert_eq!(set.rep_times_sec.len(), 4);
    }

    #[test]
    fn test_stroke_is_normalised() {
        let mut p = payload();
        p.stroke = "Fly".to_string();
        assert_eq!(p.validate().unwrap().stroke.as_str(), "fly");
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut p = payload();
        p.reps = 3;
        p.rpe = vec![5, 5];
        p.rep_times_sec = vec![40, 41, 42];
        let errors = p.validate().unwrap_err();
        assert_eq!(errors, vec!["Expected 3 RPE inputs, got 2.".to_string()]);
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut p = payload();
        p.distance_m = 0;
        p.interval_sec = 5;
        p.rpe = vec![0, 6, 11, 5];
        p.rep_times_sec = vec![75, 9, 77, 3601];
        let errors = p.validate().unwrap_err();
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let p = CreateSet {
            distance_m: MAX_DISTANCE_M,
            reps: 1,
            interval_sec: 3600,
            stroke: "im".to_string(),
            rpe: vec![10],
            rep_times_sec: vec![10],
        };
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_set_totals() {
        let set = SwimSet {
            id: 1,
            session_id: 1,
            distance_m: 50,
            reps: 6,
            interval_sec: 60,
            stroke: "fly".to_string(),
            rpe: vec![7, 7, 8, 7, 7, 7],
            rep_times_sec: vec![40, 41, 42, 40, 41, 40],
        };
        assert_eq!(set.total_distance_m(), 300.0);
        assert_eq!(set.total_time_sec(), 244.0);
    }
}
