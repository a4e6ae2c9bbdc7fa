//! Deterministic development data: one coach, a handful of swimmers, and a
//! spread of sessions with valid sets.

use chrono::{Duration, NaiveDate, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{CreateSet, NewSet, NewUser, Stroke, User, UserRole};
use crate::repositories::{SessionRepository, UserRepository};

pub const DEFAULT_RNG_SEED: u64 = 1337;
pub const SEED_PASSWORD: &str = "changeme";

const DISTANCES_M: [u32; 6] = [50, 75, 100, 150, 200, 400];

#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub swimmers: u32,
    pub sessions_per_swimmer: u32,
    pub min_sets: u32,
    pub max_sets: u32,
    pub coach_email: String,
    /// First day of the window; defaults to `today - (days_span - 1)`.
    pub start_date: Option<NaiveDate>,
    pub days_span: u32,
    pub rng_seed: u64,
    pub reset: bool,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            swimmers: 3,
            sessions_per_swimmer: 5,
            min_sets: 2,
            max_sets: 5,
            coach_email: "coach@example.com".to_string(),
            start_date: None,
            days_span: 21,
            rng_seed: DEFAULT_RNG_SEED,
            reset: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub coach_id: i64,
    pub swimmers: usize,
    pub sessions: usize,
    pub sets: usize,
}

/// Find or create the user behind `email`, forcing `role`.
async fn ensure_user(users: &UserRepository, email: &str, role: UserRole) -> Result<User> {
    match users.find_by_email(email).await? {
        Some(mut user) => {
            if user.role != role {
                users.update_role(user.id, role).await?;
                user.role = role;
            }
            Ok(user)
        }
        None => {
            users
                .create(NewUser {
                    email: email.to_string(),
                    username: None,
                    password: SEED_PASSWORD.to_string(),
                    role,
                })
                .await
        }
    }
}

fn random_set(rng: &mut StdRng) -> Result<NewSet> {
    let distance_m = DISTANCES_M[rng.gen_range(0..DISTANCES_M.len())];
    let reps = rng.gen_range(2..=10u32);
    let stroke = Stroke::ALL[rng.gen_range(0..Stroke::ALL.len())];

    let rep_times_sec: Vec<u32> = (0..reps)
        .map(|_| {
            let base = rng.gen_range(30..=360i64);
            let jitter = rng.gen_range(-3..=5i64);
            (base + jitter).clamp(10, 3600) as u32
        })
        .collect();
    let slowest = rep_times_sec.iter().copied().max().unwrap_or(60);
    let interval_sec = (slowest + rng.gen_range(5..=25u32)).clamp(10, 3600);
    let rpe = (0..reps).map(|_| rng.gen_range(4..=9u32)).collect();

    CreateSet {
        distance_m,
        reps,
        interval_sec,
        stroke: stroke.as_str().to_string(),
        rpe,
        rep_times_sec,
    }
    .validate()
    .map_err(AppError::Validation)
}

/// Day offset for the `index`-th of `count` sessions spread over `span` days.
fn spread_offset(index: u32, count: u32, span: u32, jitter: i64) -> i64 {
    let denom = f64::from(count.max(1));
    let base = (f64::from(index) * f64::from(span.saturating_sub(1)) / denom).round() as i64;
    (base + jitter).clamp(0, i64::from(span.saturating_sub(1)))
}

pub async fn seed_dataset(
    users: &UserRepository,
    sessions: &SessionRepository,
    options: &SeedOptions,
) -> Result<SeedSummary> {
    if options.reset {
        let removed = sessions.wipe_all().await?;
        let users_removed = users.delete_all().await?;
        tracing::info!(sessions = removed, users = users_removed, "Wiped existing data");
    }

    let mut rng = StdRng::seed_from_u64(options.rng_seed);
    let days_span = options.days_span.max(1);
    let start = options.start_date.unwrap_or_else(|| {
        Utc::now().date_naive() - Duration::days(i64::from(days_span) - 1)
    });

    let coach = ensure_user(users, &options.coach_email, UserRole::Coach).await?;

    let mut swimmers = Vec::new();
    for i in 1..=options.swimmers {
        let email = format!("swimmer{}@example.com", i);
        swimmers.push(ensure_user(users, &email, UserRole::Swimmer).await?);
    }

    let mut total_sessions = 0;
    let mut total_sets = 0;
    for swimmer in &swimmers {
        for index in 0..options.sessions_per_swimmer {
            let jitter = rng.gen_range(-1..=1i64);
            let offset = spread_offset(index, options.sessions_per_swimmer, days_span, jitter);
            let date = start + Duration::days(offset);
            let notes = format!("Session {} for {}", index + 1, swimmer.email);

            let session = sessions
                .create_session(date, Some(notes), Some(swimmer.id))
                .await?;
            total_sessions += 1;

            let set_count = rng.gen_range(options.min_sets..=options.max_sets.max(options.min_sets));
            for _ in 0..set_count {
                sessions.add_set(session.id, random_set(&mut rng)?).await?;
                total_sets += 1;
            }
        }
    }

    let summary = SeedSummary {
        coach_id: coach.id,
        swimmers: swimmers.len(),
        sessions: total_sessions,
        sets: total_sets,
    };
    tracing::info!(?summary, "Seed complete");
    Ok(summary)
}
