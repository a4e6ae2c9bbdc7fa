use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use swimlog::config::Config;
use swimlog::repositories::{SessionRepository, UserRepository};
use swimlog::seed::{seed_dataset, SeedOptions, DEFAULT_RNG_SEED};
use swimlog::{db, migrations};

/// Seed the development database with a coach, swimmers, and sessions.
#[derive(Parser, Debug)]
#[command(name = "swimlog-seed", version)]
struct Args {
    /// Number of swimmers to create
    #[arg(long, default_value_t = 3)]
    swimmers: u32,

    /// Sessions per swimmer
    #[arg(long, default_value_t = 5)]
    sessions: u32,

    /// Minimum sets per session
    #[arg(long, default_value_t = 2)]
    min_sets: u32,

    /// Maximum sets per session
    #[arg(long, default_value_t = 5)]
    max_sets: u32,

    #[arg(long, default_value = "coach@example.com")]
    coach_email: String,

    /// Span of days to distribute sessions over
    #[arg(long, default_value_t = 21)]
    days: u32,

    /// First day of the window (YYYY-MM-DD); defaults to today minus the span
    #[arg(long)]
    start: Option<NaiveDate>,

    #[arg(long, default_value_t = DEFAULT_RNG_SEED)]
    rng_seed: u64,

    /// Delete existing rows before seeding
    #[arg(long)]
    reset: bool,

    /// Overrides DATABASE_URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

impl Args {
    fn options(&self) -> SeedOptions {
        let min_sets = self.min_sets.max(1);
        SeedOptions {
            swimmers: self.swimmers,
            sessions_per_swimmer: self.sessions,
            min_sets,
            max_sets: self.max_sets.max(min_sets),
            coach_email: self.coach_email.clone(),
            start_date: self.start,
            days_span: self.days.max(1),
            rng_seed: self.rng_seed,
            reset: self.reset,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("swimlog=info")),
        )
        .init();

    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = Config::from_env()?;
    let database_url = args
        .database_url
        .clone()
        .unwrap_or_else(|| config.database_url.clone());

    let pool = db::create_pool(&database_url)
        .with_context(|| format!("Failed to open database {}", database_url))?;
    migrations::run_migrations(&pool)?;

    let users = UserRepository::new(pool.clone());
    let sessions = SessionRepository::new(pool);
    let summary = seed_dataset(&users, &sessions, &args.options())
        .await
        .context("Seeding failed")?;

    println!(
        "Seed complete: coach_id={}, swimmers={}, sessions={}, sets={}",
        summary.coach_id, summary.swimmers, summary.sessions, summary.sets
    );
    Ok(())
}
