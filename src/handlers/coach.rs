//! Coach-only routes addressing swimmers by id.

use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::sessions::{append_set, create_owned, dashboard_rows};
use super::{check_bound, DashboardQuery, PaceQuery, RangeQuery};
use crate::analytics::{
    rank_by_distance, session_analytics, session_detail, summarise_sessions, DashboardRow,
    LeaderboardRow, SessionAnalytics, SessionDetail,
};
use crate::error::{AppError, Result};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::guard::authorize_cross_user_route;
use crate::middleware::{AuthUser, CoachUser};
use crate::models::{
    CreateSession, CreateSet, CreatedSession, CreatedSet, SessionWithSets, User, UserProfile,
    UserRole,
};
use crate::repositories::{SessionRepository, UserRepository};

pub const DEFAULT_RECENT_PER_SWIMMER: u32 = 3;
pub const MAX_RECENT_PER_SWIMMER: u32 = 50;

#[derive(Clone)]
pub struct CoachState {
    pub user_repo: UserRepository,
    pub session_repo: SessionRepository,
}

#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    pub pace_per_m: Option<u32>,
    pub limit_per_swimmer: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct OverviewEntry {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub recent_sessions: Vec<DashboardRow>,
}

#[derive(Debug, Serialize)]
pub struct Overview {
    pub swimmers: Vec<OverviewEntry>,
}

#[derive(Debug, Serialize)]
pub struct Leaderboard {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub rows: Vec<LeaderboardRow>,
}

async fn swimmer_or_404(repo: &UserRepository, swimmer_id: i64) -> Result<User> {
    let user = repo
        .find_by_id(swimmer_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Swimmer not found.".to_string()))?;
    if user.role != UserRole::Swimmer {
        return Err(AppError::BadRequest("User is not a swimmer.".to_string()));
    }
    Ok(user)
}

/// Session `session_id` if it exists and belongs to `swimmer_id`.
async fn swimmer_session(
    state: &CoachState,
    coach: &AuthUser,
    swimmer_id: i64,
    session_id: i64,
) -> Result<SessionWithSets> {
    let record = state.session_repo.load_session(session_id).await?;
    authorize_cross_user_route(coach, swimmer_id, record.as_ref().map(|r| &r.session))?;
    swimmer_or_404(&state.user_repo, swimmer_id).await?;
    record.ok_or_else(|| AppError::NotFound("Session not found.".to_string()))
}

pub async fn list_swimmers(
    State(state): State<CoachState>,
    CoachUser(_coach): CoachUser,
) -> Result<Json<Vec<UserProfile>>> {
    let swimmers = state.user_repo.find_swimmers().await?;
    Ok(Json(swimmers.iter().map(UserProfile::from).collect()))
}

pub async fn swimmer_sessions(
    State(state): State<CoachState>,
    CoachUser(_coach): CoachUser,
    AppPath(swimmer_id): AppPath<i64>,
    AppQuery(query): AppQuery<DashboardQuery>,
) -> Result<Json<Vec<DashboardRow>>> {
    swimmer_or_404(&state.user_repo, swimmer_id).await?;
    Ok(Json(
        dashboard_rows(&state.session_repo, Some(swimmer_id), &query).await?,
    ))
}

pub async fn create_for_swimmer(
    State(state): State<CoachState>,
    CoachUser(coach): CoachUser,
    AppPath(swimmer_id): AppPath<i64>,
    AppJson(payload): AppJson<CreateSession>,
) -> Result<(StatusCode, Json<CreatedSession>)> {
    swimmer_or_404(&state.user_repo, swimmer_id).await?;
    tracing::debug!(coach_id = coach.id, swimmer_id, "Coach creating session");
    create_owned(&state.session_repo, payload, swimmer_id).await
}

pub async fn swimmer_session_detail(
    State(state): State<CoachState>,
    CoachUser(coach): CoachUser,
    AppPath((swimmer_id, session_id)): AppPath<(i64, i64)>,
) -> Result<Json<SessionDetail>> {
    let record = swimmer_session(&state, &coach, swimmer_id, session_id).await?;
    Ok(Json(session_detail(&record)))
}

pub async fn swimmer_session_analytics(
    State(state): State<CoachState>,
    CoachUser(coach): CoachUser,
    AppPath((swimmer_id, session_id)): AppPath<(i64, i64)>,
    AppQuery(query): AppQuery<PaceQuery>,
) -> Result<Json<SessionAnalytics>> {
    let record = swimmer_session(&state, &coach, swimmer_id, session_id).await?;
    Ok(Json(session_analytics(&record, query.basis())))
}

pub async fn add_set_for_swimmer(
    State(state): State<CoachState>,
    CoachUser(coach): CoachUser,
    AppPath((swimmer_id, session_id)): AppPath<(i64, i64)>,
    AppJson(payload): AppJson<CreateSet>,
) -> Result<Json<CreatedSet>> {
    swimmer_or_404(&state.user_repo, swimmer_id).await?;
    let record = swimmer_session(&state, &coach, swimmer_id, session_id).await?;
    append_set(&state.session_repo, &record.session, payload).await
}

/// Every swimmer with their most recent sessions.
pub async fn overview(
    State(state): State<CoachState>,
    CoachUser(_coach): CoachUser,
    AppQuery(query): AppQuery<OverviewQuery>,
) -> Result<Json<Overview>> {
    let per_swimmer = check_bound(
        "limit_per_swimmer",
        query.limit_per_swimmer,
        MAX_RECENT_PER_SWIMMER,
    )?
    .unwrap_or(DEFAULT_RECENT_PER_SWIMMER);
    let dashboard = DashboardQuery {
        limit: Some(per_swimmer),
        pace_per_m: query.pace_per_m,
    };

    let mut swimmers = Vec::new();
    for swimmer in state.user_repo.find_swimmers().await? {
        let recent_sessions =
            dashboard_rows(&state.session_repo, Some(swimmer.id), &dashboard).await?;
        swimmers.push(OverviewEntry {
            id: swimmer.id,
            email: swimmer.email,
            username: swimmer.username,
            recent_sessions,
        });
    }

    Ok(Json(Overview { swimmers }))
}

/// Swimmers ranked by distance swum within the window.
pub async fn leaderboard(
    State(state): State<CoachState>,
    CoachUser(_coach): CoachUser,
    AppQuery(query): AppQuery<RangeQuery>,
) -> Result<Json<Leaderboard>> {
    let (start, end) = query.window()?;
    let basis = query.basis();

    let mut rows = Vec::new();
    for swimmer in state.user_repo.find_swimmers().await? {
        let sessions = state
            .session_repo
            .load_sessions_in_range(start, end, Some(swimmer.id))
            .await?;
        rows.push(LeaderboardRow {
            swimmer_id: swimmer.id,
            email: swimmer.email,
            username: swimmer.username,
            rollup: summarise_sessions(&sessions, basis),
        });
    }
    rank_by_distance(&mut rows);

    Ok(Json(Leaderboard { start, end, rows }))
}
