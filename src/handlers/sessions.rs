//! Session routes for any signed-in user (`/sessions`) and the swimmer's own
//! view (`/me/sessions`). Both go through the same owner-or-coach check.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use super::{DashboardQuery, PaceQuery, RangeQuery};
use crate::analytics::{
    dashboard_row, session_analytics, session_detail, summarise_sessions, DashboardRow,
    RangeSummary, SessionAnalytics, SessionDetail,
};
use crate::error::{AppError, Result};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::guard::{authorize_session_access, owner_scope};
use crate::middleware::{AuthUser, SwimmerUser};
use crate::models::{
    CreateSession, CreateSet, CreatedSession, CreatedSet, SessionWithSets, TrainingSession,
};
use crate::repositories::SessionRepository;

#[derive(Clone)]
pub struct SessionsState {
    pub session_repo: SessionRepository,
}

/// Left-pane entry of a range listing.
#[derive(Debug, Serialize)]
pub struct SessionStub {
    pub id: i64,
    pub date: chrono::NaiveDate,
    pub notes: Option<String>,
}

impl From<&TrainingSession> for SessionStub {
    fn from(session: &TrainingSession) -> Self {
        Self {
            id: session.id,
            date: session.date,
            notes: session.notes.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RangeListing {
    pub sessions: Vec<SessionStub>,
    pub summary: RangeSummary,
}

/// Load a session with its sets if `identity` may access it.
pub(crate) async fn accessible_session(
    repo: &SessionRepository,
    identity: &AuthUser,
    session_id: i64,
) -> Result<SessionWithSets> {
    let record = repo.load_session(session_id).await?;
    authorize_session_access(identity, record.as_ref().map(|r| &r.session))?;
    record.ok_or_else(|| AppError::NotFound("Session not found.".to_string()))
}

pub(crate) async fn dashboard_rows(
    repo: &SessionRepository,
    owner: Option<i64>,
    query: &DashboardQuery,
) -> Result<Vec<DashboardRow>> {
    let limit = query.limit()?;
    let basis = query.basis();
    let sessions = repo.list_sessions(owner, limit).await?;
    Ok(sessions.iter().map(|s| dashboard_row(s, basis)).collect())
}

pub(crate) async fn create_owned(
    repo: &SessionRepository,
    payload: CreateSession,
    owner_id: i64,
) -> Result<(StatusCode, Json<CreatedSession>)> {
    payload.validate().map_err(AppError::Validation)?;
    let session = repo
        .create_session(payload.date, payload.notes, Some(owner_id))
        .await?;
    tracing::debug!(session_id = session.id, owner_id, "Created session");
    Ok((StatusCode::CREATED, Json(CreatedSession::from(&session))))
}

pub(crate) async fn append_set(
    repo: &SessionRepository,
    session: &TrainingSession,
    payload: CreateSet,
) -> Result<Json<CreatedSet>> {
    let new_set = payload.validate().map_err(AppError::Validation)?;
    let set = repo.add_set(session.id, new_set).await?;
    tracing::debug!(set_id = set.id, session_id = session.id, "Added set");
    Ok(Json(CreatedSet {
        id: set.id,
        session_id: set.session_id,
    }))
}

async fn range_listing(
    repo: &SessionRepository,
    owner: Option<i64>,
    query: &RangeQuery,
) -> Result<RangeListing> {
    let (start, end) = query.window()?;
    let sessions = repo.load_sessions_in_range(start, end, owner).await?;
    Ok(RangeListing {
        sessions: sessions.iter().map(|s| SessionStub::from(&s.session)).collect(),
        summary: summarise_sessions(&sessions, query.basis()),
    })
}

async fn summary_in_range(
    repo: &SessionRepository,
    owner: Option<i64>,
    query: &RangeQuery,
) -> Result<RangeSummary> {
    let (start, end) = query.window()?;
    let sessions = repo.load_sessions_in_range(start, end, owner).await?;
    Ok(summarise_sessions(&sessions, query.basis()))
}

// /sessions

pub async fn list(
    State(state): State<SessionsState>,
    user: AuthUser,
    AppQuery(query): AppQuery<DashboardQuery>,
) -> Result<Json<Vec<DashboardRow>>> {
    let owner = owner_scope(&user, None);
    Ok(Json(dashboard_rows(&state.session_repo, owner, &query).await?))
}

pub async fn create(
    State(state): State<SessionsState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateSession>,
) -> Result<(StatusCode, Json<CreatedSession>)> {
    create_owned(&state.session_repo, payload, user.id).await
}

pub async fn range(
    State(state): State<SessionsState>,
    user: AuthUser,
    AppQuery(query): AppQuery<RangeQuery>,
) -> Result<Json<RangeListing>> {
    let owner = owner_scope(&user, query.swimmer_id);
    Ok(Json(range_listing(&state.session_repo, owner, &query).await?))
}

pub async fn range_summary(
    State(state): State<SessionsState>,
    user: AuthUser,
    AppQuery(query): AppQuery<RangeQuery>,
) -> Result<Json<RangeSummary>> {
    let owner = owner_scope(&user, query.swimmer_id);
    Ok(Json(summary_in_range(&state.session_repo, owner, &query).await?))
}

pub async fn show(
    State(state): State<SessionsState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<SessionDetail>> {
    let record = accessible_session(&state.session_repo, &user, id).await?;
    Ok(Json(session_detail(&record)))
}

pub async fn analytics(
    State(state): State<SessionsState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
    AppQuery(query): AppQuery<PaceQuery>,
) -> Result<Json<SessionAnalytics>> {
    let record = accessible_session(&state.session_repo, &user, id).await?;
    Ok(Json(session_analytics(&record, query.basis())))
}

pub async fn add_set(
    State(state): State<SessionsState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<CreateSet>,
) -> Result<Json<CreatedSet>> {
    let record = accessible_session(&state.session_repo, &user, id).await?;
    append_set(&state.session_repo, &record.session, payload).await
}

// /me/sessions

pub async fn my_list(
    State(state): State<SessionsState>,
    SwimmerUser(user): SwimmerUser,
    AppQuery(query): AppQuery<DashboardQuery>,
) -> Result<Json<Vec<DashboardRow>>> {
    Ok(Json(
        dashboard_rows(&state.session_repo, Some(user.id), &query).await?,
    ))
}

pub async fn my_create(
    State(state): State<SessionsState>,
    SwimmerUser(user): SwimmerUser,
    AppJson(payload): AppJson<CreateSession>,
) -> Result<(StatusCode, Json<CreatedSession>)> {
    create_owned(&state.session_repo, payload, user.id).await
}

pub async fn my_range(
    State(state): State<SessionsState>,
    SwimmerUser(user): SwimmerUser,
    AppQuery(query): AppQuery<RangeQuery>,
) -> Result<Json<RangeListing>> {
    Ok(Json(
        range_listing(&state.session_repo, Some(user.id), &query).await?,
    ))
}

pub async fn my_range_summary(
    State(state): State<SessionsState>,
    SwimmerUser(user): SwimmerUser,
    AppQuery(query): AppQuery<RangeQuery>,
) -> Result<Json<RangeSummary>> {
    Ok(Json(
        summary_in_range(&state.session_repo, Some(user.id), &query).await?,
    ))
}

pub async fn my_show(
    State(state): State<SessionsState>,
    SwimmerUser(user): SwimmerUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<SessionDetail>> {
    let record = accessible_session(&state.session_repo, &user, id).await?;
    Ok(Json(session_detail(&record)))
}

pub async fn my_analytics(
    State(state): State<SessionsState>,
    SwimmerUser(user): SwimmerUser,
    AppPath(id): AppPath<i64>,
    AppQuery(query): AppQuery<PaceQuery>,
) -> Result<Json<SessionAnalytics>> {
    let record = accessible_session(&state.session_repo, &user, id).await?;
    Ok(Json(session_analytics(&record, query.basis())))
}

pub async fn my_add_set(
    State(state): State<SessionsState>,
    SwimmerUser(user): SwimmerUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<CreateSet>,
) -> Result<Json<CreatedSet>> {
    let record = accessible_session(&state.session_repo, &user, id).await?;
    append_set(&state.session_repo, &record.session, payload).await
}
