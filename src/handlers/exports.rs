use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use super::RangeQuery;
use super::sessions::accessible_session;
use crate::error::{AppError, Result};
use crate::export::{range_filename, rows_for_session, session_filename, write_csv};
use crate::extract::{AppPath, AppQuery};
use crate::guard::owner_scope;
use crate::middleware::AuthUser;
use crate::repositories::SessionRepository;

#[derive(Clone)]
pub struct ExportState {
    pub session_repo: SessionRepository,
}

fn csv_attachment(filename: String, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

/// `GET /export/session/{id}.csv`
pub async fn session_csv(
    State(state): State<ExportState>,
    user: AuthUser,
    AppPath(file): AppPath<String>,
) -> Result<Response> {
    let session_id: i64 = file
        .strip_suffix(".csv")
        .and_then(|id| id.parse().ok())
        .ok_or_else(|| AppError::NotFound("Session not found.".to_string()))?;

    let record = accessible_session(&state.session_repo, &user, session_id).await?;
    let body = write_csv(&rows_for_session(&record))?;

    Ok(csv_attachment(session_filename(record.session.id), body))
}

/// `GET /export/range.csv?start&end[&swimmer_id]`
pub async fn range_csv(
    State(state): State<ExportState>,
    user: AuthUser,
    AppQuery(query): AppQuery<RangeQuery>,
) -> Result<Response> {
    let (start, end) = query.window()?;
    let owner = owner_scope(&user, query.swimmer_id);

    let sessions = state
        .session_repo
        .load_sessions_in_range(start, end, owner)
        .await?;
    let rows: Vec<_> = sessions.iter().flat_map(rows_for_session).collect();
    let body = write_csv(&rows)?;

    tracing::debug!(user_id = user.id, sessions = sessions.len(), "Exported range");
    Ok(csv_attachment(range_filename(start, end), body))
}
