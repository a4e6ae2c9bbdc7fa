use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, coach, exports, sessions, system};
use crate::middleware::Authenticator;

pub fn create_router(
    auth_state: auth::AuthState,
    sessions_state: sessions::SessionsState,
    coach_state: coach::CoachState,
    export_state: exports::ExportState,
    system_state: system::SystemState,
    authenticator: Authenticator,
) -> Router {
    Router::new()
        // Auth routes
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .with_state(auth_state)
        // Session routes, any signed-in user
        .route("/sessions", get(sessions::list).post(sessions::create))
        .route("/sessions/range", get(sessions::range))
        .route("/sessions/range/summary", get(sessions::range_summary))
        .route("/sessions/{id}", get(sessions::show))
        .route("/sessions/{id}/analytics", get(sessions::analytics))
        .route("/sessions/{id}/sets", post(sessions::add_set))
        // Swimmer's own sessions
        .route(
            "/me/sessions",
            get(sessions::my_list).post(sessions::my_create),
        )
        .route("/me/sessions/range", get(sessions::my_range))
        .route(
            "/me/sessions/range/summary",
            get(sessions::my_range_summary),
        )
        .route("/me/sessions/{id}", get(sessions::my_show))
        .route("/me/sessions/{id}/analytics", get(sessions::my_analytics))
        .route("/me/sessions/{id}/sets", post(sessions::my_add_set))
        .with_state(sessions_state)
        // Coach routes
        .route("/coach/swimmers", get(coach::list_swimmers))
        .route(
            "/coach/swimmers/{swimmer_id}/sessions",
            get(coach::swimmer_sessions).post(coach::create_for_swimmer),
        )
        .route(
            "/coach/swimmers/{swimmer_id}/sessions/{session_id}",
            get(coach::swimmer_session_detail),
        )
        .route(
            "/coach/swimmers/{swimmer_id}/sessions/{session_id}/analytics",
            get(coach::swimmer_session_analytics),
        )
        .route(
            "/coach/swimmers/{swimmer_id}/sessions/{session_id}/sets",
            post(coach::add_set_for_swimmer),
        )
        .route("/coach/overview", get(coach::overview))
        .route("/coach/leaderboard", get(coach::leaderboard))
        .with_state(coach_state)
        // CSV exports
        .route("/export/session/{file}", get(exports::session_csv))
        .route("/export/range.csv", get(exports::range_csv))
        .with_state(export_state)
        // System routes
        .route("/system/health", get(system::health_check))
        .route("/system/version", get(system::version))
        .with_state(system_state)
        .layer(TraceLayer::new_for_http())
        // Authenticator via Extension layer
        .layer(Extension(authenticator))
}
