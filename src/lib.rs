pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod extract;
pub mod guard;
pub mod handlers;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod seed;
pub mod token;
pub mod version;

use axum::Router;

use config::Config;
use db::DbPool;
use handlers::{auth, coach, exports, sessions, system};
use middleware::Authenticator;
use repositories::{SessionRepository, UserRepository};
use token::TokenKeys;

/// Wire repositories and handler states into the full router.
pub fn build_app(pool: DbPool, config: &Config) -> Router {
    let user_repo = UserRepository::new(pool.clone());
    let session_repo = SessionRepository::new(pool);
    let keys = TokenKeys::new(config.jwt_secret.clone(), config.jwt_expiration_hours);

    let auth_state = auth::AuthState {
        user_repo: user_repo.clone(),
        keys: keys.clone(),
        invite_code: config.signup_invite_code.clone(),
    };
    let sessions_state = sessions::SessionsState {
        session_repo: session_repo.clone(),
    };
    let coach_state = coach::CoachState {
        user_repo: user_repo.clone(),
        session_repo: session_repo.clone(),
    };
    let export_state = exports::ExportState { session_repo };
    let system_state = system::SystemState {
        version: config.app_version.clone(),
        env: config.app_env.clone(),
    };

    routes::create_router(
        auth_state,
        sessions_state,
        coach_state,
        export_state,
        system_state,
        Authenticator::new(user_repo, keys),
    )
}
