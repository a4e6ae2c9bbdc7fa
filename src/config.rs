use std::env;

use crate::version::GIT_VERSION;

pub const DEFAULT_JWT_SECRET: &str = "change-me-dev-only";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub app_env: String,
    pub app_version: String,
    pub signup_invite_code: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:swimlog.db?mode=rwc".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string()),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .unwrap_or(8),
            app_env: env::var("SWIMLOG_ENV").unwrap_or_else(|_| "development".to_string()),
            app_version: env::var("SWIMLOG_VERSION").unwrap_or_else(|_| GIT_VERSION.to_string()),
            signup_invite_code: env::var("SIGNUP_INVITE_CODE")
                .ok()
                .filter(|code| !code.trim().is_empty()),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}
