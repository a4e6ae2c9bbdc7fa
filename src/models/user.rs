use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::FromSqliteRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Coach,
    #[default]
    Swimmer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Coach => "coach",
            UserRole::Swimmer => "swimmer",
        }
    }

    /// Strict parse for user input; unknown roles are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coach" => Some(UserRole::Coach),
            "swimmer" => Some(UserRole::Swimmer),
            _ => None,
        }
    }

    pub fn is_coach(&self) -> bool {
        matches!(self, UserRole::Coach)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let role_str: String = row.get("role")?;
        Ok(Self {
            id: row.get("id")?,
            email: row.get("email")?,
            username: row.get("username")?,
            password_hash: row.get("password_hash")?,
            role: UserRole::parse(&role_str).unwrap_or_default(),
            created_at: row.get("created_at")?,
        })
    }
}

/// Public projection of a user, used in auth responses and coach listings.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub role: UserRole,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Signup {
    pub email: String,
    pub password: String,
    pub role: String,
    pub username: Option<String>,
    pub invite_code: Option<String>,
}

/// A validated signup, ready for `UserRepository::create`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: Option<String>,
    pub password: String,
    pub role: UserRole,
}

impl Signup {
    pub fn validate(self) -> Result<NewUser, Vec<String>> {
        let mut errors = Vec::new();

        let email = self.email.trim().to_ascii_lowercase();
        if !email.validate_email() {
            errors.push("email must be a valid email address".to_string());
        }
        if self.password.len() < 6 {
            errors.push("password must be at least 6 characters".to_string());
        }
        let role = UserRole::parse(&self.role);
        if role.is_none() {
            errors.push("role must be one of: coach, swimmer".to_string());
        }
        let username = self
            .username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        match role {
            Some(role) if errors.is_empty() => Ok(NewUser {
                email,
                username,
                password: self.password,
                role,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginCredentials {
    #[serde(alias = "email", alias = "username")]
    pub identifier: String,
    pub password: String,
}
