use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::{AppError, AuthFailure, Result};
use crate::guard::require_role;
use crate::models::{User, UserRole};
use crate::repositories::UserRepository;
use crate::token::{parse_bearer, TokenKeys};

/// Resolves bearer credentials to users. Installed as an `Extension` layer.
#[derive(Clone)]
pub struct Authenticator {
    pub user_repo: UserRepository,
    pub keys: TokenKeys,
}

impl Authenticator {
    pub fn new(user_repo: UserRepository, keys: TokenKeys) -> Self {
        Self { user_repo, keys }
    }

    pub async fn authenticate(&self, header: Option<&str>) -> Result<AuthUser> {
        let header = header.ok_or(AppError::Unauthorized(AuthFailure::MissingHeader))?;
        let token = parse_bearer(header).map_err(AppError::Unauthorized)?;
        let claims = self.keys.verify(token).map_err(AppError::Unauthorized)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized(AuthFailure::InvalidSubject))?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::Unauthorized(AuthFailure::UnknownUser))?;

        Ok(AuthUser::from(&user))
    }
}

/// The authenticated caller.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub role: UserRole,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        let authenticator = parts
            .extensions
            .get::<Authenticator>()
            .cloned()
            .ok_or_else(|| AppError::Internal("Authenticator extension missing".to_string()))?;

        let header = match parts.headers.get(header::AUTHORIZATION) {
            Some(value) => Some(
                value
                    .to_str()
                    .map_err(|_| AppError::Unauthorized(AuthFailure::MalformedHeader))?,
            ),
            None => None,
        };

        authenticator.authenticate(header).await
    }
}

/// Authenticated caller with the coach role.
#[derive(Clone, Debug)]
pub struct CoachUser(pub AuthUser);

impl<S> FromRequestParts<S> for CoachUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require_role(&user, &[UserRole::Coach])?;
        Ok(CoachUser(user))
    }
}

/// Authenticated caller with the swimmer role.
#[derive(Clone, Debug)]
pub struct SwimmerUser(pub AuthUser);

impl<S> FromRequestParts<S> for SwimmerUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require_role(&user, &[UserRole::Swimmer])?;
        Ok(SwimmerUser(user))
    }
}
