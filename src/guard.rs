//! Role and ownership decisions for session-scoped operations.
//!
//! Role is a coarse gate on which endpoints a caller may use at all.
//! Ownership is checked per session. A coach passes every ownership check.

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{TrainingSession, UserRole};

/// Any authenticated user.
pub const ANY_ROLE: &[UserRole] = &[];

pub fn require_role<'a>(identity: &'a AuthUser, allowed: &[UserRole]) -> Result<&'a AuthUser> {
    if allowed.is_empty() || allowed.contains(&identity.role) {
        Ok(identity)
    } else {
        Err(AppError::Forbidden("Insufficient role.".to_string()))
    }
}

/// Approve a coach for any session, or the caller for a session they own.
pub fn authorize_session_access<'s>(
    identity: &AuthUser,
    session: Option<&'s TrainingSession>,
) -> Result<&'s TrainingSession> {
    let session = session.ok_or_else(|| AppError::NotFound("Session not found.".to_string()))?;

    if identity.role.is_coach() || session.user_id == Some(identity.id) {
        Ok(session)
    } else {
        Err(AppError::Forbidden("Forbidden.".to_string()))
    }
}

/// Access check for routes that name the owning swimmer in the path. A
/// session that exists but belongs to somebody else is a conflict.
pub fn authorize_cross_user_route<'s>(
    identity: &AuthUser,
    swimmer_id: i64,
    session: Option<&'s TrainingSession>,
) -> Result<&'s TrainingSession> {
    let session = authorize_session_access(identity, session)?;

    if session.user_id != Some(swimmer_id) {
        return Err(AppError::Conflict(
            "Session doesn't belong to this swimmer.".to_string(),
        ));
    }
    Ok(session)
}

/// Owner filter for list, range, and export queries. Coaches may narrow to
/// one swimmer or see everything; swimmers only ever see their own.
pub fn owner_scope(identity: &AuthUser, requested: Option<i64>) -> Option<i64> {
    match identity.role {
        UserRole::Coach => requested,
        UserRole::Swimmer => Some(identity.id),
    }
}
