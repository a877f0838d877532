//! Bearer-credential extractor.
//!
//! The token scheme is deliberately thin: the bearer value is the opaque
//! user id issued at login. Everything downstream only consumes the
//! resolved `AuthenticatedUser`, so swapping in signed tokens later
//! touches this extractor alone.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::db::queries;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing bearer credential".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("malformed authorization header".to_string()))?;

        let user_id = Uuid::parse_str(token.trim())
            .map_err(|_| AppError::Unauthorized("invalid bearer credential".to_string()))?;

        // Deactivated users lose access immediately.
        queries::get_user(&state.db, user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("unknown user".to_string()))?;

        Ok(AuthenticatedUser { user_id })
    }
}
