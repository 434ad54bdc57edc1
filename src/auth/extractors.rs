use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use tracing::{error, warn};
use uuid::Uuid;

use super::repo_types::User;
use super::services::{JwtKeys, TokenError, TokenKind};
use crate::state::AppState;

type Rejection = (StatusCode, String);

fn reject(status: StatusCode, message: &str) -> Rejection {
    (status, message.to_string())
}

/// The raw token from `Authorization: Bearer <token>`.
fn bearer_token(parts: &Parts) -> Result<&str, Rejection> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Missing Authorization header"))?;
    header
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Invalid Authorization header"))
}

/// Id of the caller, taken from a valid access token.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = JwtKeys::from_ref(state)
            .verify(token, TokenKind::Access)
            .map_err(|e| {
                warn!(error = %e, "bearer token refused");
                let message = match e {
                    TokenError::Expired => "Token expired",
                    TokenError::WrongKind { .. } => "Access token required",
                    TokenError::Invalid => "Invalid token",
                };
                reject(StatusCode::UNAUTHORIZED, message)
            })?;
        Ok(AuthUser(claims.sub))
    }
}

/// An authenticated user whose `is_admin` flag is set.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = Rejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user_id) = AuthUser::from_request_parts(parts, state).await?;

        let user = User::find_by_id(&state.db, user_id)
            .await
            .map_err(|e| {
                error!(error = %e, %user_id, "load user failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            })?
            .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "User not found"))?;

        if !user.is_admin {
            warn!(%user_id, "admin access denied");
            return Err(reject(
                StatusCode::FORBIDDEN,
                "Access denied. Admin privileges required.",
            ));
        }
        Ok(AdminUser(user))
    }
}
