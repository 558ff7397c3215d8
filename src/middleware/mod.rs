use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::Role;
use crate::services::auth::Claims;
use crate::AppState;

/// Caller identity for guest routes.
///
/// Holds `None` when `ENABLE_AUTH` is off, in which case every request is let
/// through as before.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Option<Claims>);

/// Like [`AuthUser`] but requires the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Option<Claims>);

impl AuthUser {
    /// Guests may only act on their own bookings; admins on anyone's.
    pub fn ensure_can_act_for(&self, user_id: &str) -> Result<(), ApiError> {
        match &self.0 {
            Some(claims) if claims.role != Role::Admin && claims.sub != user_id => {
                Err(ApiError::forbidden("cannot act on behalf of another user"))
            }
            _ => Ok(()),
        }
    }
}

fn bearer_claims(parts: &Parts, state: &AppState) -> Result<Claims, ApiError> {
    let token = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;

    Ok(state.auth.verify_token(token)?)
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        if !state.config.features.enable_auth {
            return Ok(AuthUser(None));
        }
        bearer_claims(parts, state).map(|claims| AuthUser(Some(claims)))
    }
}

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        if !state.config.features.enable_auth {
            return Ok(AdminUser(None));
        }
        let claims = bearer_claims(parts, state)?;
        if claims.role != Role::Admin {
            tracing::warn!("user {} denied admin access", claims.sub);
            return Err(ApiError::forbidden("admin role required"));
        }
        Ok(AdminUser(Some(claims)))
    }
}
