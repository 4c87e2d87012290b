use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, models::UserProfile, state::AppState};

/// Claims issued by the external identity provider.
#[derive(Debug, Deserialize, Serialize)]
pub struct Claims {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub exp: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl AuthUser {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.user_id,
            email: self.email.clone(),
            full_name: self.full_name.clone(),
        }
    }
}

/// Verifies a bearer token. Any failure means the caller has no usable identity.
pub fn verify_token(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|err| {
        tracing::debug!(error = %err, "rejected bearer token");
        AppError::NotAuthenticated
    })?;

    let user_id = Uuid::parse_str(&decoded.claims.sub).map_err(|_| AppError::NotAuthenticated)?;

    Ok(AuthUser {
        user_id,
        email: decoded.claims.email,
        full_name: decoded.claims.name,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::NotAuthenticated)?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::NotAuthenticated)?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or(AppError::NotAuthenticated)?;

        let secret = state.jwt_secret.as_deref().ok_or_else(|| {
            tracing::warn!("JWT_SECRET is not configured; bearer tokens cannot be verified");
            AppError::NotAuthenticated
        })?;

        verify_token(token, secret)
    }
}

impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    /// A missing header yields `None`; a present but invalid one is rejected.
    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Ok(None);
        }
        <AuthUser as FromRequestParts<AppState>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}
