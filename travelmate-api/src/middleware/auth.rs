use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Bearer-token claims: user id, role, and expiry.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::AuthenticationError("Token invalid.".to_string()))
    }

    pub fn is_admin(&self) -> bool {
        self.role == "Admin"
    }
}

/// Require a valid bearer token; the decoded claims are injected into
/// request extensions for the handler.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = decode_bearer(&state, req.headers())?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Require a valid bearer token carrying the Admin role.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = decode_bearer(&state, req.headers())?;
    if !claims.is_admin() {
        return Err(AppError::AuthorizationError("Forbidden.".to_string()));
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

fn decode_bearer(state: &AppState, headers: &HeaderMap) -> Result<Claims, AppError> {
    let denied = || {
        AppError::AuthenticationError("No token, authorization denied.".to_string())
    };

    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(denied)?;
    let token = auth_header.strip_prefix("Bearer ").ok_or_else(denied)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthenticationError("Token invalid.".to_string()))?;

    Ok(token_data.claims)
}
