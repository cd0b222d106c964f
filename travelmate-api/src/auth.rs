use axum::{extract::State, routing::post, Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use travelmate_store::{Role, UserRecord};

use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::password;
use crate::state::{AppState, AuthConfig};

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MsgResponse {
    pub msg: String,
}

/// A user as the API exposes it; never carries the password hash.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<UserRecord> for PublicUser {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    user: PublicUser,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<MsgResponse>, AppError> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Name and email are required.".to_string(),
        ));
    }
    password::validate_password_strength(&req.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::ValidationError)?;

    let hashed = password::hash_password(&req.password)
        .map_err(|e| AppError::InternalServerError(format!("Password hashing failed: {}", e)))?;
    let record = UserRecord::new(&req.name, &req.email, &hashed, req.role.unwrap_or_default());

    let user = state.users.insert(record).await?;
    tracing::info!(user = %user.id, "user registered");

    Ok(Json(MsgResponse {
        msg: "Registration successful.".to_string(),
    }))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let invalid =
        || AppError::AuthenticationError("Invalid email or password.".to_string());

    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or_else(invalid)?;

    let verified = password::verify_password(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Password check failed: {}", e)))?;
    if !verified {
        return Err(invalid());
    }

    let token = mint_token(&state.auth, &user)?;
    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

async fn logout() -> Json<MsgResponse> {
    // Tokens are stateless; the client drops its copy.
    Json(MsgResponse {
        msg: "Logged out.".to_string(),
    })
}

pub fn mint_token(auth: &AuthConfig, user: &UserRecord) -> Result<String, AppError> {
    let claims = Claims {
        sub: user.id.to_string(),
        role: user.role.as_str().to_string(),
        exp: (Utc::now() + Duration::seconds(auth.expiration as i64)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}
