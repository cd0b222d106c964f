use axum::{
    extract::{Extension, Path, State},
    middleware,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{MsgResponse, PublicUser};
use crate::error::AppError;
use crate::middleware::auth::{admin_auth_middleware, auth_middleware, Claims};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
struct ProfileResponse {
    msg: String,
    user: PublicUser,
}

pub fn routes(state: AppState) -> Router<AppState> {
    let profile = Router::new()
        .route("/me", get(me).put(update_me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin = Router::new()
        .route("/", get(list_users))
        .route("/{id}", delete(remove_user))
        .route_layer(middleware::from_fn_with_state(
            state,
            admin_auth_middleware,
        ));

    profile.merge(admin)
}

async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<PublicUser>, AppError> {
    let user = state
        .users
        .find_by_id(claims.user_id()?)
        .await?
        .ok_or_else(|| AppError::NotFoundError("User not found.".to_string()))?;
    Ok(Json(user.into()))
}

async fn update_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Name and email are required.".to_string(),
        ));
    }

    let user = state
        .users
        .update_profile(claims.user_id()?, &req.name, &req.email)
        .await?;
    Ok(Json(ProfileResponse {
        msg: "Profile updated.".to_string(),
        user: user.into(),
    }))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<PublicUser>>, AppError> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

async fn remove_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MsgResponse>, AppError> {
    state.users.delete(id).await?;
    Ok(Json(MsgResponse {
        msg: "User deleted.".to_string(),
    }))
}
