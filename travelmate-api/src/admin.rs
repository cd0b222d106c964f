use axum::{
    extract::{Path, State},
    middleware,
    routing::{delete, get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use travelmate_store::Role;

use crate::auth::MsgResponse;
use crate::error::AppError;
use crate::middleware::auth::admin_auth_middleware;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[derive(Debug, Serialize)]
struct UsageResponse {
    users: usize,
    msg: String,
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/usage", get(usage))
        .route("/user/{id}/role", put(update_role))
        .route("/user/{id}", delete(remove_user))
        .route_layer(middleware::from_fn_with_state(
            state,
            admin_auth_middleware,
        ))
}

/// Usage summary; a user count today, the hook for richer analytics.
async fn usage(State(state): State<AppState>) -> Result<Json<UsageResponse>, AppError> {
    let users = state.users.count().await?;
    Ok(Json(UsageResponse {
        users,
        msg: "Usage report.".to_string(),
    }))
}

async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<MsgResponse>, AppError> {
    let role = Role::parse(&req.role)?;
    state.users.set_role(id, role).await?;
    Ok(Json(MsgResponse {
        msg: "User role updated successfully.".to_string(),
    }))
}

async fn remove_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MsgResponse>, AppError> {
    state.users.delete(id).await?;
    Ok(Json(MsgResponse {
        msg: "User account deleted.".to_string(),
    }))
}
