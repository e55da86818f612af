use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{info, warn};

use crate::db::models::Role;
use crate::error::RollcallError;
use crate::middleware::{Principal, ValidJson, ValidJsonOrForm};
use crate::router::AppState;
use crate::types::auth::{LoginRequest, RegisterRequest, TokenResponse};

/// POST /auth/login -> exchanges username/password for a bearer token.
/// Accepts a JSON body or an urlencoded form.
pub async fn login(
    State(state): State<AppState>,
    ValidJsonOrForm(req): ValidJsonOrForm<LoginRequest>,
) -> Result<Json<TokenResponse>, RollcallError> {
    let Some(user) = state.storage.authenticate(&req.username, &req.password).await? else {
        warn!(username = %req.username, "login rejected");
        return Err(RollcallError::Unauthorized("incorrect username or password"));
    };
    info!(username = %user.username, "login succeeded");
    Ok(Json(TokenResponse::bearer(state.signer.issue(&user.username))))
}

/// POST /auth/register -> creates an account; admin only.
pub async fn register(
    State(state): State<AppState>,
    principal: Principal,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<impl IntoResponse, RollcallError> {
    principal.require_admin()?;
    let role = req.role.unwrap_or(Role::Teacher);
    let user = state
        .storage
        .create_user(&req.username, &req.password, role)
        .await?;
    info!(username = %user.username, ?role, by = %principal.username, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn me(principal: Principal) -> Json<Principal> {
    Json(principal)
}
