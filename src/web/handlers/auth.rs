//! Registration and login handlers.

use axum::{extract::State, Json};

use crate::auth::{hash_password, verify_password};
use crate::db::{NewUser, UserRepository};
use crate::web::dto::{CredentialsRequest, LoginResponse, StatusResponse};
use crate::web::error::ApiError;
use crate::FeedPoolError;

use super::AppState;

fn parse_user_id(username: &str) -> Result<i64, ApiError> {
    username
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request("UserID must be numeric."))
}

/// POST /user - create a user account.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("UserID / Password missing."));
    }
    let user_id = parse_user_id(&req.username)?;

    let password_hash =
        hash_password(&req.password).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let repo = UserRepository::new(&state.pool);
    repo.create(&NewUser::new(user_id, password_hash))
        .await
        .map_err(|e| match e {
            FeedPoolError::Validation(_) => ApiError::internal("User not created!"),
            other => other.into(),
        })?;

    Ok(Json(StatusResponse::ok("User created!")))
}

/// POST /login - authenticate and issue a token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("UserID / Password missing."));
    }
    let user_id = parse_user_id(&req.username)?;

    let repo = UserRepository::new(&state.pool);
    let user = repo
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User does not exist!"))?;

    verify_password(&req.password, &user.password_hash)
        .map_err(|_| ApiError::unauthorized("Invalid password for the user ID."))?;

    let token = state.jwt.issue_token(user.user_id)?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful!".to_string(),
        token,
    }))
}
