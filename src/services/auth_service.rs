use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use sea_orm::EntityTrait;

use crate::{
    dto::auth::{Claims, LoginRequest, LoginResponse},
    entity::{roles::Entity as Roles, users::Entity as Users},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    naming::names_match,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { username, password } = payload;

    // Username lookup follows the same ordinal case-insensitive rule as the
    // uniqueness checks; the password must match exactly.
    let users = Users::find().all(&state.orm).await?;
    let user = users
        .into_iter()
        .find(|u| names_match(&u.username, &username));

    let user = match user {
        Some(u) if u.password == password.trim() => u,
        _ => return Err(AppError::BadRequest("Invalid user name or password!".into())),
    };

    if !user.is_active {
        return Err(AppError::BadRequest("User is not active!".into()));
    }

    let role = Roles::find_by_id(user.role_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("user role is missing")))?;

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.username.clone(),
        role: role.name.clone(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    let resp = LoginResponse {
        token: format!("Bearer {}", token),
    };

    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

/// Bearer tokens are discarded client-side; logout only acknowledges.
pub fn logout_user(_user: &AuthUser) -> ApiResponse<serde_json::Value> {
    ApiResponse::success("Logged out", serde_json::json!({}), Some(Meta::empty()))
}
