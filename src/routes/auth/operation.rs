use axum::http::StatusCode;

use crate::database::Store;
use crate::error::{AppError, AppResult};
use crate::infrastructure::TokenGuard;
use crate::models::LifecycleStatus;
use crate::result::ExecuteResponse;
use crate::utils::{messages, verify_password};

use super::model::{LoginRequest, LoginResponse};

pub async fn login(
    store: &dyn Store,
    guard: &TokenGuard,
    req: LoginRequest,
) -> AppResult<LoginResponse> {
    let user = store
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(|| {
            AppError::Unauthorized(format!("This email \"{}\" is not found", req.email))
        })?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthorized(messages::PASSWORD_MISMATCH.into()));
    }

    if user.status.is(LifecycleStatus::Deleted) {
        return Err(AppError::Unauthorized(messages::USER_INACTIVE.into()));
    }

    let access_token = guard.issue(&user).await?;
    tracing::info!("user {} logged in", user.uuid);

    Ok(LoginResponse {
        status_code: StatusCode::OK.as_u16(),
        message: messages::LOGIN_SUCCESS.into(),
        access_token,
        id: user.uuid,
    })
}

/// Revokes the presented token. The route is guarded, so the token exists.
pub async fn logout(guard: &TokenGuard, token: &str) -> AppResult<ExecuteResponse> {
    guard.revoke(token).await?;
    Ok(ExecuteResponse::new(StatusCode::OK, messages::LOGOUT_SUCCESS))
}

pub fn test_token() -> ExecuteResponse {
    ExecuteResponse::new(StatusCode::OK, messages::TOKEN_VALID)
}
