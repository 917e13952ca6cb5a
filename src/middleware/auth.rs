use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppState;
use crate::error::AppError;
use crate::infrastructure::bearer_token;

/// Any valid token. The resolved claims ride along as a request extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers());
    let claims = state.guard.validate(token.as_deref()).await?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// A valid token whose holder is an administrator.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers());
    let claims = state.guard.validate(token.as_deref()).await?;
    state.guard.require_admin(&claims)?;

    tracing::debug!("admin {} -> {}", claims.sub, request.uri().path());
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
