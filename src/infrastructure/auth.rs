use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderMap;
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::cache::{CachedToken, TokenStore};
use crate::error::{AppError, AppResult};
use crate::models::UserRecord;
use crate::utils::{generate_public_id, messages};

/// Claims embedded in every issued token. `sub` is the user's public id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Issues, validates and revokes bearer tokens.
///
/// A token is accepted only while its store record exists, has not expired
/// and its signature verifies against the configured secret. The store check
/// and the signature check fail independently.
#[derive(Clone)]
pub struct TokenGuard {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    store: Arc<dyn TokenStore>,
}

impl TokenGuard {
    pub fn new(secret: &str, ttl: Duration, store: Arc<dyn TokenStore>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub async fn issue(&self, user: &UserRecord) -> AppResult<String> {
        let iat = chrono::Utc::now().timestamp();
        let exp = iat + self.ttl.as_secs() as i64;

        let claims = Claims {
            sub: user.uuid.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            iat,
            exp,
            jti: generate_public_id(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;

        self.store
            .save(
                &token,
                CachedToken {
                    user_id: user.uuid.clone(),
                    expires_at: exp,
                },
            )
            .await?;

        tracing::debug!("issued token for user {}", user.uuid);
        Ok(token)
    }

    pub async fn validate(&self, token: Option<&str>) -> AppResult<Claims> {
        let token = token.ok_or_else(|| AppError::Unauthorized(messages::TOKEN_MISSING.into()))?;

        let entry = self
            .store
            .find(token)
            .await?
            .ok_or_else(|| AppError::Unauthorized(messages::TOKEN_INVALID.into()))?;

        if entry.is_expired(chrono::Utc::now().timestamp()) {
            // 过期的记录顺手清掉，失败也不影响结果
            if let Err(e) = self.store.remove(token).await {
                tracing::warn!("failed to drop expired token: {}", e);
            }
            return Err(AppError::Unauthorized(messages::TOKEN_INVALID.into()));
        }

        let claims = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("token signature rejected: {}", e);
                AppError::Unauthorized(messages::TOKEN_VERIFICATION_FAILED.into())
            })?;

        if claims.sub != entry.user_id {
            return Err(AppError::Unauthorized(
                messages::TOKEN_VERIFICATION_FAILED.into(),
            ));
        }

        Ok(claims)
    }

    pub async fn revoke(&self, token: &str) -> AppResult<()> {
        self.store.remove(token).await?;
        Ok(())
    }

    pub fn require_admin(&self, claims: &Claims) -> AppResult<()> {
        if claims.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden(messages::ADMIN_ONLY.into()))
        }
    }
}

/// Bearer credential from the `Authorization` header, if well-formed.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}

/// Purges every token record on a fixed period. Failures are logged and the
/// loop keeps going.
pub fn spawn_token_sweeper(store: Arc<dyn TokenStore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // 第一次 tick 立即返回，跳过启动时的清理
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match store.purge_all().await {
                Ok(removed) => tracing::info!("token sweep removed {} records", removed),
                Err(e) => tracing::error!("token sweep failed: {}", e),
            }
        }
    })
}
