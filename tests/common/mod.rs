#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use school_backend::{
    AppState, build_router,
    cache::MemoryTokenStore,
    config::Config,
    database::{Store, memory::MemoryStore},
    infrastructure::TokenGuard,
    models::{LifecycleStatus, NewUser},
    utils::{generate_public_id, hash_password},
};

pub const ADMIN_EMAIL: &str = "admin@school.test";
pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const STAFF_EMAIL: &str = "staff@school.test";
pub const STAFF_PASSWORD: &str = "staff-pass";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".into(),
        redis_url: "redis://unused".into(),
        jwt_secret: "test-secret".into(),
        jwt_expiration_secs: 8 * 3600,
        server_host: "127.0.0.1".into(),
        server_port: 0,
        api_base_uri: "/api".into(),
        bcrypt_cost: 4 /* bcrypt minimum cost */,
        default_user_password: "1234".into(),
        token_sweep_interval_secs: 3600,
        admin_email: None,
        admin_password: None,
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
    pub tokens: MemoryTokenStore,
}

impl TestApp {
    pub fn new() -> Self {
        let config = test_config();
        let store = MemoryStore::new();
        let tokens = MemoryTokenStore::new();

        let state = AppState {
            store: Arc::new(store.clone()),
            guard: TokenGuard::new(
                &config.jwt_secret,
                Duration::from_secs(config.jwt_expiration_secs),
                Arc::new(tokens.clone()),
            ),
            config,
        };

        Self {
            router: build_router(state),
            store,
            tokens,
        }
    }

    /// Inserts an active user directly and returns its public id.
    pub async fn seed_user(&self, email: &str, password: &str, is_admin: bool) -> String {
        let active = self
            .store
            .find_status(LifecycleStatus::Active.code())
            .await
            .unwrap()
            .unwrap();
        let uuid = generate_public_id();
        self.store
            .insert_user(NewUser {
                uuid: uuid.clone(),
                first_name: "Seed".into(),
                last_name: "User".into(),
                email: email.into(),
                address: "1 School Road".into(),
                phone_number1: "0100000000".into(),
                phone_number2: None,
                is_full_time: true,
                net_salary_per_month: None,
                net_salary_per_hour: None,
                monthly_working_hour: None,
                is_admin,
                password_hash: hash_password(password, 4 /* bcrypt minimum cost */).unwrap(),
                status_id: active.id,
            })
            .await
            .unwrap();
        uuid
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/api/auth/login",
                None,
                Some(serde_json::json!({"email": email, "password": password})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, true).await;
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    pub async fn staff_token(&self) -> String {
        self.seed_user(STAFF_EMAIL, STAFF_PASSWORD, false).await;
        self.login(STAFF_EMAIL, STAFF_PASSWORD).await
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Public id of the first active row under `path` whose designation matches.
    pub async fn find_uuid(&self, path: &str, token: &str, keyword: &str) -> String {
        let (status, body) = self
            .send(
                "GET",
                &format!("/api{path}?status=ACT&value={keyword}"),
                Some(token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"][0]["uuid"].as_str().unwrap().to_string()
    }
}

pub fn assert_envelope(body: &Value, status: StatusCode) {
    assert_eq!(body["statusCode"], status.as_u16(), "{body}");
    assert!(body["message"].is_string(), "{body}");
}
