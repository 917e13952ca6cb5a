use axum::{
    Extension, Json, Router,
    extract::State,
    http::{Method, StatusCode, Uri},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::{log_errors, require_admin, require_auth};
use crate::models::GroupKind;
use crate::result::ExecuteResponse;
use crate::routes::{auth, group, level, subject, user};

// 公开路由
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
}

// 需要登录的路由
fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/test-token", get(auth::test_token))
        // 用户
        .route("/users", get(user::find_all).post(user::create))
        .route(
            "/users/{id}",
            get(user::find_one).patch(user::update).delete(user::remove),
        )
        .route("/users/{id}/roles", get(user::list_roles))
        .route("/users/{id}/rules", get(user::list_rules))
        // 班级
        .route("/level", get(level::find_all).post(level::create))
        .route("/level/subject", post(level::create_subject_links))
        .route(
            "/level/subject/{id}",
            patch(level::update_subject_link).delete(level::delete_subject_link),
        )
        .route(
            "/level/{id}",
            get(level::find_one).patch(level::update).delete(level::remove),
        )
        .route("/level/{id}/subjects", get(level::list_subject_links))
        // 科目
        .route("/subjects", get(subject::find_all).post(subject::create))
        .route(
            "/subjects/{id}",
            get(subject::find_one)
                .patch(subject::update)
                .delete(subject::remove),
        )
}

// 仅管理员
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users/roles", post(user::create_role_links))
        .route("/users/rules", post(user::create_rule_links))
        .route("/users/roles/{id}", delete(user::delete_role_link))
        .route("/users/rules/{id}", delete(user::delete_rule_link))
}

/// `/roles` and `/rules` share every handler; the kind travels as an extension.
fn group_routes(state: &AppState, kind: GroupKind) -> Router<AppState> {
    let reads = Router::new()
        .route("/", get(group::find_all))
        .route("/{id}", get(group::find_one))
        .route("/{id}/menu", get(group::list_menu_links))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let writes = Router::new()
        .route("/", post(group::create))
        .route("/{id}", patch(group::update).delete(group::remove))
        .route("/menu", post(group::create_menu_links))
        .route("/menu/privilege", patch(group::update_privileges))
        .route("/menu/{id}", delete(group::delete_menu_link))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    reads.merge(writes).layer(Extension(kind))
}

async fn health(State(state): State<AppState>) -> AppResult<Json<ExecuteResponse>> {
    state.store.health_check().await?;
    Ok(Json(ExecuteResponse::new(StatusCode::OK, "ok")))
}

async fn fallback(method: Method, uri: Uri) -> (StatusCode, Json<ExecuteResponse>) {
    let status = StatusCode::NOT_FOUND;
    (
        status,
        Json(ExecuteResponse::new(
            status,
            format!("Cannot {} {}", method, uri.path()),
        )),
    )
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(public_routes())
        .merge(
            protected_routes().route_layer(from_fn_with_state(state.clone(), require_auth)),
        )
        .merge(admin_routes().route_layer(from_fn_with_state(state.clone(), require_admin)))
        .nest("/roles", group_routes(&state, GroupKind::Role))
        .nest("/rules", group_routes(&state, GroupKind::Rule));

    let base = state.config.api_base_uri.trim_end_matches('/');
    let router = if base.is_empty() {
        api
    } else {
        Router::new().nest(base, api)
    };

    router
        .fallback(fallback)
        .layer(from_fn(log_errors))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
