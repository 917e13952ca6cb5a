use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use school_backend::{
    AppState, build_router,
    cache::{RedisTokenStore, TokenStore},
    config::Config,
    database::postgres::PgStore,
    infrastructure::{TokenGuard, spawn_token_sweeper},
    routes::user::operation::ensure_admin,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // 设置数据库连接池并执行迁移
    let store = PgStore::connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    // 设置 Redis 客户端
    let redis_client =
        redis::Client::open(config.redis_url.clone()).expect("Failed to create Redis client");
    let tokens: Arc<dyn TokenStore> = Arc::new(RedisTokenStore::new(Arc::new(redis_client)));

    // 设置应用状态
    let state = AppState {
        store: Arc::new(store),
        guard: TokenGuard::new(&config.jwt_secret, config.jwt_expiration(), tokens.clone()),
        config: config.clone(),
    };

    if let Err(e) = ensure_admin(state.store.as_ref(), &state.config).await {
        tracing::error!("Failed to bootstrap administrator: {}", e);
    }

    // 定期清理令牌
    let _sweeper = spawn_token_sweeper(tokens, config.token_sweep_interval());

    let app = build_router(state.clone());

    // 启动服务器
    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app,
    )
    .await
    .expect("Failed to start server");
}
