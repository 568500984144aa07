use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use mes_backend::{
    AppState,
    config::Config,
    middleware::{auth_middleware, log_errors},
    routes,
    session::{RedisSessionStore, SessionPolicy, SessionRegistry, SessionTtls},
};
use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
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

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    // 设置数据库连接池
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'mes_backend';").await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    // 设置 Redis 客户端与会话子系统
    let redis_client =
        redis::Client::open(config.redis_url.clone()).expect("Failed to create Redis client");
    let redis_arc = Arc::new(redis_client);

    let registry = SessionRegistry::new(Arc::new(RedisSessionStore::new(redis_arc.clone())));
    let sessions = SessionPolicy::new(registry, SessionTtls::from_config(&config));

    // 设置应用状态
    let state = AppState {
        pool,
        config: config.clone(),
        redis: redis_arc,
        sessions,
    };

    // 将路由分为公开路由和受保护路由
    let public_routes = Router::new()
        .route("/auth/login", post(routes::auth::login))
        .route(
            "/auth/login-mini-program",
            post(routes::auth::login_mini_program),
        );

    let protected_routes = Router::new()
        // 会话自助接口
        .route("/auth/logout", get(routes::auth::logout))
        .route("/auth/user-info", get(routes::auth::get_user_info))
        // 在线用户管理
        .route("/online/query", post(routes::online::query))
        .route("/online/delete", post(routes::online::delete))
        // 用户管理
        .route("/users/update", post(routes::users::update))
        .route("/users/delete", post(routes::users::delete))
        // 角色权限管理
        .route("/role-powers/get", get(routes::role_powers::get_role_powers))
        .route(
            "/role-powers/update",
            post(routes::role_powers::update_role_powers),
        )
        // 应用认证中间件
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // 创建基础路由
    let router = Router::new().nest(
        &state.config.api_base_uri.clone(),
        Router::new().merge(public_routes).merge(protected_routes),
    );

    // 添加日志中间件
    let router = router.layer(axum::middleware::from_fn(log_errors));

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    // 添加应用状态
    let app = router.with_state(state.clone());

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
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
