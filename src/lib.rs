use std::sync::Arc;

use redis::Client as RedisClient;
use sqlx::PgPool;

pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod utils;

use config::Config;
use session::SessionPolicy;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub redis: Arc<RedisClient>,
    pub sessions: SessionPolicy,
}
