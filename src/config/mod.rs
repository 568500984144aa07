use std::env;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub web_session_expire_secs: u64,
    pub mini_program_session_expire_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        // 会话有效期以小时为单位配置
        let web_session_expire = env::var("WEB_SESSION_EXPIRE")
            .unwrap_or_else(|_| "8".into())
            .trim_end_matches('h')
            .parse::<u64>()
            .unwrap_or(8);
        let mini_program_session_expire = env::var("MINI_PROGRAM_SESSION_EXPIRE")
            .unwrap_or_else(|_| "24".into())
            .trim_end_matches('h')
            .parse::<u64>()
            .unwrap_or(24);

        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL")?,
            server_host: env::var("SERVER_HOST")?,
            server_port: env::var("SERVER_PORT")?.parse().unwrap_or(3000),
            api_base_uri: env::var("API_BASE_URI").unwrap_or_else(|_| "/api".into()),
            web_session_expire_secs: web_session_expire * 3600,
            mini_program_session_expire_secs: mini_program_session_expire * 3600,
        })
    }

    pub fn web_session_expire(&self) -> Duration {
        Duration::from_secs(self.web_session_expire_secs)
    }

    pub fn mini_program_session_expire(&self) -> Duration {
        Duration::from_secs(self.mini_program_session_expire_secs)
    }
}
