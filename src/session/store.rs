use std::sync::Arc;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};

/// 会话缓存存储边界
///
/// 会话子系统只依赖带 TTL 的 get / set / del 三个操作，
/// 存储故障原样上抛，不在这一层重试或吞掉。
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, redis::RedisError>;

    async fn set_ex(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> Result<(), redis::RedisError>;

    async fn del(&self, key: &str) -> Result<(), redis::RedisError>;
}

/// Redis 实现
pub struct RedisSessionStore {
    redis: Arc<RedisClient>,
}

impl RedisSessionStore {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, redis::RedisError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let result: Option<String> = conn.get(key).await?;
        Ok(result)
    }

    async fn set_ex(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> Result<(), redis::RedisError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(key, value, ttl_seconds).await?;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// 测试用内存存储，按读取时刻惰性判定过期
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        entries: Mutex<HashMap<String, (String, i64)>>,
    }

    impl MemoryStore {
        pub(crate) fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl SessionStore for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<String>, redis::RedisError> {
            let mut entries = self.entries.lock().unwrap();
            match entries.get(key) {
                Some((value, expires_at)) if *expires_at > chrono::Utc::now().timestamp() => {
                    Ok(Some(value.clone()))
                }
                Some(_) => {
                    entries.remove(key);
                    Ok(None)
                }
                None => Ok(None),
            }
        }

        async fn set_ex(
            &self,
            key: &str,
            value: &str,
            ttl_seconds: u64,
        ) -> Result<(), redis::RedisError> {
            let expires_at = chrono::Utc::now().timestamp() + ttl_seconds as i64;
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (value.to_string(), expires_at));
            Ok(())
        }

        async fn del(&self, key: &str) -> Result<(), redis::RedisError> {
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }
    }
}
