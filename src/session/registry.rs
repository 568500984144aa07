use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::session::codec;
use crate::session::keys::{session_key, user_index_key};
use crate::session::model::{IndexEntry, SessionSeed, SourceType, UserSession};
use crate::session::store::SessionStore;

/// 会话注册表
///
/// 会话记录与用户索引的唯一写入方。记录按会话ID落在缓存服务里，
/// TTL 与 `expires_at` 一致；索引记录每个用户当前持有的会话ID，
/// 允许悬空，读取时惰性清理。
#[derive(Clone)]
pub struct SessionRegistry {
    store: Arc<dyn SessionStore>,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// 创建会话
    ///
    /// 生成不透明的会话ID，写入记录后追加用户索引。
    /// 存储写入失败原样上抛，登录随之失败。
    pub async fn create(
        &self,
        seed: SessionSeed,
        source: SourceType,
        ttl_seconds: u64,
    ) -> Result<UserSession, redis::RedisError> {
        let now = Utc::now().timestamp();

        let session = UserSession {
            session_id: Uuid::new_v4().to_string(),
            user_id: seed.user_id,
            user_name: seed.user_name,
            source,
            powers: seed.powers,
            is_admin: seed.is_admin,
            issued_at: now,
            expires_at: now + ttl_seconds as i64,
        };

        let json = codec::encode_session(&session)?;
        self.store
            .set_ex(&session_key(&session.session_id), &json, ttl_seconds)
            .await?;

        let mut entries = self.read_index(&session.user_id).await?;
        entries.push(IndexEntry {
            session_id: session.session_id.clone(),
            expires_at: session.expires_at,
        });
        self.write_index(&session.user_id, entries).await?;

        Ok(session)
    }

    /// 获取会话
    ///
    /// 缓存未命中或解码失败都返回 None，这是过期、伪造令牌的正常结果
    pub async fn fetch(&self, session_id: &str) -> Result<Option<UserSession>, redis::RedisError> {
        match self.store.get(&session_key(session_id)).await? {
            Some(raw) => Ok(codec::decode_session(&raw)),
            None => Ok(None),
        }
    }

    /// 刷新会话的权限快照
    ///
    /// 以剩余 TTL 重写记录，`expires_at` 保持创建时的值，
    /// 权限变更不会顺带延长会话寿命。记录已消失时为无操作。
    pub async fn refresh(
        &self,
        session_id: &str,
        powers: &[String],
        is_admin: bool,
    ) -> Result<(), redis::RedisError> {
        let Some(mut session) = self.fetch(session_id).await? else {
            return Ok(());
        };

        // 与存储端 TTL 淘汰竞争时当作已消失
        let remaining = session.expires_at - Utc::now().timestamp();
        if remaining <= 0 {
            return Ok(());
        }

        session.powers = powers.to_vec();
        session.is_admin = is_admin;

        let json = codec::encode_session(&session)?;
        self.store
            .set_ex(&session_key(session_id), &json, remaining as u64)
            .await
    }

    /// 清除指定会话，幂等，撤销不存在的会话同样成功
    pub async fn revoke(&self, session_id: &str) -> Result<(), redis::RedisError> {
        let existing = self.fetch(session_id).await?;

        self.store.del(&session_key(session_id)).await?;

        // 记录还可读时顺带摘掉索引项，否则留给惰性清理
        if let Some(session) = existing {
            let mut entries = self.read_index(&session.user_id).await?;
            entries.retain(|e| e.session_id != session_id);
            self.write_index(&session.user_id, entries).await?;
        }

        Ok(())
    }

    /// 清除用户全部会话并删除索引，容忍索引里已失效的项
    pub async fn revoke_all(&self, user_id: &str) -> Result<(), redis::RedisError> {
        for entry in self.read_index(user_id).await? {
            self.store.del(&session_key(&entry.session_id)).await?;
        }
        self.store.del(&user_index_key(user_id)).await
    }

    /// 枚举用户当前可解析的会话，顺带清理悬空索引项
    pub async fn user_sessions(
        &self,
        user_id: &str,
    ) -> Result<Vec<UserSession>, redis::RedisError> {
        let entries = self.read_index(user_id).await?;

        let mut live = Vec::new();
        for entry in &entries {
            if let Some(session) = self.fetch(&entry.session_id).await? {
                live.push(session);
            }
        }

        if live.len() != entries.len() {
            let keep = live
                .iter()
                .map(|s| IndexEntry {
                    session_id: s.session_id.clone(),
                    expires_at: s.expires_at,
                })
                .collect();
            self.write_index(user_id, keep).await?;
        }

        Ok(live)
    }

    async fn read_index(&self, user_id: &str) -> Result<Vec<IndexEntry>, redis::RedisError> {
        match self.store.get(&user_index_key(user_id)).await? {
            Some(raw) => Ok(codec::decode_index(&raw)),
            None => Ok(Vec::new()),
        }
    }

    /// 重写用户索引，TTL 取成员中最晚的过期时间
    async fn write_index(
        &self,
        user_id: &str,
        mut entries: Vec<IndexEntry>,
    ) -> Result<(), redis::RedisError> {
        let now = Utc::now().timestamp();
        entries.retain(|e| e.expires_at > now);

        if entries.is_empty() {
            return self.store.del(&user_index_key(user_id)).await;
        }

        let ttl = entries.iter().map(|e| e.expires_at).max().unwrap_or(now) - now;
        let json = codec::encode_index(&entries)?;
        self.store
            .set_ex(&user_index_key(user_id), &json, ttl as u64)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::memory::MemoryStore;

    fn registry() -> (Arc<MemoryStore>, SessionRegistry) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), SessionRegistry::new(store))
    }

    fn seed(user_id: &str) -> SessionSeed {
        SessionSeed {
            user_id: user_id.to_string(),
            user_name: format!("{}号操作员", user_id),
            is_admin: false,
            powers: vec!["PRIV_ONLINE_VIEW".to_string()],
        }
    }

    #[tokio::test]
    async fn create_then_fetch() {
        let (_, registry) = registry();
        let session = registry
            .create(seed("alice"), SourceType::Web, 3600)
            .await
            .unwrap();

        let fetched = registry.fetch(&session.session_id).await.unwrap().unwrap();
        assert_eq!(fetched.user_id, "alice");
        assert_eq!(fetched.source, SourceType::Web);
        assert_eq!(fetched.expires_at, fetched.issued_at + 3600);
    }

    #[tokio::test]
    async fn fetch_after_revoke_is_absent() {
        let (_, registry) = registry();
        let session = registry
            .create(seed("alice"), SourceType::Web, 3600)
            .await
            .unwrap();

        registry.revoke(&session.session_id).await.unwrap();
        assert!(registry.fetch(&session.session_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn revoke_unknown_session_is_ok() {
        let (_, registry) = registry();
        registry.revoke("no-such-session").await.unwrap();
    }

    #[tokio::test]
    async fn refresh_replaces_powers_without_extending_expiry() {
        let (_, registry) = registry();
        let session = registry
            .create(seed("alice"), SourceType::Web, 3600)
            .await
            .unwrap();
        let original_expiry = session.expires_at;

        let new_powers = vec!["PRIV_ONLINE_VIEW".to_string(), "PRIV_USERS_UPDATE".to_string()];
        for _ in 0..3 {
            tokio::time::sleep(std::time::Duration::from_millis(400)).await;
            registry
                .refresh(&session.session_id, &new_powers, true)
                .await
                .unwrap();
        }

        let fetched = registry.fetch(&session.session_id).await.unwrap().unwrap();
        assert_eq!(fetched.expires_at, original_expiry);
        assert!(fetched.is_admin);
        assert!(fetched.has_power("PRIV_USERS_UPDATE"));
    }

    #[tokio::test]
    async fn refresh_missing_session_is_noop() {
        let (_, registry) = registry();
        registry.refresh("gone", &[], false).await.unwrap();
    }

    #[tokio::test]
    async fn corrupted_record_is_absent() {
        let (store, registry) = registry();
        store
            .set_ex(&session_key("broken"), "not a session", 60)
            .await
            .unwrap();

        assert!(registry.fetch("broken").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn dangling_index_entries_are_pruned() {
        let (store, registry) = registry();
        let s1 = registry
            .create(seed("alice"), SourceType::Web, 3600)
            .await
            .unwrap();
        let s2 = registry
            .create(seed("alice"), SourceType::Web, 3600)
            .await
            .unwrap();

        // 模拟存储端先行淘汰其中一条记录，索引未同步更新
        store.del(&session_key(&s1.session_id)).await.unwrap();

        let live = registry.user_sessions("alice").await.unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].session_id, s2.session_id);

        // 悬空项已被清理，再次枚举结果一致
        let live = registry.user_sessions("alice").await.unwrap();
        assert_eq!(live.len(), 1);
    }

    #[tokio::test]
    async fn revoke_all_clears_every_session() {
        let (_, registry) = registry();
        let s1 = registry
            .create(seed("alice"), SourceType::Web, 3600)
            .await
            .unwrap();
        let s2 = registry
            .create(seed("alice"), SourceType::MiniProgram, 3600)
            .await
            .unwrap();

        registry.revoke_all("alice").await.unwrap();

        assert!(registry.fetch(&s1.session_id).await.unwrap().is_none());
        assert!(registry.fetch(&s2.session_id).await.unwrap().is_none());
        assert!(registry.user_sessions("alice").await.unwrap().is_empty());
    }
}
