use crate::config::Config;
use crate::session::model::{SessionSeed, SourceType, UserSession};
use crate::session::registry::SessionRegistry;

/// 各来源类型的会话有效期
#[derive(Debug, Clone, Copy)]
pub struct SessionTtls {
    pub web_secs: u64,
    pub mini_program_secs: u64,
}

impl SessionTtls {
    pub fn from_config(config: &Config) -> Self {
        Self {
            web_secs: config.web_session_expire_secs,
            mini_program_secs: config.mini_program_session_expire_secs,
        }
    }

    pub fn for_source(&self, source: SourceType) -> u64 {
        match source {
            SourceType::Web => self.web_secs,
            SourceType::MiniProgram => self.mini_program_secs,
        }
    }
}

/// 会话策略
///
/// 登录时按来源类型选取有效期并执行单会话策略；
/// 管理侧的权限变更、禁用、删除、踢出都经由这里落到注册表上。
#[derive(Clone)]
pub struct SessionPolicy {
    registry: SessionRegistry,
    ttls: SessionTtls,
}

impl SessionPolicy {
    pub fn new(registry: SessionRegistry, ttls: SessionTtls) -> Self {
        Self { registry, ttls }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// 登录创建会话
    ///
    /// `one_session` 用户先撤销其余会话，后登录者胜出。
    /// 撤销与创建不是原子对：同一用户并发登录可能交错，
    /// 一方的新会话被另一方顺带撤销，这是已知并接受的竞态。
    pub async fn login(
        &self,
        seed: SessionSeed,
        one_session: bool,
        source: SourceType,
    ) -> Result<UserSession, redis::RedisError> {
        if one_session {
            self.registry.revoke_all(&seed.user_id).await?;
        }

        let ttl = self.ttls.for_source(source);
        self.registry.create(seed, source, ttl).await
    }

    /// 把最新权限快照推送到用户的全部在线会话
    ///
    /// 尽力而为：单个会话刷新失败只记录日志，不使触发它的管理操作失败。
    /// 刷新期间新建的会话可能被漏过，留待下一次管理操作或自然过期。
    pub async fn refresh_user(&self, user_id: &str, powers: &[String], is_admin: bool) {
        let sessions = match self.registry.user_sessions(user_id).await {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::warn!("枚举用户 {} 会话失败: {}", user_id, e);
                return;
            }
        };

        for session in sessions {
            if let Err(e) = self
                .registry
                .refresh(&session.session_id, powers, is_admin)
                .await
            {
                tracing::warn!("刷新会话 {} 失败: {}", session.session_id, e);
            }
        }
    }

    /// 禁用或删除用户后立即撤销其全部会话
    pub async fn revoke_user(&self, user_id: &str) {
        if let Err(e) = self.registry.revoke_all(user_id).await {
            tracing::warn!("撤销用户 {} 会话失败: {}", user_id, e);
        }
    }

    /// 强制下线指定会话列表
    pub async fn kick(&self, session_ids: &[String]) {
        for session_id in session_ids {
            if let Err(e) = self.registry.revoke(session_id).await {
                tracing::warn!("踢出会话 {} 失败: {}", session_id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::session::store::memory::MemoryStore;

    fn policy() -> SessionPolicy {
        let registry = SessionRegistry::new(Arc::new(MemoryStore::new()));
        SessionPolicy::new(
            registry,
            SessionTtls {
                web_secs: 8 * 3600,
                mini_program_secs: 24 * 3600,
            },
        )
    }

    fn seed(user_id: &str, powers: &[&str]) -> SessionSeed {
        SessionSeed {
            user_id: user_id.to_string(),
            user_name: format!("{}号操作员", user_id),
            is_admin: false,
            powers: powers.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn ttl_follows_source_type() {
        let policy = policy();

        let web = policy
            .login(seed("alice", &[]), false, SourceType::Web)
            .await
            .unwrap();
        let mini = policy
            .login(seed("alice", &[]), false, SourceType::MiniProgram)
            .await
            .unwrap();

        assert_eq!(web.expires_at - web.issued_at, 8 * 3600);
        assert_eq!(mini.expires_at - mini.issued_at, 24 * 3600);
    }

    #[tokio::test]
    async fn one_session_second_login_evicts_first() {
        let policy = policy();

        let s1 = policy
            .login(seed("alice", &[]), true, SourceType::Web)
            .await
            .unwrap();
        let s2 = policy
            .login(seed("alice", &[]), true, SourceType::Web)
            .await
            .unwrap();

        assert!(policy.registry().fetch(&s1.session_id).await.unwrap().is_none());
        assert!(policy.registry().fetch(&s2.session_id).await.unwrap().is_some());
        assert_eq!(policy.registry().user_sessions("alice").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn one_session_applies_across_source_types() {
        let policy = policy();

        let s1 = policy
            .login(seed("alice", &[]), true, SourceType::Web)
            .await
            .unwrap();
        let s2 = policy
            .login(seed("alice", &[]), true, SourceType::MiniProgram)
            .await
            .unwrap();

        assert!(policy.registry().fetch(&s1.session_id).await.unwrap().is_none());
        let live = policy.registry().fetch(&s2.session_id).await.unwrap().unwrap();
        assert_eq!(live.source, SourceType::MiniProgram);
    }

    #[tokio::test]
    async fn multiple_sessions_allowed_without_flag() {
        let policy = policy();

        let s1 = policy
            .login(seed("bob", &[]), false, SourceType::Web)
            .await
            .unwrap();
        let s2 = policy
            .login(seed("bob", &[]), false, SourceType::MiniProgram)
            .await
            .unwrap();

        assert!(policy.registry().fetch(&s1.session_id).await.unwrap().is_some());
        assert!(policy.registry().fetch(&s2.session_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn refresh_user_updates_all_live_sessions() {
        let policy = policy();

        let s1 = policy
            .login(seed("bob", &["PRIV_ONLINE_VIEW"]), false, SourceType::Web)
            .await
            .unwrap();
        let s2 = policy
            .login(seed("bob", &["PRIV_ONLINE_VIEW"]), false, SourceType::MiniProgram)
            .await
            .unwrap();

        // 角色新增权限后推送快照，无需重新登录即可见
        let new_powers = vec![
            "PRIV_ONLINE_VIEW".to_string(),
            "PRIV_ROLEPOWERS_UPDATE".to_string(),
        ];
        policy.refresh_user("bob", &new_powers, false).await;

        for sid in [&s1.session_id, &s2.session_id] {
            let session = policy.registry().fetch(sid).await.unwrap().unwrap();
            assert!(session.has_power("PRIV_ROLEPOWERS_UPDATE"));
        }
    }

    #[tokio::test]
    async fn disabled_user_sessions_become_absent() {
        let policy = policy();

        let session = policy
            .login(seed("alice", &["PRIV_USERS_VIEW"]), false, SourceType::Web)
            .await
            .unwrap();
        assert!(policy.registry().fetch(&session.session_id).await.unwrap().is_some());

        policy.revoke_user("alice").await;
        assert!(policy.registry().fetch(&session.session_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn kick_revokes_only_listed_sessions() {
        let policy = policy();

        let s1 = policy
            .login(seed("bob", &[]), false, SourceType::Web)
            .await
            .unwrap();
        let s2 = policy
            .login(seed("bob", &[]), false, SourceType::Web)
            .await
            .unwrap();

        policy.kick(&[s1.session_id.clone(), "already-gone".to_string()]).await;

        assert!(policy.registry().fetch(&s1.session_id).await.unwrap().is_none());
        assert!(policy.registry().fetch(&s2.session_id).await.unwrap().is_some());
    }
}
