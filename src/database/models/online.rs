use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::session::UserSession;

/// 在线用户审计实体
///
/// 运维侧“查看与踢出在线用户”的数据来源，
/// 不在认证关键路径上，权威状态始终以缓存里的会话记录为准。
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct OnlineEntity {
    pub id: String,
    pub session_id: String,
    pub user_id: String,
    pub user_name: String,
    pub source: String,
    pub ip_address: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl OnlineEntity {
    pub fn from_session(session: &UserSession, ip_address: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session.session_id.clone(),
            user_id: session.user_id.clone(),
            user_name: session.user_name.clone(),
            source: session.source.as_str().to_string(),
            ip_address,
            issued_at: DateTime::from_timestamp(session.issued_at, 0).unwrap_or_default(),
            expires_at: DateTime::from_timestamp(session.expires_at, 0).unwrap_or_default(),
        }
    }
}
