use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 用户账户实体
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct UserEntity {
    pub user_id: String,
    pub user_name: String,
    pub nick_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password: String,
    pub enabled: bool,
    /// 单会话策略：登录时撤销该用户其他在线会话
    pub one_session: bool,
    pub is_admin: bool,
    pub remark: Option<String>,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

/// 用户资料更新参数
#[derive(Debug, Clone)]
pub struct UserProfileUpdate {
    pub user_id: String,
    pub user_name: String,
    pub nick_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub remark: Option<String>,
    pub enabled: bool,
    pub one_session: bool,
}
