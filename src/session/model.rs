use serde::{Deserialize, Serialize};

/// 会话来源类型，决定默认有效期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    Web,
    MiniProgram,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Web => "Web",
            SourceType::MiniProgram => "MiniProgram",
        }
    }
}

/// 会话缓存数据模型
///
/// 权限快照在创建或刷新时写入，请求路径只读快照，不回查角色表。
/// 除显式刷新外记录不可变。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserSession {
    pub session_id: String,
    pub user_id: String,
    pub user_name: String,
    pub source: SourceType,
    pub powers: Vec<String>,
    pub is_admin: bool,
    pub issued_at: i64,  // Unix timestamp
    pub expires_at: i64, // Unix timestamp
}

impl UserSession {
    pub fn has_power(&self, power: &str) -> bool {
        self.powers.iter().any(|p| p == power)
    }
}

/// 创建会话所需的用户信息
#[derive(Debug, Clone)]
pub struct SessionSeed {
    pub user_id: String,
    pub user_name: String,
    pub is_admin: bool,
    pub powers: Vec<String>,
}

/// 用户会话索引项
///
/// 索引允许悬空：缓存服务按 TTL 清除会话记录时不会同步更新索引，
/// 读取方必须把解析不到的索引项当作不存在并顺带清理。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IndexEntry {
    pub session_id: String,
    pub expires_at: i64, // Unix timestamp
}
