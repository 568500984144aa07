/// 会话记录缓存键前缀
const SESSION_PREFIX: &str = "session:";

/// 用户会话索引缓存键前缀
const USER_INDEX_PREFIX: &str = "session:user:";

/// 生成会话记录缓存键
pub fn session_key(session_id: &str) -> String {
    format!("{}{}", SESSION_PREFIX, session_id)
}

/// 生成用户会话索引缓存键
pub fn user_index_key(user_id: &str) -> String {
    format!("{}{}", USER_INDEX_PREFIX, user_id)
}
