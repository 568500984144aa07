use crate::session::model::{IndexEntry, UserSession};

/// 序列化会话记录
pub fn encode_session(session: &UserSession) -> Result<String, redis::RedisError> {
    serde_json::to_string(session).map_err(|e| {
        redis::RedisError::from((redis::ErrorKind::IoError, "序列化错误", e.to_string()))
    })
}

/// 反序列化会话记录
///
/// 解码失败视为记录不存在，过期或被污染的值不作为错误上抛
pub fn decode_session(raw: &str) -> Option<UserSession> {
    serde_json::from_str(raw).ok()
}

/// 序列化用户会话索引
pub fn encode_index(entries: &[IndexEntry]) -> Result<String, redis::RedisError> {
    serde_json::to_string(entries).map_err(|e| {
        redis::RedisError::from((redis::ErrorKind::IoError, "序列化错误", e.to_string()))
    })
}

/// 反序列化用户会话索引，解码失败按空索引处理
pub fn decode_index(raw: &str) -> Vec<IndexEntry> {
    serde_json::from_str(raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_garbage_session_is_absent() {
        assert!(decode_session("not json").is_none());
        assert!(decode_session("{\"session_id\":1}").is_none());
    }

    #[test]
    fn decode_garbage_index_is_empty() {
        assert!(decode_index("???").is_empty());
    }
}
