use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct OnlineQueryRequest {
    /// 按用户ID、会话ID或来源IP模糊匹配
    pub query_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OnlineDeleteRequest {
    pub session_ids: Vec<String>,
}
