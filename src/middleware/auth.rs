use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::AppState;
use crate::error::AppError;
use crate::session::UserSession;

/// 认证中间件
///
/// 从 Authorization 头取出会话令牌并经注册表解析，
/// 命中后把会话放进请求扩展供处理器读取。
/// 未命中按未登录拒绝；缓存服务故障按服务异常拒绝，不降级放行。
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    let Some(token) = token else {
        return Err(AppError::Unauthenticated);
    };

    match state.sessions.registry().fetch(&token).await? {
        Some(session) => {
            request.extensions_mut().insert(session);
            Ok(next.run(request).await)
        }
        None => Err(AppError::Unauthenticated),
    }
}

/// 校验会话是否持有指定权限，管理员不受限
pub fn require_power(session: &UserSession, power: &str) -> Result<(), AppError> {
    if session.is_admin || session.has_power(power) {
        Ok(())
    } else {
        tracing::debug!("用户 {} 缺少权限 {}", session.user_id, power);
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SourceType;

    fn session(powers: &[&str], is_admin: bool) -> UserSession {
        UserSession {
            session_id: "sid".into(),
            user_id: "alice".into(),
            user_name: "alice".into(),
            source: SourceType::Web,
            powers: powers.iter().map(|p| p.to_string()).collect(),
            is_admin,
            issued_at: 0,
            expires_at: 0,
        }
    }

    #[test]
    fn power_check_matches_snapshot() {
        let s = session(&["PRIV_ONLINE_VIEW"], false);
        assert!(require_power(&s, "PRIV_ONLINE_VIEW").is_ok());
        assert!(require_power(&s, "PRIV_ONLINE_DELETE").is_err());
    }

    #[test]
    fn admin_bypasses_power_check() {
        let s = session(&[], true);
        assert!(require_power(&s, "PRIV_USERS_DELETE").is_ok());
    }
}
