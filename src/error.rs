use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::utils::{error_codes, error_to_api_response};

/// 应用级错误
///
/// 未登录与无权限是两种不同的失败信号，分别映射 401 和 403；
/// 缓存或数据库故障不做内部重试，直接作为当前操作的失败返回。
#[derive(Debug)]
pub enum AppError {
    /// 未登录或会话已失效
    Unauthenticated,
    /// 已登录但缺少所需权限
    Forbidden,
    /// 请求参数无效
    Validation(String),
    /// 缓存服务故障
    Store(String),
    /// 数据库故障
    Database(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, msg) = match self {
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                error_codes::AUTH_FAILED,
                "未登录或登录已过期".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                error_codes::PERMISSION_DENIED,
                "没有操作权限".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR, msg),
            AppError::Store(msg) => {
                tracing::error!("Cache store failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_codes::INTERNAL_ERROR,
                    "缓存服务异常".to_string(),
                )
            }
            AppError::Database(msg) => {
                tracing::error!("Database failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_codes::INTERNAL_ERROR,
                    "数据库异常".to_string(),
                )
            }
        };

        (status, error_to_api_response::<()>(code, msg)).into_response()
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Store(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}
