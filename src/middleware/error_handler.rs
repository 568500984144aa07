use axum::{
    body::{Body, to_bytes},
    extract::Request,
    middleware::Next,
    response::Response,
};
use tracing::error;

/// 记录服务端错误响应的内容，便于排查
pub async fn log_errors(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    if response.status().is_server_error() {
        let (mut parts, body) = response.into_parts();
        let bytes = match to_bytes(body, 4096).await {
            Ok(b) => b,
            Err(e) => {
                error!("读取错误响应体失败: {}", e);
                return Response::from_parts(parts, Body::empty());
            }
        };

        error!(
            "Server error - {} {} - Status: {}, Body: {}",
            method,
            uri,
            parts.status,
            String::from_utf8_lossy(&bytes)
        );

        // 重建响应体
        parts.headers.remove(axum::http::header::CONTENT_LENGTH);
        Response::from_parts(parts, Body::from(bytes))
    } else {
        response
    }
}
