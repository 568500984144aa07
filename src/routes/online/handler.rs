use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    database::OnlineOperations,
    error::AppError,
    middleware::require_power,
    session::UserSession,
    utils::success_to_api_response,
};

use super::model::{OnlineDeleteRequest, OnlineQueryRequest};

/// 查询在线用户列表
#[axum::debug_handler]
pub async fn query(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(req): Json<OnlineQueryRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_power(&session, "PRIV_ONLINE_VIEW")?;

    let query_text = req
        .query_text
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let records = OnlineOperations::query(&state.pool, query_text).await?;

    Ok((StatusCode::OK, success_to_api_response(records)))
}

/// 踢出在线用户
#[axum::debug_handler]
pub async fn delete(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(req): Json<OnlineDeleteRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_power(&session, "PRIV_ONLINE_DELETE")?;

    state.sessions.kick(&req.session_ids).await;

    for session_id in &req.session_ids {
        if let Err(e) = OnlineOperations::delete_by_session(&state.pool, session_id).await {
            tracing::warn!("清理会话 {} 审计记录失败: {}", session_id, e);
        }
    }

    tracing::info!(
        "用户 {} 踢出 {} 个会话",
        session.user_id,
        req.session_ids.len()
    );

    Ok((StatusCode::OK, success_to_api_response(())))
}
