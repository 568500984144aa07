use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    database::{OnlineOperations, PowerOperations, UserOperations},
    error::AppError,
    middleware::require_power,
    session::UserSession,
    utils::{error_codes, error_to_api_response, success_to_api_response},
};

use super::model::{UsersDeleteRequest, UsersUpdateRequest};

/// 更新用户资料
///
/// 更新落库后把变更推送到该用户的在线会话：
/// 仍启用则刷新权限快照，被禁用则立即撤销全部会话
#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(req): Json<UsersUpdateRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_power(&session, "PRIV_USERS_UPDATE")?;

    let user_id = req.user_id.clone();
    let affected = UserOperations::update_profile(&state.pool, &req.into_update()).await?;

    if affected == 0 {
        return Ok((
            StatusCode::OK,
            error_to_api_response(error_codes::NOT_FOUND, "用户不存在".to_string()),
        ));
    }

    propagate_user_change(&state, &user_id).await;

    Ok((StatusCode::OK, success_to_api_response(())))
}

/// 删除用户，级联撤销其全部会话
#[axum::debug_handler]
pub async fn delete(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(req): Json<UsersDeleteRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_power(&session, "PRIV_USERS_DELETE")?;

    if req.user_id == session.user_id {
        return Ok((
            StatusCode::OK,
            error_to_api_response(
                error_codes::VALIDATION_ERROR,
                "不能删除当前登录用户".to_string(),
            ),
        ));
    }

    let affected = UserOperations::delete(&state.pool, &req.user_id).await?;

    if affected == 0 {
        return Ok((
            StatusCode::OK,
            error_to_api_response(error_codes::NOT_FOUND, "用户不存在".to_string()),
        ));
    }

    state.sessions.revoke_user(&req.user_id).await;
    if let Err(e) = OnlineOperations::delete_by_user(&state.pool, &req.user_id).await {
        tracing::warn!("清理用户 {} 审计记录失败: {}", req.user_id, e);
    }

    tracing::info!("用户 {} 被 {} 删除", req.user_id, session.user_id);

    Ok((StatusCode::OK, success_to_api_response(())))
}

/// 把用户资料变更同步到其在线会话，尽力而为
async fn propagate_user_change(state: &AppState, user_id: &str) {
    match UserOperations::find_by_user_id(&state.pool, user_id).await {
        Ok(Some(user)) if user.enabled => {
            match PowerOperations::powers_for_user(&state.pool, user_id).await {
                Ok(powers) => {
                    state
                        .sessions
                        .refresh_user(user_id, &powers, user.is_admin)
                        .await;
                }
                Err(e) => tracing::warn!("重算用户 {} 权限快照失败: {}", user_id, e),
            }
        }
        Ok(_) => {
            // 已禁用或已不存在，直接撤销
            state.sessions.revoke_user(user_id).await;
            if let Err(e) = OnlineOperations::delete_by_user(&state.pool, user_id).await {
                tracing::warn!("清理用户 {} 审计记录失败: {}", user_id, e);
            }
        }
        Err(e) => tracing::warn!("查询用户 {} 失败，会话未同步: {}", user_id, e),
    }
}
