use axum::{
    extract::{Extension, Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    database::{PowerOperations, UserOperations},
    error::AppError,
    middleware::require_power,
    session::UserSession,
    utils::{error_codes, error_to_api_response, success_to_api_response},
};

use super::model::{RolePowersQuery, RolePowersUpdateRequest};

/// 查询角色权限
#[axum::debug_handler]
pub async fn get_role_powers(
    State(state): State<AppState>,
    Extension(_session): Extension<UserSession>,
    Query(params): Query<RolePowersQuery>,
) -> Result<impl IntoResponse, AppError> {
    if params.role_id.trim().is_empty() {
        return Ok((
            StatusCode::OK,
            error_to_api_response(error_codes::VALIDATION_ERROR, "roleId 不能为空".to_string()),
        ));
    }

    let powers = PowerOperations::role_powers(&state.pool, params.role_id.trim()).await?;

    Ok((StatusCode::OK, success_to_api_response(powers)))
}

/// 更新角色权限
///
/// 权限集合在事务内整体替换，提交后把新的权限快照
/// 推送到持有该角色用户的全部在线会话，无需重新登录
#[axum::debug_handler]
pub async fn update_role_powers(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(req): Json<RolePowersUpdateRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_power(&session, "PRIV_ROLEPOWERS_UPDATE")?;

    if req.role_id.trim().is_empty() {
        return Ok((
            StatusCode::OK,
            error_to_api_response(error_codes::VALIDATION_ERROR, "roleId 不能为空".to_string()),
        ));
    }

    PowerOperations::replace_role_powers(&state.pool, &req.role_id, &req.power_ids).await?;

    propagate_role_change(&state, &req.role_id).await;

    tracing::info!(
        "用户 {} 更新角色 {} 权限，共 {} 项",
        session.user_id,
        req.role_id,
        req.power_ids.len()
    );

    Ok((StatusCode::OK, success_to_api_response(())))
}

/// 把角色权限变更同步到持有者的在线会话，尽力而为
///
/// 同步期间新登录的会话拿到的是落库后的快照，不会漏过
async fn propagate_role_change(state: &AppState, role_id: &str) {
    let user_ids = match PowerOperations::users_in_role(&state.pool, role_id).await {
        Ok(user_ids) => user_ids,
        Err(e) => {
            tracing::warn!("查询角色 {} 的用户失败，会话未同步: {}", role_id, e);
            return;
        }
    };

    for user_id in user_ids {
        let user = match UserOperations::find_by_user_id(&state.pool, &user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("查询用户 {} 失败，会话未同步: {}", user_id, e);
                continue;
            }
        };

        match PowerOperations::powers_for_user(&state.pool, &user_id).await {
            Ok(powers) => {
                state
                    .sessions
                    .refresh_user(&user_id, &powers, user.is_admin)
                    .await;
            }
            Err(e) => tracing::warn!("重算用户 {} 权限快照失败: {}", user_id, e),
        }
    }
}
