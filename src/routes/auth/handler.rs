use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Extension, Json, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use crate::{
    AppState,
    database::{OnlineEntity, OnlineOperations, PowerOperations, UserOperations},
    error::AppError,
    session::{SessionSeed, SourceType, UserSession},
    utils::{error_codes, error_to_api_response, success_to_api_response, verify_password},
};

use super::model::{LoginRequest, LoginResponse};

/// 后台用户登录
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    login_with_source(state, addr, headers, req, SourceType::Web).await
}

/// 小程序用户登录
#[axum::debug_handler]
pub async fn login_mini_program(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    login_with_source(state, addr, headers, req, SourceType::MiniProgram).await
}

async fn login_with_source(
    state: AppState,
    addr: SocketAddr,
    headers: HeaderMap,
    req: LoginRequest,
    source: SourceType,
) -> Result<impl IntoResponse, AppError> {
    let user = UserOperations::find_by_user_id(&state.pool, req.user_name.trim()).await?;

    // 用户不存在与密码错误返回同一条消息
    let Some(user) = user else {
        return Ok((
            StatusCode::OK,
            error_to_api_response(error_codes::AUTH_FAILED, "用户名或密码错误".to_string()),
        ));
    };

    if !verify_password(req.password.trim(), &user.password).unwrap_or(false) {
        return Ok((
            StatusCode::OK,
            error_to_api_response(error_codes::AUTH_FAILED, "用户名或密码错误".to_string()),
        ));
    }

    if !user.enabled {
        return Ok((
            StatusCode::OK,
            error_to_api_response(
                error_codes::AUTH_FAILED,
                "用户未启用，请联系管理员！".to_string(),
            ),
        ));
    }

    // 登录时固化权限快照，请求路径只读快照
    let powers = PowerOperations::powers_for_user(&state.pool, &user.user_id).await?;

    let session = state
        .sessions
        .login(
            SessionSeed {
                user_id: user.user_id.clone(),
                user_name: user.user_name.clone(),
                is_admin: user.is_admin,
                powers,
            },
            user.one_session,
            source,
        )
        .await?;

    let record = OnlineEntity::from_session(&session, client_ip(&headers, addr));
    OnlineOperations::insert(&state.pool, &record).await?;

    tracing::info!("用户 {} 登录成功 ({})", user.user_id, source.as_str());

    Ok((
        StatusCode::OK,
        success_to_api_response(LoginResponse {
            token: session.session_id,
        }),
    ))
}

/// 用户退出，撤销自己的会话
#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<impl IntoResponse, AppError> {
    state.sessions.registry().revoke(&session.session_id).await?;

    if let Err(e) = OnlineOperations::delete_by_session(&state.pool, &session.session_id).await {
        tracing::warn!("清理会话 {} 审计记录失败: {}", session.session_id, e);
    }

    Ok((StatusCode::OK, success_to_api_response(())))
}

/// 当前登录用户信息
#[axum::debug_handler]
pub async fn get_user_info(
    Extension(session): Extension<UserSession>,
) -> Result<impl IntoResponse, AppError> {
    Ok((StatusCode::OK, success_to_api_response(session)))
}

/// 从请求头或连接信息解析客户端IP
fn client_ip(headers: &HeaderMap, addr: SocketAddr) -> String {
    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| addr.ip().to_string())
}
