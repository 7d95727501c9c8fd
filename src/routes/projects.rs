//! # 프로젝트 API 라우트 핸들러
//!
//! 프로젝트 CRUD를 처리하는 HTTP 핸들러 함수들입니다.
//!
//! ## 엔드포인트
//! - `GET    /api/v1/projects`        → 프로젝트 목록
//! - `POST   /api/v1/projects`        → 새 프로젝트 생성
//! - `GET    /api/v1/projects/{id}`   → 단일 프로젝트 조회
//! - `PATCH  /api/v1/projects/{id}`   → 프로젝트 수정
//! - `DELETE /api/v1/projects/{id}`   → 프로젝트 삭제

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::timer::{current_user, AppState},
    services::access,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// `GET /projects` — 전체 프로젝트 목록을 조회합니다.
pub async fn list_projects(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let projects = db::list_projects(&state.pool).await?;
    Ok(Json(json!({ "projects": projects })))
}

/// `POST /projects` — 새 프로젝트를 생성합니다.
pub async fn create_project(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<Project>, AppError> {
    let user = current_user(&state.pool, &auth_user).await?;

    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("Project name is required".to_string()));
    }

    let project = db::create_project(&state.pool, &req, &user.id).await?;
    Ok(Json(project))
}

/// `GET /projects/{id}` — 단일 프로젝트를 조회합니다.
pub async fn get_project(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Project>, AppError> {
    let project = db::get_project(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(project))
}

/// `PATCH /projects/{id}` — 프로젝트를 수정합니다.
///
/// 생성자 또는 관리자만 수정할 수 있습니다.
pub async fn update_project(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<Project>, AppError> {
    let user = current_user(&state.pool, &auth_user).await?;

    let project = db::get_project(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !access::can_edit_project(&user, &project) {
        return Err(AppError::AccessDenied);
    }

    let project = db::update_project(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(project))
}

/// `DELETE /projects/{id}` — 프로젝트를 삭제합니다. → `204 No Content`
///
/// 소속 작업과 시간기록이 CASCADE로 함께 삭제되므로,
/// 생성자와 관리자만 실행할 수 있습니다.
pub async fn delete_project(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let user = current_user(&state.pool, &auth_user).await?;

    let project = db::get_project(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !access::can_edit_project(&user, &project) {
        return Err(AppError::AccessDenied);
    }

    let deleted = db::delete_project(&state.pool, &id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
