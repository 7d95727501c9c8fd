//! # 작업(Task) API 라우트 핸들러
//!
//! 작업 CRUD를 처리하는 HTTP 핸들러 함수들입니다.
//!
//! ## 엔드포인트
//! - `GET    /api/v1/tasks`        → 작업 목록 (project_id 필터 지원)
//! - `POST   /api/v1/tasks`        → 새 작업 생성
//! - `GET    /api/v1/tasks/{id}`   → 단일 작업 조회
//! - `PATCH  /api/v1/tasks/{id}`   → 작업 수정 (부분 업데이트)
//! - `DELETE /api/v1/tasks/{id}`   → 작업 삭제
//!
//! `actual_hours`는 이 API로 수정할 수 없습니다 — 시간기록이 종료될 때
//! 집계기가 계산해서 채우는 읽기 전용 필드입니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::timer::{current_user, AppState},
    services::access,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// `GET /tasks` — 작업 목록을 조회합니다.
pub async fn list_tasks(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(q): Query<ListTasksQuery>,
) -> Result<Json<Value>, AppError> {
    let tasks = db::list_tasks(&state.pool, q.project_id.as_deref()).await?;
    Ok(Json(json!({ "tasks": tasks })))
}

/// `POST /tasks` — 새 작업을 생성합니다.
///
/// 지정한 프로젝트가 존재해야 합니다. 담당자를 지정하지 않으면
/// 미배정 상태로 생성됩니다.
pub async fn create_task(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<CreateTaskRequest>,
) -> Result<Json<Task>, AppError> {
    let user = current_user(&state.pool, &auth_user).await?;

    // 프로젝트 존재 확인 — 없는 프로젝트에 작업을 만들 수 없습니다
    let _ = db::get_project(&state.pool, &req.project_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if req.title.trim().is_empty() {
        return Err(AppError::BadRequest("Task title is required".to_string()));
    }

    let task = db::create_task(&state.pool, &req, &user.id).await?;
    Ok(Json(task))
}

/// `GET /tasks/{id}` — 단일 작업을 조회합니다.
pub async fn get_task(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Task>, AppError> {
    let task = db::get_task(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(task))
}

/// `PATCH /tasks/{id}` — 작업 메타데이터를 수정합니다.
///
/// 담당자/생성자/관리자만 수정할 수 있습니다.
pub async fn update_task(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, AppError> {
    let user = current_user(&state.pool, &auth_user).await?;

    let task = db::get_task(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !access::can_edit_task(&user, &task) {
        return Err(AppError::AccessDenied);
    }

    if let Some(status) = &req.status {
        if !["todo", "in_progress", "done"].contains(&status.as_str()) {
            return Err(AppError::BadRequest(format!("Invalid status: {}", status)));
        }
    }

    let task = db::update_task(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(task))
}

/// `DELETE /tasks/{id}` — 작업을 삭제합니다. → `204 No Content`
///
/// 소속 시간기록은 스키마의 ON DELETE CASCADE로 함께 삭제됩니다.
pub async fn delete_task(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let user = current_user(&state.pool, &auth_user).await?;

    let task = db::get_task(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !access::can_edit_task(&user, &task) {
        return Err(AppError::AccessDenied);
    }

    let deleted = db::delete_task(&state.pool, &id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
