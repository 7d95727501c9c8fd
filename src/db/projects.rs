//! # 프로젝트 데이터베이스 쿼리 모듈
//!
//! `projects` 테이블에 대한 CRUD 쿼리 함수들입니다.
//! 모든 함수는 `SqlitePool` 참조를 받아 비동기로 실행됩니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// 모든 프로젝트를 이름순으로 조회합니다.
pub async fn list_projects(pool: &SqlitePool) -> Result<Vec<Project>, AppError> {
    let projects = sqlx::query_as::<_, Project>(
        r#"
        SELECT id, name, description, created_by, created_at, updated_at
        FROM projects
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(projects)
}

/// ID로 프로젝트 하나를 조회합니다.
///
/// `fetch_optional`은 결과가 0행이면 None, 1행이면 Some(Project)을 반환합니다.
pub async fn get_project(pool: &SqlitePool, id: &str) -> Result<Option<Project>, AppError> {
    let project = sqlx::query_as::<_, Project>(
        r#"
        SELECT id, name, description, created_by, created_at, updated_at
        FROM projects
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(project)
}

/// 새 프로젝트를 생성하고 생성된 프로젝트를 반환합니다.
pub async fn create_project(
    pool: &SqlitePool,
    req: &CreateProjectRequest,
    created_by: &str,
) -> Result<Project, AppError> {
    // UUIDv7: 시간 기반 UUID로, 생성 순서대로 정렬됩니다
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        "INSERT INTO projects (id, name, description, created_by) VALUES (?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&req.name)
    .bind(&req.description) // Option<String>도 bind 가능 — None이면 SQL NULL로 처리됨
    .bind(created_by)
    .execute(pool)
    .await?;

    // 생성 직후 조회하여 DB 기본값이 채워진 완전한 객체를 반환합니다
    get_project(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created project".to_string()))
}

/// 프로젝트 정보를 부분 업데이트합니다.
///
/// PATCH 방식: 변경 요청에 포함된 필드만 업데이트합니다.
pub async fn update_project(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateProjectRequest,
) -> Result<Option<Project>, AppError> {
    if get_project(pool, id).await?.is_none() {
        return Ok(None); // 404 처리를 라우트 핸들러에 위임
    }

    if let Some(name) = &req.name {
        sqlx::query("UPDATE projects SET name = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(pool)
            .await?;
    }

    if let Some(description) = &req.description {
        sqlx::query("UPDATE projects SET description = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?")
            .bind(description)
            .bind(id)
            .execute(pool)
            .await?;
    }

    get_project(pool, id).await
}

/// ID로 프로젝트를 삭제합니다.
///
/// `tasks` 테이블에 `ON DELETE CASCADE`가 설정되어 있으므로,
/// 프로젝트를 삭제하면 소속 작업과 그 시간기록도 함께 삭제됩니다.
pub async fn delete_project(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    // rows_affected(): 이 쿼리로 영향받은 행 수를 반환
    Ok(result.rows_affected() > 0)
}
