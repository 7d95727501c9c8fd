//! # 작업 데이터베이스 쿼리 모듈
//!
//! `tasks` 테이블에 대한 CRUD 쿼리와, 작업의 누적 시간(`actual_hours`)을
//! 다시 계산하는 집계 함수가 정의되어 있습니다.
//!
//! ## actual_hours 집계 방식
//! 시간기록이 종료·수정·삭제될 때마다 `recompute_actual_hours`가
//! 그 작업의 **종료된 기록 전체를 처음부터 다시 합산**합니다.
//! 증분(+= delta) 갱신이 아니므로, 수정/삭제 경로가 보정을 잊어도
//! 값이 어긋나지 않고, 몇 번을 다시 호출해도 결과가 같습니다(멱등).

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// 프로젝트의 모든 작업을 생성 순으로 조회합니다.
///
/// `project_id`가 None이면 전체 작업을 반환합니다.
pub async fn list_tasks(
    pool: &SqlitePool,
    project_id: Option<&str>,
) -> Result<Vec<Task>, AppError> {
    let tasks = if let Some(pid) = project_id {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, status, assignee_id,
                   created_by, actual_hours, created_at, updated_at
            FROM tasks
            WHERE project_id = ?
            ORDER BY created_at
            "#,
        )
        .bind(pid)
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, status, assignee_id,
                   created_by, actual_hours, created_at, updated_at
            FROM tasks
            ORDER BY created_at
            "#,
        )
        .fetch_all(pool)
        .await?
    };

    Ok(tasks)
}

/// ID로 작업 하나를 조회합니다.
pub async fn get_task(pool: &SqlitePool, id: &str) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(
        r#"
        SELECT id, project_id, title, description, status, assignee_id,
               created_by, actual_hours, created_at, updated_at
        FROM tasks
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(task)
}

/// 새 작업을 생성하고 생성된 작업을 반환합니다.
pub async fn create_task(
    pool: &SqlitePool,
    req: &CreateTaskRequest,
    created_by: &str,
) -> Result<Task, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO tasks (id, project_id, title, description, assignee_id, created_by)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&req.project_id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.assignee_id)
    .bind(created_by)
    .execute(pool)
    .await?;

    get_task(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created task".to_string()))
}

/// 작업 메타데이터를 부분 업데이트합니다.
///
/// `actual_hours`는 여기서 건드리지 않습니다 —
/// 그 컬럼은 `recompute_actual_hours`만이 씁니다.
pub async fn update_task(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateTaskRequest,
) -> Result<Option<Task>, AppError> {
    if get_task(pool, id).await?.is_none() {
        return Ok(None);
    }

    if let Some(title) = &req.title {
        sqlx::query("UPDATE tasks SET title = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?")
            .bind(title)
            .bind(id)
            .execute(pool)
            .await?;
    }

    if let Some(description) = &req.description {
        sqlx::query("UPDATE tasks SET description = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?")
            .bind(description)
            .bind(id)
            .execute(pool)
            .await?;
    }

    if let Some(status) = &req.status {
        sqlx::query("UPDATE tasks SET status = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(pool)
            .await?;
    }

    if let Some(assignee_id) = &req.assignee_id {
        sqlx::query("UPDATE tasks SET assignee_id = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?")
            .bind(assignee_id)
            .bind(id)
            .execute(pool)
            .await?;
    }

    get_task(pool, id).await
}

/// ID로 작업을 삭제합니다.
pub async fn delete_task(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 작업의 누적 시간(`actual_hours`)을 처음부터 다시 계산해 저장합니다.
///
/// 종료된(`end_time`이 있는) 시간기록만 합산하며, 실행 중인 타이머는
/// 제외됩니다. 초 합계를 시간으로 환산하고 소수 2자리로 반올림합니다.
///
/// 시간기록이 종료 상태로 전이될 때마다(정지, 수동 생성, 구간 수정,
/// 삭제, 강제 종료) 호출해야 합니다.
pub async fn recompute_actual_hours(pool: &SqlitePool, task_id: &str) -> Result<(), AppError> {
    // 하위 쿼리 SUM이 NULL(기록 없음)이면 COALESCE가 0으로 바꿉니다
    sqlx::query(
        r#"
        UPDATE tasks
        SET actual_hours = ROUND(
                COALESCE(
                    (SELECT SUM(duration_seconds)
                     FROM time_entries
                     WHERE task_id = ?1 AND end_time IS NOT NULL),
                    0
                ) / 3600.0,
                2
            ),
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?1
        "#,
    )
    .bind(task_id)
    .execute(pool)
    .await?;

    Ok(())
}
