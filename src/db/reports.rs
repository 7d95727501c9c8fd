//! # 시간 리포트 쿼리 모듈
//!
//! 종료된 시간기록을 작업 단위로 묶어 합산하는 리포트 쿼리입니다.
//! 수익은 기록에 저장되지 않는 파생 값이므로 조회 시점에 계산합니다:
//! `billable ? duration_seconds / 3600 * hourly_rate : 0`

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// 작업별 시간/수익 합계를 조회합니다.
///
/// 실행 중인 타이머(end_time 없음)는 합계에 들어가지 않습니다.
/// `user_id`는 핸들러가 결정한 유효 사용자입니다 — 일반 사용자는 항상
/// 자기 자신, 관리자는 필터로 지정한 사용자 또는 전체(None).
pub async fn time_by_task(
    pool: &SqlitePool,
    user_id: Option<&str>,
    q: &TimeReportQuery,
) -> Result<Vec<TaskTimeReportRow>, AppError> {
    let mut qb = sqlx::QueryBuilder::<sqlx::Sqlite>::new(
        r#"
        SELECT t.id AS task_id,
               t.title AS task_title,
               CAST(COALESCE(SUM(e.duration_seconds), 0) AS INTEGER) AS total_seconds,
               ROUND(COALESCE(SUM(e.duration_seconds), 0) / 3600.0, 2) AS total_hours,
               ROUND(COALESCE(SUM(
                   CASE WHEN e.billable = 1
                        THEN e.duration_seconds / 3600.0 * e.hourly_rate
                        ELSE 0 END
               ), 0), 2) AS earnings
        FROM time_entries e
        JOIN tasks t ON t.id = e.task_id
        WHERE e.end_time IS NOT NULL
        "#,
    );

    if let Some(user_id) = user_id {
        qb.push(" AND e.user_id = ").push_bind(user_id.to_string());
    }
    if let Some(from) = &q.from {
        qb.push(" AND e.start_time >= ").push_bind(from.clone());
    }
    if let Some(to) = &q.to {
        qb.push(" AND e.start_time <= ").push_bind(to.clone());
    }
    if let Some(project_id) = &q.project_id {
        qb.push(" AND e.project_id = ").push_bind(project_id.clone());
    }

    qb.push(" GROUP BY t.id, t.title ORDER BY total_seconds DESC");

    let rows = qb
        .build_query_as::<TaskTimeReportRow>()
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{projects, tasks, time_entries, users};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("migrations");
        pool
    }

    #[tokio::test]
    async fn report_sums_hours_and_earnings_per_task() {
        let pool = test_pool().await;
        let id = uuid::Uuid::now_v7().to_string();
        let user = users::create_user(&pool, &id, "alice", None, "hash", "member", 20.0)
            .await
            .expect("user");
        let project = projects::create_project(
            &pool,
            &CreateProjectRequest {
                name: "proj".to_string(),
                description: None,
            },
            &user.id,
        )
        .await
        .expect("project");
        let task = tasks::create_task(
            &pool,
            &CreateTaskRequest {
                project_id: project.id.clone(),
                title: "report me".to_string(),
                description: None,
                assignee_id: Some(user.id.clone()),
            },
            &user.id,
        )
        .await
        .expect("task");

        // billable 1시간 (20.0/h) + non-billable 30분
        let billable = CreateManualEntryRequest {
            task_id: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            description: None,
            billable: Some(true),
            tags: None,
        };
        time_entries::create_manual_entry(
            &pool,
            &user,
            &task,
            &billable,
            "2024-01-01T09:00:00.000Z",
            "2024-01-01T10:00:00.000Z",
        )
        .await
        .expect("billable entry");

        let unbillable = CreateManualEntryRequest {
            task_id: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            description: None,
            billable: Some(false),
            tags: None,
        };
        time_entries::create_manual_entry(
            &pool,
            &user,
            &task,
            &unbillable,
            "2024-01-01T11:00:00.000Z",
            "2024-01-01T11:30:00.000Z",
        )
        .await
        .expect("unbillable entry");

        let rows = time_by_task(
            &pool,
            Some(&user.id),
            &TimeReportQuery {
                from: None,
                to: None,
                project_id: None,
                user_id: None,
            },
        )
        .await
        .expect("report");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].task_id, task.id);
        assert_eq!(rows[0].total_seconds, 5400);
        assert_eq!(rows[0].total_hours, 1.5);
        // non-billable 30분은 수익에서 제외 → 1시간 * 20.0
        assert_eq!(rows[0].earnings, 20.0);
    }
}
