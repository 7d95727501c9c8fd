//! # 시간기록 데이터베이스 쿼리 모듈 (타이머 엔진의 저장소)
//!
//! 시간기록의 생성·정지·수정·삭제 쿼리와, 엔진의 핵심 불변 조건을
//! 지키는 저장소 수준 방어 로직이 정의되어 있습니다.
//!
//! ## 기록 라이프사이클
//! ```text
//! [시작] create_running_entry() → 실행 중(end_time = NULL)
//!        → stop_entry() → [종료: duration 계산, 집계 트리거]
//! [수동] create_manual_entry() → 처음부터 종료 상태 (겹침 검사 후 삽입)
//! ```
//!
//! ## 사용자당 타이머 1개 불변 조건의 세 겹 방어
//! 1. 라우트 핸들러의 사전 검사: 실행 중 타이머가 있으면
//!    `ActiveTimerConflict`로 친절하게 거절 (조용히 정지시키지 않음)
//! 2. 이 모듈의 `create_running_entry`: **같은 트랜잭션 안에서**
//!    다른 실행 중 기록을 새 기록의 시작 시각으로 강제 종료한 뒤 삽입.
//!    사전 검사를 뚫고 들어온 동시 요청도 여기서 직렬화됩니다.
//! 3. 스키마의 부분 유니크 인덱스(user_id WHERE is_running = 1):
//!    저장소를 우회한 쓰기까지 막는 최종 방어선
//!
//! 어떤 경로로도 한 사용자의 실행 중 기록이 2개가 되는 상태는
//! 관측될 수 없습니다.

use crate::error::AppError;
use crate::models::*;
use crate::services::clock;
use sqlx::SqlitePool;

/// 전체 컬럼 SELECT 목록 — 모든 조회 쿼리가 같은 순서를 사용합니다
const ENTRY_COLUMNS: &str = "id, user_id, task_id, project_id, description, start_time, \
     end_time, duration_seconds, is_running, is_manual, billable, hourly_rate, tags, \
     created_at, updated_at";

/// ID로 시간기록 하나를 조회합니다.
pub async fn get_entry(pool: &SqlitePool, id: &str) -> Result<Option<TimeEntry>, AppError> {
    let entry = sqlx::query_as::<_, TimeEntry>(&format!(
        "SELECT {} FROM time_entries WHERE id = ?",
        ENTRY_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}

/// 사용자의 실행 중인 타이머를 조회합니다. 없으면 None.
///
/// 부분 유니크 인덱스 덕분에 결과는 항상 0개 아니면 1개입니다.
pub async fn find_running_entry(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<TimeEntry>, AppError> {
    let entry = sqlx::query_as::<_, TimeEntry>(&format!(
        "SELECT {} FROM time_entries WHERE user_id = ? AND is_running = 1",
        ENTRY_COLUMNS
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}

/// 실행 중인 타이머 기록을 새로 만듭니다.
///
/// 한 트랜잭션 안에서:
/// 1. 같은 사용자의 **다른** 실행 중 기록을 모두 강제 종료합니다
///    (end_time = 새 기록의 시작 시각, duration 계산, 실행 플래그 해제).
/// 2. 새 실행 중 기록을 삽입합니다.
///
/// 시간당 요금은 호출 시점 사용자의 요금을 스냅샷하고,
/// 프로젝트 ID는 작업에서 복사합니다.
///
/// # 반환값
/// `(새 기록, 강제 종료된 기록들)` — 강제 종료된 기록이 있으면 호출자가
/// 해당 작업들의 누적 시간을 다시 집계해야 합니다.
pub async fn create_running_entry(
    pool: &SqlitePool,
    user: &User,
    task: &Task,
    req: &StartTimerRequest,
    start_time: &str,
) -> Result<(TimeEntry, Vec<TimeEntry>), AppError> {
    let id = uuid::Uuid::now_v7().to_string();
    let billable = req.billable.unwrap_or(true);

    // 트랜잭션 시작 — 강제 종료와 삽입이 원자적으로 묶입니다
    let mut tx = pool.begin().await?;

    // 1단계: 다른 실행 중 기록을 강제 종료합니다.
    // 핸들러의 사전 검사를 통과한 정상 경로에서는 빈 목록이지만,
    // 검사를 뚫고 들어온 동시 요청이 있으면 여기서 정리됩니다.
    let others = sqlx::query_as::<_, TimeEntry>(&format!(
        "SELECT {} FROM time_entries WHERE user_id = ? AND is_running = 1",
        ENTRY_COLUMNS
    ))
    .bind(&user.id)
    .fetch_all(&mut *tx)
    .await?;

    let mut closed = Vec::with_capacity(others.len());
    for mut other in others {
        // 시계가 뒤로 간 극단적인 경우에도 음수 duration은 만들지 않습니다
        let duration = clock::duration_seconds(&other.start_time, start_time)?.max(0);

        sqlx::query(
            r#"
            UPDATE time_entries
            SET end_time = ?, duration_seconds = ?, is_running = 0,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            WHERE id = ?
            "#,
        )
        .bind(start_time)
        .bind(duration)
        .bind(&other.id)
        .execute(&mut *tx)
        .await?;

        other.end_time = Some(start_time.to_string());
        other.duration_seconds = duration;
        other.is_running = false;
        closed.push(other);
    }

    // 2단계: 새 실행 중 기록을 삽입합니다
    sqlx::query(
        r#"
        INSERT INTO time_entries
            (id, user_id, task_id, project_id, description, start_time,
             is_running, is_manual, billable, hourly_rate, tags)
        VALUES (?, ?, ?, ?, ?, ?, 1, 0, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&user.id)
    .bind(&task.id)
    .bind(&task.project_id)
    .bind(&req.description)
    .bind(start_time)
    .bind(billable)
    .bind(user.hourly_rate)
    .bind(&req.tags)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let entry = get_entry(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created entry".to_string()))?;

    Ok((entry, closed))
}

/// 실행 중인 타이머를 정지하고 기록을 확정합니다.
///
/// (id, user_id, is_running = 1) 세 조건을 모두 만족하는 행만 대상으로
/// 합니다. 남의 기록이든, 이미 정지된 기록이든, 없는 기록이든 결과는
/// 똑같이 `Ok(None)`입니다 — 호출자는 이를 NotFound로 보고하여
/// 존재 여부를 노출하지 않습니다.
///
/// # 반환값
/// 확정된 기록(duration 계산 완료). 호출자는 이 기록의 작업에 대해
/// 누적 시간을 다시 집계해야 합니다.
pub async fn stop_entry(
    pool: &SqlitePool,
    user_id: &str,
    entry_id: &str,
    end_time: &str,
) -> Result<Option<TimeEntry>, AppError> {
    let entry = sqlx::query_as::<_, TimeEntry>(&format!(
        "SELECT {} FROM time_entries WHERE id = ? AND user_id = ? AND is_running = 1",
        ENTRY_COLUMNS
    ))
    .bind(entry_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let Some(entry) = entry else {
        return Ok(None);
    };

    let duration = clock::duration_seconds(&entry.start_time, end_time)?.max(0);

    // is_running = 1 조건을 다시 걸어, 그 사이 다른 요청이 먼저 정지시킨
    // 경우에는 아무 행도 갱신하지 않습니다
    let result = sqlx::query(
        r#"
        UPDATE time_entries
        SET end_time = ?, duration_seconds = ?, is_running = 0,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND is_running = 1
        "#,
    )
    .bind(end_time)
    .bind(duration)
    .bind(entry_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_entry(pool, entry_id).await
}

/// 수동(backfill) 기록을 생성합니다. 처음부터 종료 상태입니다.
///
/// 겹침 검사와 삽입이 한 트랜잭션으로 묶입니다. 같은 사용자의 종료된
/// 기록과 구간이 겹치면(경계가 맞닿는 경우 포함) `OverlappingEntry`로
/// 실패하고 아무것도 저장하지 않습니다.
///
/// `start_time`/`end_time`은 저장 포맷으로 정규화된 문자열이어야 하며
/// (사전순 == 시간순), `end > start` 검증은 호출자가 이미 마친 상태여야
/// 합니다.
pub async fn create_manual_entry(
    pool: &SqlitePool,
    user: &User,
    task: &Task,
    req: &CreateManualEntryRequest,
    start_time: &str,
    end_time: &str,
) -> Result<TimeEntry, AppError> {
    let duration = clock::duration_seconds(start_time, end_time)?;
    let id = uuid::Uuid::now_v7().to_string();
    let billable = req.billable.unwrap_or(true);

    let mut tx = pool.begin().await?;

    // 겹침 판정: 부분 겹침, 완전 포함, 경계 접촉을 모두 겹침으로 봅니다.
    // 실행 중 기록은 end_time이 없으므로 검사 대상이 아닙니다.
    let (overlaps,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM time_entries
        WHERE user_id = ?1
          AND end_time IS NOT NULL
          AND (
                (start_time <= ?2 AND end_time >= ?2)
             OR (start_time <= ?3 AND end_time >= ?3)
             OR (start_time >= ?2 AND end_time <= ?3)
          )
        "#,
    )
    .bind(&user.id)
    .bind(start_time)
    .bind(end_time)
    .fetch_one(&mut *tx)
    .await?;

    if overlaps > 0 {
        return Err(AppError::OverlappingEntry);
    }

    sqlx::query(
        r#"
        INSERT INTO time_entries
            (id, user_id, task_id, project_id, description, start_time, end_time,
             duration_seconds, is_running, is_manual, billable, hourly_rate, tags)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, 1, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&user.id)
    .bind(&task.id)
    .bind(&task.project_id)
    .bind(&req.description)
    .bind(start_time)
    .bind(end_time)
    .bind(duration)
    .bind(billable)
    .bind(user.hourly_rate)
    .bind(&req.tags)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    get_entry(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created entry".to_string()))
}

/// 종료된 기록을 부분 업데이트합니다.
///
/// 실행 중인 기록이면 `CannotEditRunning`으로 거부합니다 — 먼저
/// 정지해야 합니다. 구간(`range`)이 주어지면 start/end/duration을 함께
/// 갱신하며, 이 경우 호출자는 작업의 누적 시간을 다시 집계해야 합니다.
///
/// # 매개변수
/// - `range`: `(정규화된 start, 정규화된 end, duration_seconds)` —
///   시각이 바뀌지 않는 수정이면 None
pub async fn update_entry(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateTimeEntryRequest,
    range: Option<(String, String, i64)>,
) -> Result<Option<TimeEntry>, AppError> {
    let Some(entry) = get_entry(pool, id).await? else {
        return Ok(None);
    };

    if entry.is_running {
        return Err(AppError::CannotEditRunning);
    }

    if let Some(description) = &req.description {
        sqlx::query("UPDATE time_entries SET description = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?")
            .bind(description)
            .bind(id)
            .execute(pool)
            .await?;
    }

    if let Some(tags) = &req.tags {
        sqlx::query("UPDATE time_entries SET tags = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?")
            .bind(tags)
            .bind(id)
            .execute(pool)
            .await?;
    }

    if let Some(billable) = req.billable {
        sqlx::query("UPDATE time_entries SET billable = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?")
            .bind(billable)
            .bind(id)
            .execute(pool)
            .await?;
    }

    if let Some(rate) = req.hourly_rate {
        sqlx::query("UPDATE time_entries SET hourly_rate = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?")
            .bind(rate)
            .bind(id)
            .execute(pool)
            .await?;
    }

    if let Some((start, end, duration)) = range {
        sqlx::query(
            r#"
            UPDATE time_entries
            SET start_time = ?, end_time = ?, duration_seconds = ?,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            WHERE id = ?
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(duration)
        .bind(id)
        .execute(pool)
        .await?;
    }

    get_entry(pool, id).await
}

/// 종료된 기록을 삭제합니다.
///
/// 실행 중인 기록이면 `CannotDeleteRunning`으로 거부합니다.
///
/// # 반환값
/// 삭제된 기록이 속했던 작업의 ID — 호출자는 그 작업의 누적 시간을
/// 다시 집계해야 합니다. 기록이 없으면 None.
pub async fn delete_entry(pool: &SqlitePool, id: &str) -> Result<Option<String>, AppError> {
    let Some(entry) = get_entry(pool, id).await? else {
        return Ok(None);
    };

    if entry.is_running {
        return Err(AppError::CannotDeleteRunning);
    }

    sqlx::query("DELETE FROM time_entries WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(Some(entry.task_id))
}

/// 필터 조건에 맞는 시간기록 목록을 최신 시작순으로 조회합니다.
///
/// 필터가 6종이라 if/else로 쿼리를 분기하는 대신 `QueryBuilder`로
/// WHERE 절을 동적으로 조립합니다. 값은 전부 `push_bind`로 바인딩되므로
/// SQL 인젝션 위험이 없습니다.
///
/// `user_id`는 핸들러가 결정한 "유효 사용자"입니다 — 일반 사용자는
/// 항상 자기 자신, 관리자는 필터로 지정한 사용자 또는 전체(None).
pub async fn list_entries(
    pool: &SqlitePool,
    user_id: Option<&str>,
    q: &ListTimeEntriesQuery,
) -> Result<Vec<TimeEntry>, AppError> {
    let mut qb = sqlx::QueryBuilder::<sqlx::Sqlite>::new(format!(
        "SELECT {} FROM time_entries WHERE 1 = 1",
        ENTRY_COLUMNS
    ));

    if let Some(user_id) = user_id {
        qb.push(" AND user_id = ").push_bind(user_id.to_string());
    }
    if let Some(from) = &q.from {
        qb.push(" AND start_time >= ").push_bind(from.clone());
    }
    if let Some(to) = &q.to {
        qb.push(" AND start_time <= ").push_bind(to.clone());
    }
    if let Some(task_id) = &q.task_id {
        qb.push(" AND task_id = ").push_bind(task_id.clone());
    }
    if let Some(project_id) = &q.project_id {
        qb.push(" AND project_id = ").push_bind(project_id.clone());
    }
    if let Some(billable) = q.billable {
        qb.push(" AND billable = ").push_bind(billable);
    }

    qb.push(" ORDER BY start_time DESC");

    let entries = qb.build_query_as::<TimeEntry>().fetch_all(pool).await?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{projects, tasks, users};
    use rstest::rstest;
    use sqlx::sqlite::SqlitePoolOptions;

    /// 인메모리 SQLite에 실제 마이그레이션을 적용한 테스트 풀
    ///
    /// 커넥션마다 별도의 인메모리 DB가 생기므로 max_connections(1)로
    /// 단일 커넥션을 공유합니다.
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

    async fn seed_user(pool: &SqlitePool, name: &str, rate: f64) -> User {
        let id = uuid::Uuid::now_v7().to_string();
        users::create_user(pool, &id, name, None, "hash", "member", rate)
            .await
            .expect("user")
    }

    async fn seed_task(pool: &SqlitePool, owner: &User) -> Task {
        let project = projects::create_project(
            pool,
            &CreateProjectRequest {
                name: "proj".to_string(),
                description: None,
            },
            &owner.id,
        )
        .await
        .expect("project");

        tasks::create_task(
            pool,
            &CreateTaskRequest {
                project_id: project.id,
                title: "task".to_string(),
                description: None,
                assignee_id: Some(owner.id.clone()),
            },
            &owner.id,
        )
        .await
        .expect("task")
    }

    fn start_req(description: &str) -> StartTimerRequest {
        StartTimerRequest {
            task_id: String::new(), // db 계층은 task 구조체를 직접 받으므로 사용되지 않음
            description: Some(description.to_string()),
            billable: None,
            tags: None,
        }
    }

    fn manual_req() -> CreateManualEntryRequest {
        CreateManualEntryRequest {
            task_id: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            description: None,
            billable: Some(true),
            tags: None,
        }
    }

    async fn actual_hours(pool: &SqlitePool, task_id: &str) -> f64 {
        tasks::get_task(pool, task_id)
            .await
            .expect("query")
            .expect("task")
            .actual_hours
    }

    #[tokio::test]
    async fn start_creates_running_entry_with_snapshots() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "alice", 42.5).await;
        let task = seed_task(&pool, &user).await;

        let (entry, closed) = create_running_entry(
            &pool,
            &user,
            &task,
            &start_req("work"),
            "2024-01-01T09:00:00.000Z",
        )
        .await
        .expect("start");

        assert!(closed.is_empty());
        assert!(entry.is_running);
        assert!(entry.end_time.is_none());
        assert_eq!(entry.duration_seconds, 0);
        assert_eq!(entry.project_id, task.project_id);
        assert_eq!(entry.hourly_rate, 42.5);
        assert!(entry.billable); // 기본값 true

        let active = find_running_entry(&pool, &user.id).await.expect("query");
        assert_eq!(active.expect("active").id, entry.id);
    }

    #[tokio::test]
    async fn second_running_insert_force_closes_previous() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "alice", 0.0).await;
        let task = seed_task(&pool, &user).await;

        let (first, _) = create_running_entry(
            &pool,
            &user,
            &task,
            &start_req("one"),
            "2024-01-01T09:00:00.000Z",
        )
        .await
        .expect("first");

        // 핸들러 사전 검사를 우회한 동시 요청을 흉내냅니다
        let (second, closed) = create_running_entry(
            &pool,
            &user,
            &task,
            &start_req("two"),
            "2024-01-01T09:30:00.000Z",
        )
        .await
        .expect("second");

        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].id, first.id);
        assert_eq!(closed[0].end_time.as_deref(), Some("2024-01-01T09:30:00.000Z"));
        assert_eq!(closed[0].duration_seconds, 1800);

        // 실행 중 기록은 정확히 1개만 남습니다
        let active = find_running_entry(&pool, &user.id)
            .await
            .expect("query")
            .expect("active");
        assert_eq!(active.id, second.id);

        let stored_first = get_entry(&pool, &first.id)
            .await
            .expect("query")
            .expect("entry");
        assert!(!stored_first.is_running);
    }

    #[tokio::test]
    async fn unique_index_rejects_bypassing_writes() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "alice", 0.0).await;
        let task = seed_task(&pool, &user).await;

        create_running_entry(&pool, &user, &task, &start_req("one"), "2024-01-01T09:00:00.000Z")
            .await
            .expect("first");

        // 저장소 함수를 우회한 직접 INSERT는 부분 유니크 인덱스가 막습니다
        let result = sqlx::query(
            r#"
            INSERT INTO time_entries
                (id, user_id, task_id, project_id, start_time, is_running)
            VALUES (?, ?, ?, ?, '2024-01-01T10:00:00.000Z', 1)
            "#,
        )
        .bind(uuid::Uuid::now_v7().to_string())
        .bind(&user.id)
        .bind(&task.id)
        .bind(&task.project_id)
        .execute(&pool)
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn stop_finalizes_duration_and_rollup_end_to_end() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "alice", 10.0).await;
        let task = seed_task(&pool, &user).await;

        let (entry, _) = create_running_entry(
            &pool,
            &user,
            &task,
            &start_req("morning"),
            "2024-01-01T09:00:00.000Z",
        )
        .await
        .expect("start");

        let stopped = stop_entry(&pool, &user.id, &entry.id, "2024-01-01T09:42:30.000Z")
            .await
            .expect("stop")
            .expect("some");

        assert!(!stopped.is_running);
        assert_eq!(stopped.duration_seconds, 2550);
        assert_eq!(stopped.end_time.as_deref(), Some("2024-01-01T09:42:30.000Z"));

        tasks::recompute_actual_hours(&pool, &task.id)
            .await
            .expect("rollup");
        assert_eq!(actual_hours(&pool, &task.id).await, 0.71);

        // 이어서 14:00~15:00 수동 기록 → 누적 1.71시간
        create_manual_entry(
            &pool,
            &user,
            &task,
            &manual_req(),
            "2024-01-01T14:00:00.000Z",
            "2024-01-01T15:00:00.000Z",
        )
        .await
        .expect("manual");

        tasks::recompute_actual_hours(&pool, &task.id)
            .await
            .expect("rollup");
        assert_eq!(actual_hours(&pool, &task.id).await, 1.71);
    }

    #[tokio::test]
    async fn stop_folds_ownership_and_state_into_none() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice", 0.0).await;
        let bob = seed_user(&pool, "bob", 0.0).await;
        let task = seed_task(&pool, &alice).await;

        let (entry, _) = create_running_entry(
            &pool,
            &alice,
            &task,
            &start_req("work"),
            "2024-01-01T09:00:00.000Z",
        )
        .await
        .expect("start");

        // 남의 기록: None (존재 여부를 노출하지 않음)
        let result = stop_entry(&pool, &bob.id, &entry.id, "2024-01-01T10:00:00.000Z")
            .await
            .expect("query");
        assert!(result.is_none());

        // 존재하지 않는 기록: None
        let result = stop_entry(&pool, &alice.id, "missing", "2024-01-01T10:00:00.000Z")
            .await
            .expect("query");
        assert!(result.is_none());

        // 정상 정지 후 같은 기록을 다시 정지: 더 이상 실행 중이 아니므로 None
        stop_entry(&pool, &alice.id, &entry.id, "2024-01-01T10:00:00.000Z")
            .await
            .expect("stop")
            .expect("some");
        let result = stop_entry(&pool, &alice.id, &entry.id, "2024-01-01T11:00:00.000Z")
            .await
            .expect("query");
        assert!(result.is_none());
    }

    // 기존 종료 기록 [10:00, 11:00] 기준의 겹침 판정표.
    // 경계가 맞닿는 경우(11:00 시작, 10:00 종료)도 겹침입니다.
    #[rstest]
    #[case("2024-01-01T10:30:00.000Z", "2024-01-01T10:45:00.000Z", false)] // 완전 포함
    #[case("2024-01-01T09:30:00.000Z", "2024-01-01T10:30:00.000Z", false)] // 앞쪽 부분 겹침
    #[case("2024-01-01T10:30:00.000Z", "2024-01-01T11:30:00.000Z", false)] // 뒤쪽 부분 겹침
    #[case("2024-01-01T09:00:00.000Z", "2024-01-01T12:00:00.000Z", false)] // 기존을 완전 포함
    #[case("2024-01-01T11:00:00.000Z", "2024-01-01T12:00:00.000Z", false)] // 경계 접촉 (끝==시작)
    #[case("2024-01-01T09:00:00.000Z", "2024-01-01T10:00:00.000Z", false)] // 경계 접촉 (시작==끝)
    #[case("2024-01-01T11:01:00.000Z", "2024-01-01T12:00:00.000Z", true)]  // 1분 뒤 — 허용
    #[case("2024-01-01T08:00:00.000Z", "2024-01-01T09:59:00.000Z", true)]  // 1분 전 — 허용
    #[tokio::test]
    async fn manual_entry_overlap_matrix(
        #[case] start: &str,
        #[case] end: &str,
        #[case] allowed: bool,
    ) {
        let pool = test_pool().await;
        let user = seed_user(&pool, "alice", 0.0).await;
        let task = seed_task(&pool, &user).await;

        create_manual_entry(
            &pool,
            &user,
            &task,
            &manual_req(),
            "2024-01-01T10:00:00.000Z",
            "2024-01-01T11:00:00.000Z",
        )
        .await
        .expect("existing");

        let result = create_manual_entry(&pool, &user, &task, &manual_req(), start, end).await;

        if allowed {
            let entry = result.expect("should be accepted");
            assert!(entry.is_manual);
            assert!(!entry.is_running);
        } else {
            assert!(matches!(result, Err(AppError::OverlappingEntry)));
        }
    }

    #[tokio::test]
    async fn overlap_is_scoped_per_user() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice", 0.0).await;
        let bob = seed_user(&pool, "bob", 0.0).await;
        let task = seed_task(&pool, &alice).await;

        create_manual_entry(
            &pool,
            &alice,
            &task,
            &manual_req(),
            "2024-01-01T10:00:00.000Z",
            "2024-01-01T11:00:00.000Z",
        )
        .await
        .expect("alice entry");

        // 다른 사용자의 같은 구간은 겹침이 아닙니다
        create_manual_entry(
            &pool,
            &bob,
            &task,
            &manual_req(),
            "2024-01-01T10:00:00.000Z",
            "2024-01-01T11:00:00.000Z",
        )
        .await
        .expect("bob entry");
    }

    #[tokio::test]
    async fn running_entry_rejects_update_and_delete() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "alice", 0.0).await;
        let task = seed_task(&pool, &user).await;

        let (entry, _) = create_running_entry(
            &pool,
            &user,
            &task,
            &start_req("work"),
            "2024-01-01T09:00:00.000Z",
        )
        .await
        .expect("start");

        let patch = UpdateTimeEntryRequest {
            description: Some("edited".to_string()),
            tags: None,
            billable: None,
            hourly_rate: None,
            start_time: None,
            end_time: None,
        };
        let result = update_entry(&pool, &entry.id, &patch, None).await;
        assert!(matches!(result, Err(AppError::CannotEditRunning)));

        let result = delete_entry(&pool, &entry.id).await;
        assert!(matches!(result, Err(AppError::CannotDeleteRunning)));

        // 거부 이후에도 기록은 그대로 실행 중입니다
        let stored = get_entry(&pool, &entry.id)
            .await
            .expect("query")
            .expect("entry");
        assert!(stored.is_running);
        assert_eq!(stored.description.as_deref(), Some("work"));
    }

    #[tokio::test]
    async fn rollup_is_idempotent_and_tracks_deletes() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "alice", 0.0).await;
        let task = seed_task(&pool, &user).await;

        // 2시간 + 1시간 기록
        let two_hours = create_manual_entry(
            &pool,
            &user,
            &task,
            &manual_req(),
            "2024-01-01T09:00:00.000Z",
            "2024-01-01T11:00:00.000Z",
        )
        .await
        .expect("2h");
        create_manual_entry(
            &pool,
            &user,
            &task,
            &manual_req(),
            "2024-01-01T12:00:00.000Z",
            "2024-01-01T13:00:00.000Z",
        )
        .await
        .expect("1h");

        tasks::recompute_actual_hours(&pool, &task.id).await.expect("rollup");
        assert_eq!(actual_hours(&pool, &task.id).await, 3.0);

        // 기록 변화 없이 다시 집계해도 값이 같습니다 (멱등)
        tasks::recompute_actual_hours(&pool, &task.id).await.expect("rollup");
        assert_eq!(actual_hours(&pool, &task.id).await, 3.0);

        // 2시간 기록 삭제 → 정확히 2.0 감소
        let affected_task = delete_entry(&pool, &two_hours.id)
            .await
            .expect("delete")
            .expect("task id");
        assert_eq!(affected_task, task.id);
        tasks::recompute_actual_hours(&pool, &task.id).await.expect("rollup");
        assert_eq!(actual_hours(&pool, &task.id).await, 1.0);
    }

    #[tokio::test]
    async fn range_edit_recomputes_duration() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "alice", 0.0).await;
        let task = seed_task(&pool, &user).await;

        let entry = create_manual_entry(
            &pool,
            &user,
            &task,
            &manual_req(),
            "2024-01-01T09:00:00.000Z",
            "2024-01-01T10:00:00.000Z",
        )
        .await
        .expect("entry");
        assert_eq!(entry.duration_seconds, 3600);

        // 구간을 30분으로 줄이는 수정
        let patch = UpdateTimeEntryRequest {
            description: None,
            tags: None,
            billable: None,
            hourly_rate: None,
            start_time: Some("2024-01-01T09:00:00.000Z".to_string()),
            end_time: Some("2024-01-01T09:30:00.000Z".to_string()),
        };
        let duration = clock::duration_seconds(
            "2024-01-01T09:00:00.000Z",
            "2024-01-01T09:30:00.000Z",
        )
        .expect("duration");
        let updated = update_entry(
            &pool,
            &entry.id,
            &patch,
            Some((
                "2024-01-01T09:00:00.000Z".to_string(),
                "2024-01-01T09:30:00.000Z".to_string(),
                duration,
            )),
        )
        .await
        .expect("update")
        .expect("some");

        assert_eq!(updated.duration_seconds, 1800);

        tasks::recompute_actual_hours(&pool, &task.id).await.expect("rollup");
        assert_eq!(actual_hours(&pool, &task.id).await, 0.5);
    }

    #[tokio::test]
    async fn list_entries_applies_filters() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "alice", 0.0).await;
        let task = seed_task(&pool, &user).await;

        create_manual_entry(
            &pool,
            &user,
            &task,
            &manual_req(),
            "2024-01-01T09:00:00.000Z",
            "2024-01-01T10:00:00.000Z",
        )
        .await
        .expect("jan");
        let mut feb_req = manual_req();
        feb_req.billable = Some(false);
        create_manual_entry(
            &pool,
            &user,
            &task,
            &feb_req,
            "2024-02-01T09:00:00.000Z",
            "2024-02-01T10:00:00.000Z",
        )
        .await
        .expect("feb");

        let all = list_entries(
            &pool,
            Some(&user.id),
            &ListTimeEntriesQuery {
                from: None,
                to: None,
                task_id: None,
                project_id: None,
                user_id: None,
                billable: None,
            },
        )
        .await
        .expect("list");
        assert_eq!(all.len(), 2);
        // 최신 시작순 정렬
        assert!(all[0].start_time > all[1].start_time);

        let february = list_entries(
            &pool,
            Some(&user.id),
            &ListTimeEntriesQuery {
                from: Some("2024-02-01T00:00:00.000Z".to_string()),
                to: None,
                task_id: None,
                project_id: None,
                user_id: None,
                billable: None,
            },
        )
        .await
        .expect("list");
        assert_eq!(february.len(), 1);
        assert!(!february[0].billable);

        let billable_only = list_entries(
            &pool,
            Some(&user.id),
            &ListTimeEntriesQuery {
                from: None,
                to: None,
                task_id: None,
                project_id: None,
                user_id: None,
                billable: Some(true),
            },
        )
        .await
        .expect("list");
        assert_eq!(billable_only.len(), 1);
        assert_eq!(billable_only[0].start_time, "2024-01-01T09:00:00.000Z");
    }
}
