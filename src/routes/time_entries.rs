//! # 시간기록 API 라우트 핸들러
//!
//! 시간기록 컬렉션의 조회/수동 생성과 단건 조회/수정/삭제를 처리하는
//! HTTP 핸들러 함수들입니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/time-entries | `list_time_entries` | 필터 조회 |
//! | POST | /api/v1/time-entries | `create_time_entry` | 수동 기록 생성 |
//! | GET | /api/v1/time-entries/{id} | `get_time_entry` | 단건 조회 (+수익) |
//! | PUT | /api/v1/time-entries/{id} | `update_time_entry` | 수정 |
//! | DELETE | /api/v1/time-entries/{id} | `delete_time_entry` | 삭제 |
//!
//! 실행 중인 기록은 여기서 수정/삭제할 수 없습니다 — 타이머 정지가
//! 먼저입니다. 시각이 바뀌는 수정과 삭제는 작업의 누적 시간 재집계를
//! 트리거합니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::timer::{current_user, AppState},
    services::{access, clock, events::TimerEvent},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// `GET /time-entries` — 필터 조건에 맞는 내 시간기록을 조회합니다.
///
/// 쿼리 파라미터: `from`, `to`(시작 시각 기준), `task_id`, `project_id`,
/// `billable`, 그리고 관리자 전용 `user_id`.
///
/// 일반 사용자는 항상 자기 기록만 봅니다. 관리자는 `user_id`로 특정
/// 사용자를 지정하거나, 지정하지 않으면 전체 기록을 봅니다.
pub async fn list_time_entries(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(mut q): Query<ListTimeEntriesQuery>,
) -> Result<Json<Value>, AppError> {
    let user = current_user(&state.pool, &auth_user).await?;

    // 시각 필터는 저장 포맷으로 정규화해야 문자열 비교가 시간순이 됩니다
    if let Some(from) = &q.from {
        q.from = Some(clock::normalize(from)?);
    }
    if let Some(to) = &q.to {
        q.to = Some(clock::normalize(to)?);
    }

    // 유효 사용자 결정: 관리자만 다른 사용자를 지정할 수 있습니다
    let effective_user = if user.is_admin() {
        q.user_id.clone()
    } else {
        Some(user.id.clone())
    };

    let entries =
        db::time_entries::list_entries(&state.pool, effective_user.as_deref(), &q).await?;
    Ok(Json(json!({ "entries": entries })))
}

/// `POST /time-entries` — 수동(backfill) 기록을 생성합니다.
///
/// 요청 본문: `{ "task_id": "...", "start_time": "...", "end_time": "...", ... }`
///
/// ## 처리 흐름
/// 1. 시각 파싱·정규화 → 실패하면 400
/// 2. `end > start` 엄격 검증 → 아니면 400 invalid_range
/// 3. 작업 존재·접근 권한 확인 (타이머 시작과 같은 규칙)
/// 4. 겹침 검사 + 삽입 (저장소 트랜잭션) → 겹치면 409 overlapping_entry
/// 5. 작업 누적 시간 재집계
pub async fn create_time_entry(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<CreateManualEntryRequest>,
) -> Result<Json<Value>, AppError> {
    let user = current_user(&state.pool, &auth_user).await?;

    let start_time = clock::normalize(&req.start_time)?;
    let end_time = clock::normalize(&req.end_time)?;

    // 정규화된 문자열은 사전순 == 시간순이므로 문자열 비교로 충분합니다
    if end_time <= start_time {
        return Err(AppError::InvalidRange);
    }

    let task = db::get_task(&state.pool, &req.task_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !access::can_access_task(&user, &task) {
        return Err(AppError::AccessDenied);
    }

    let entry = db::time_entries::create_manual_entry(
        &state.pool,
        &user,
        &task,
        &req,
        &start_time,
        &end_time,
    )
    .await?;

    // 처음부터 종료 상태로 생성됐으므로 바로 집계합니다
    db::recompute_actual_hours(&state.pool, &task.id).await?;

    state.events.publish(TimerEvent::logged(&entry));

    Ok(Json(json!({ "entry": entry })))
}

/// `GET /time-entries/{id}` — 기록 하나를 조회합니다.
///
/// 소유자 또는 관리자만 볼 수 있습니다. 응답에는 파생 수익
/// (`billable ? duration/3600 * rate : 0`)이 함께 담깁니다.
pub async fn get_time_entry(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user = current_user(&state.pool, &auth_user).await?;

    let entry = db::time_entries::get_entry(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !access::can_touch_entry(&user, &entry) {
        return Err(AppError::AccessDenied);
    }

    let earnings = entry.earnings();
    Ok(Json(json!({ "entry": entry, "earnings": earnings })))
}

/// `PUT /time-entries/{id}` — 종료된 기록을 수정합니다.
///
/// 실행 중인 기록이면 409 cannot_edit_running으로 거절합니다.
/// start/end 중 하나라도 바뀌면 새 구간을 검증(`end > start`)하고
/// 소요 시간을 다시 계산하며, 작업의 누적 시간을 재집계합니다.
pub async fn update_time_entry(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTimeEntryRequest>,
) -> Result<Json<Value>, AppError> {
    let user = current_user(&state.pool, &auth_user).await?;

    let entry = db::time_entries::get_entry(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !access::can_touch_entry(&user, &entry) {
        return Err(AppError::AccessDenied);
    }

    // 구간이 바뀌는 수정인지 판별하고, 바뀐다면 새 구간을 완성합니다.
    // 한쪽 시각만 주어지면 나머지는 기존 값을 그대로 씁니다.
    let range_changed = req.start_time.is_some() || req.end_time.is_some();
    let range = if range_changed {
        // 실행 중인 기록에는 end_time이 없으므로 구간 수정 자체가 성립하지
        // 않습니다. 저장소도 거부하지만 여기서 먼저 잘라냅니다.
        if entry.is_running {
            return Err(AppError::CannotEditRunning);
        }

        let new_start = match &req.start_time {
            Some(value) => clock::normalize(value)?,
            None => entry.start_time.clone(),
        };
        let new_end = match &req.end_time {
            Some(value) => clock::normalize(value)?,
            None => entry
                .end_time
                .clone()
                .ok_or(AppError::Internal("Closed entry without end time".to_string()))?,
        };

        if new_end <= new_start {
            return Err(AppError::InvalidRange);
        }

        let duration = clock::duration_seconds(&new_start, &new_end)?;
        Some((new_start, new_end, duration))
    } else {
        None
    };

    let updated = db::time_entries::update_entry(&state.pool, &id, &req, range)
        .await?
        .ok_or(AppError::NotFound)?;

    if range_changed {
        db::recompute_actual_hours(&state.pool, &updated.task_id).await?;
    }

    let earnings = updated.earnings();
    Ok(Json(json!({ "entry": updated, "earnings": earnings })))
}

/// `DELETE /time-entries/{id}` — 종료된 기록을 삭제합니다. → `204 No Content`
///
/// 실행 중인 기록이면 409 cannot_delete_running으로 거절합니다.
/// 삭제 후 작업의 누적 시간을 재집계합니다 — 집계는 처음부터 다시
/// 계산하는 방식이라 삭제 뒤에 호출해도 안전합니다.
pub async fn delete_time_entry(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let user = current_user(&state.pool, &auth_user).await?;

    let entry = db::time_entries::get_entry(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !access::can_touch_entry(&user, &entry) {
        return Err(AppError::AccessDenied);
    }

    let task_id = db::time_entries::delete_entry(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    db::recompute_actual_hours(&state.pool, &task_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
