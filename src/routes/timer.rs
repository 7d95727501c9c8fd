//! # 타이머 컨트롤러 라우트 핸들러
//!
//! 사용자별 라이브 타이머의 시작/정지/조회를 처리하는 HTTP 핸들러입니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | POST | /api/v1/timer/start | `start_timer` | 타이머 시작 |
//! | POST | /api/v1/timer/{id}/stop | `stop_timer` | 타이머 정지, 기록 확정 |
//! | GET | /api/v1/timer/active | `get_active_timer` | 실행 중인 타이머 조회 |
//!
//! ## 타이머 1개 규칙
//! 시작 요청은 먼저 실행 중인 타이머가 있는지 검사하고, 있으면
//! `active_timer_conflict`(충돌 기록의 id 포함)로 거절합니다.
//! 기존 타이머를 조용히 정지시키지 않습니다 — 무엇을 할지는
//! 클라이언트가 결정합니다. 이 검사를 뚫는 동시 요청은 저장소
//! 계층(db::time_entries)이 트랜잭션으로 직렬화합니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    services::{
        access, clock,
        events::{EventSink, TimerEvent},
    },
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// Axum의 의존성 주입(Dependency Injection) 메커니즘입니다.
/// SqlitePool은 내부적으로 Arc를 사용하므로 clone해도 실제 풀이
/// 복제되지 않고, 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// JWT 토큰 서명용 비밀키
    pub jwt_secret: String,
    /// 타이머 이벤트 싱크 — 전역 상태 대신 주입식 인터페이스
    pub events: Arc<dyn EventSink>,
}

/// 토큰의 user_id로 현재 사용자를 로딩합니다.
///
/// 토큰은 유효하지만 사용자가 삭제된 경우를 대비해 매 요청마다
/// DB에서 확인합니다. 역할(role)과 시간당 요금은 여기서 함께 옵니다.
pub(crate) async fn current_user(
    pool: &SqlitePool,
    auth_user: &AuthUser,
) -> Result<User, AppError> {
    db::users::find_by_id(pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::Unauthorized("User no longer exists".to_string()))
}

/// `POST /timer/start` — 작업에 대한 타이머를 시작합니다.
///
/// 요청 본문: `{ "task_id": "...", "description": "...", "billable": true }`
///
/// ## 처리 흐름
/// 1. 작업 존재 확인 → 없으면 404
/// 2. 접근 권한 확인 (담당자/생성자/관리자) → 아니면 403
/// 3. 실행 중 타이머 검사 → 있으면 409 + 충돌 기록 id
/// 4. 실행 중 기록 생성 (요금 스냅샷, 프로젝트 복사)
pub async fn start_timer(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<StartTimerRequest>,
) -> Result<Json<Value>, AppError> {
    let user = current_user(&state.pool, &auth_user).await?;

    let task = db::get_task(&state.pool, &req.task_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !access::can_access_task(&user, &task) {
        return Err(AppError::AccessDenied);
    }

    // 사전 검사: 이미 실행 중인 타이머가 있으면 충돌로 거절합니다.
    // 충돌 기록의 id를 돌려주므로 클라이언트가 먼저 정지시킬 수 있습니다.
    if let Some(active) = db::time_entries::find_running_entry(&state.pool, &user.id).await? {
        return Err(AppError::ActiveTimerConflict { entry_id: active.id });
    }

    let started_at = clock::now_utc();
    let (entry, force_closed) =
        db::time_entries::create_running_entry(&state.pool, &user, &task, &req, &started_at)
            .await?;

    // 사전 검사와 생성 사이에 끼어든 타이머가 강제 종료됐다면
    // 그 기록들이 속한 작업의 누적 시간도 종료 상태를 반영해야 합니다
    for closed in &force_closed {
        db::recompute_actual_hours(&state.pool, &closed.task_id).await?;
    }

    state.events.publish(TimerEvent::started(&entry));

    Ok(Json(json!({ "entry": entry })))
}

/// `POST /timer/{id}/stop` — 실행 중인 타이머를 정지합니다.
///
/// 기록이 없거나, 남의 것이거나, 이미 정지된 경우 모두 404입니다.
/// 세 경우를 구분해서 응답하면 기록의 존재 여부가 노출되기 때문입니다.
///
/// 정지 성공 시 소요 시간이 계산되고, 작업의 누적 시간이 다시
/// 집계됩니다. 응답에는 확정된 기록과 파생 수익이 담깁니다.
pub async fn stop_timer(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user = current_user(&state.pool, &auth_user).await?;

    let stopped_at = clock::now_utc();
    let entry = db::time_entries::stop_entry(&state.pool, &user.id, &id, &stopped_at)
        .await?
        .ok_or(AppError::NotFound)?;

    // 기록이 종료 상태로 전이됐으므로 누적 시간을 다시 집계합니다
    db::recompute_actual_hours(&state.pool, &entry.task_id).await?;

    state.events.publish(TimerEvent::stopped(&entry));

    let earnings = entry.earnings();
    Ok(Json(json!({ "entry": entry, "earnings": earnings })))
}

/// `GET /timer/active` — 내 실행 중인 타이머를 조회합니다.
///
/// 실행 중인 타이머가 없으면 `{ "entry": null }`을 반환합니다.
/// 읽기 전용이며 부수 효과가 없습니다.
pub async fn get_active_timer(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let user = current_user(&state.pool, &auth_user).await?;

    let entry = db::time_entries::find_running_entry(&state.pool, &user.id).await?;
    Ok(Json(json!({ "entry": entry })))
}
