//! # 시간 리포트 라우트 핸들러
//!
//! 종료된 시간기록을 작업 단위로 합산한 리포트를 반환합니다.
//!
//! ## 엔드포인트
//! - `GET /api/v1/reports/time` → `{ "report": [...] }`
//!
//! 쿼리 파라미터: `from`, `to`, `project_id`, 관리자 전용 `user_id`.
//! 각 행에는 합계 초, 시간(소수 2자리), 그리고 billable 기록만의
//! 수익 합계가 담깁니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::timer::{current_user, AppState},
    services::clock,
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

/// `GET /reports/time` — 작업별 시간/수익 리포트를 조회합니다.
pub async fn time_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(mut q): Query<TimeReportQuery>,
) -> Result<Json<Value>, AppError> {
    let user = current_user(&state.pool, &auth_user).await?;

    if let Some(from) = &q.from {
        q.from = Some(clock::normalize(from)?);
    }
    if let Some(to) = &q.to {
        q.to = Some(clock::normalize(to)?);
    }

    // 일반 사용자는 자기 기록 기준으로만 리포트를 봅니다
    let effective_user = if user.is_admin() {
        q.user_id.clone()
    } else {
        Some(user.id.clone())
    };

    let report = db::time_by_task(&state.pool, effective_user.as_deref(), &q).await?;
    Ok(Json(json!({ "report": report })))
}
