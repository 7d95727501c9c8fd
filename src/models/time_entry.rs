//! # 시간기록(TimeEntry) 모델 정의
//!
//! 추적된 작업 시간 한 구간을 표현하는 데이터 구조체들을 정의합니다.
//!
//! ## 기록의 두 가지 생성 경로
//! 1. **라이브 타이머**: 시작 시 `is_running = true`로 생성되고,
//!    정지 시 `end_time`이 채워지며 종료 상태가 됩니다.
//! 2. **수동 기록(backfill)**: 시작/종료 시각이 모두 알려진 상태로
//!    `is_manual = true`, 처음부터 종료 상태로 생성됩니다.
//!
//! ## 불변 조건
//! - 사용자당 실행 중(`is_running = true`)인 기록은 최대 1개
//! - `end_time`이 설정되면 `duration_seconds = floor((end - start) / 1000)`
//! - `end_time`은 항상 `start_time`보다 엄격히 이후
//! - 수동 기록의 구간은 같은 사용자의 다른 종료된 기록과 겹칠 수 없음

use serde::{Deserialize, Serialize};

/// 시간기록 엔티티 — DB의 `time_entries` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TimeEntry {
    /// 기록 고유 식별자 (UUIDv7)
    pub id: String,
    /// 이 기록의 소유자 — 기록을 만든 사용자만이 소유합니다
    pub user_id: String,
    /// 추적 대상 작업의 ID (외래키)
    pub task_id: String,
    /// 작업이 속한 프로젝트의 ID — 생성 시점에 작업에서 복사됩니다
    pub project_id: String,
    /// 무엇을 했는지에 대한 자유 서술 (선택)
    pub description: Option<String>,
    /// 추적 시작 시각 (ISO 8601: "2024-01-01T09:00:00.000Z")
    pub start_time: String,
    /// 추적 종료 시각 — None이면 아직 실행 중인 타이머
    pub end_time: Option<String>,
    /// 소요 시간(초). 실행 중에는 0으로 읽힙니다.
    pub duration_seconds: i64,
    /// 실행 중 여부
    pub is_running: bool,
    /// 수동(backfill) 기록 여부 — 라이브 타이머로 만든 기록은 false
    pub is_manual: bool,
    /// 과금 대상 여부 — false이면 수익 계산에서 제외됩니다
    pub billable: bool,
    /// 시간당 요금. 생성 시점 사용자의 요금을 스냅샷한 값이므로,
    /// 이후 사용자의 요금이 바뀌어도 이 기록의 수익은 변하지 않습니다.
    pub hourly_rate: f64,
    /// 자유 형식 태그 (쉼표 구분 문자열, 선택)
    pub tags: Option<String>,
    /// 생성 시각
    pub created_at: String,
    /// 마지막 수정 시각
    pub updated_at: String,
}

impl TimeEntry {
    /// 이 기록의 수익을 계산합니다.
    ///
    /// `billable ? duration_seconds / 3600 * hourly_rate : 0`
    ///
    /// 파생 값이므로 저장하지 않습니다 — 단건 조회 응답과 리포트가
    /// 이 계약에 의존합니다.
    pub fn earnings(&self) -> f64 {
        if self.billable {
            self.duration_seconds as f64 / 3600.0 * self.hourly_rate
        } else {
            0.0
        }
    }
}

/// 타이머 시작 요청 — `POST /api/v1/timer/start`의 요청 본문에 해당합니다.
///
/// 시작 시각은 서버가 현재 시각으로 결정하므로 본문에 없습니다.
#[derive(Debug, Deserialize)]
pub struct StartTimerRequest {
    /// 추적할 작업의 ID
    pub task_id: String,
    /// 작업 내용 서술 (선택)
    pub description: Option<String>,
    /// 과금 대상 여부 (선택 — 기본값 true)
    pub billable: Option<bool>,
    /// 자유 형식 태그 (선택)
    pub tags: Option<String>,
}

/// 수동 기록 생성 요청 — `POST /api/v1/time-entries`의 요청 본문에 해당합니다.
///
/// 라이브 타이머와 달리 시작/종료 시각을 클라이언트가 모두 제공합니다.
#[derive(Debug, Deserialize)]
pub struct CreateManualEntryRequest {
    pub task_id: String,
    /// 시작 시각 — "2024-01-01T14:00" 같은 분 정밀도 입력도 허용됩니다
    pub start_time: String,
    /// 종료 시각 — 시작 시각보다 엄격히 이후여야 합니다
    pub end_time: String,
    pub description: Option<String>,
    pub billable: Option<bool>,
    pub tags: Option<String>,
}

/// 시간기록 수정 요청 — `PUT /api/v1/time-entries/:id`의 요청 본문에 해당합니다.
///
/// 실행 중인 기록에는 적용할 수 없습니다 (먼저 정지해야 함).
/// 시각을 바꾸면 소요 시간과 작업의 누적 시간이 다시 계산됩니다.
#[derive(Debug, Deserialize)]
pub struct UpdateTimeEntryRequest {
    pub description: Option<String>,
    pub tags: Option<String>,
    pub billable: Option<bool>,
    pub hourly_rate: Option<f64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// 시간기록 목록 필터 — `GET /api/v1/time-entries`의 쿼리 파라미터입니다.
///
/// 예: `/api/v1/time-entries?from=2024-01-01T00:00&task_id=...&billable=true`
#[derive(Debug, Deserialize)]
pub struct ListTimeEntriesQuery {
    /// 이 시각 이후에 시작한 기록만 (선택)
    pub from: Option<String>,
    /// 이 시각 이전에 시작한 기록만 (선택)
    pub to: Option<String>,
    pub task_id: Option<String>,
    pub project_id: Option<String>,
    /// 관리자 전용 — 다른 사용자의 기록 조회. 일반 사용자는 무시됩니다.
    pub user_id: Option<String>,
    pub billable: Option<bool>,
}

/// 리포트 필터 — `GET /api/v1/reports/time`의 쿼리 파라미터입니다.
#[derive(Debug, Deserialize)]
pub struct TimeReportQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub project_id: Option<String>,
    /// 관리자 전용 — 다른 사용자 기준의 리포트
    pub user_id: Option<String>,
}

/// 리포트 한 행 — 작업 단위로 묶은 종료 기록들의 합계입니다.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TaskTimeReportRow {
    pub task_id: String,
    pub task_title: String,
    /// 종료된 기록들의 소요 시간 합(초)
    pub total_seconds: i64,
    /// total_seconds를 시간으로 환산한 값 (소수 2자리)
    pub total_hours: f64,
    /// billable 기록만의 수익 합 (소수 2자리)
    pub earnings: f64,
}
