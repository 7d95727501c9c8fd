//! # 작업(Task) 모델 정의
//!
//! 프로젝트에 속한 작업과 관련된 데이터 구조체들을 정의합니다.
//!
//! ## 구조체 역할
//! - `Task`: 데이터베이스에 저장된 작업을 표현 (응답용)
//! - `CreateTaskRequest`: 새 작업 생성 시 클라이언트가 보내는 JSON 본문
//! - `UpdateTaskRequest`: 작업 수정 시 클라이언트가 보내는 JSON 본문

use serde::{Deserialize, Serialize};

/// 작업 엔티티 — DB의 `tasks` 테이블 한 행(row)에 대응합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// 작업 고유 식별자 (UUIDv7 형식 문자열)
    pub id: String,
    /// 이 작업이 속한 프로젝트의 ID (외래키)
    pub project_id: String,
    /// 작업 제목
    pub title: String,
    /// 작업 상세 설명 (선택)
    pub description: Option<String>,
    /// 작업 상태: "todo", "in_progress", "done"
    pub status: String,
    /// 담당자 사용자 ID — None이면 아직 배정되지 않음
    pub assignee_id: Option<String>,
    /// 작업을 생성한 사용자 ID
    pub created_by: String,
    /// 종료된 시간기록들의 합(시간 단위, 소수 2자리).
    ///
    /// 비정규화(denormalized) 필드입니다. 작업 API로는 수정할 수 없고,
    /// 시간기록이 종료·수정·삭제될 때마다 집계기가 처음부터 다시 계산하여
    /// 덮어씁니다. 증분 갱신이 아니므로 수정/삭제 경로에서 값이 어긋나지
    /// 않습니다.
    pub actual_hours: f64,
    /// 생성 시각 (ISO 8601 형식: "2024-01-01T09:00:00.000Z")
    pub created_at: String,
    /// 마지막 수정 시각
    pub updated_at: String,
}

/// 작업 생성 요청 — `POST /api/v1/tasks`의 요청 본문(body)에 해당합니다.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// 작업이 속할 프로젝트의 ID (필수)
    pub project_id: String,
    /// 작업 제목 (필수)
    pub title: String,
    /// 상세 설명 (선택)
    pub description: Option<String>,
    /// 담당자 사용자 ID (선택)
    pub assignee_id: Option<String>,
}

/// 작업 목록 필터 — `GET /api/v1/tasks`의 쿼리 파라미터입니다.
#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    /// 이 프로젝트의 작업만 조회 (선택)
    pub project_id: Option<String>,
}

/// 작업 수정 요청 — `PATCH /api/v1/tasks/:id`의 요청 본문에 해당합니다.
///
/// 모든 필드가 Option인 이유: PATCH는 부분 업데이트를 의미합니다.
/// `actual_hours`는 여기에 없습니다 — 집계기만이 그 컬럼을 씁니다.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub assignee_id: Option<String>,
}
