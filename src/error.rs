//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! 시간기록 도메인의 상태 에러(실행 중인 타이머 충돌, 구간 겹침 등)는
//! 모두 호출자가 스스로 바로잡을 수 있는 에러이므로, 각각 고유한 코드
//! 문자열과 함께 4xx 응답으로 변환됩니다. 저장소 장애 같은 내부 에러만
//! 5xx로 분리됩니다.

use axum::{
    http::StatusCode,                     // HTTP 상태 코드 (200, 404, 500 등)
    response::{IntoResponse, Response},   // Axum의 응답 변환 트레이트
    Json,                                 // JSON 응답 래퍼
};
use serde_json::json; // json! 매크로: JSON 객체를 간편하게 생성
use thiserror::Error; // thiserror: 커스텀 에러 타입을 쉽게 만들어주는 매크로 크레이트

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 메시지로 변환됩니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    ///
    /// 타이머 정지 경로에서는 "존재하지만 내 것이 아닌" 기록과
    /// "실행 중이 아닌" 기록도 이 에러로 보고합니다.
    /// 존재 여부 자체를 노출하지 않기 위한 의도적인 접힘(folding)입니다.
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 요청 (HTTP 400)
    /// String을 포함하여 구체적인 에러 메시지를 전달합니다.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 작업에 대한 권한 없음 (HTTP 403)
    /// 담당자도, 생성자도, 관리자도 아닌 사용자의 접근입니다.
    #[error("Access denied")]
    AccessDenied,

    /// 이미 실행 중인 타이머가 있음 (HTTP 409)
    ///
    /// 충돌한 기록의 id를 함께 반환하여, 클라이언트가 먼저 그 타이머를
    /// 정지할지 결정할 수 있게 합니다. 기존 타이머를 조용히 정지시키지
    /// 않습니다.
    #[error("A timer is already running")]
    ActiveTimerConflict { entry_id: String },

    /// 종료 시각이 시작 시각보다 이후가 아님 (HTTP 400)
    #[error("End time must be after start time")]
    InvalidRange,

    /// 수동 기록의 구간이 기존 기록과 겹침 (HTTP 409)
    /// 경계가 맞닿는 경우(끝 == 시작)도 겹침으로 판정합니다.
    #[error("Time range overlaps an existing entry")]
    OverlappingEntry,

    /// 실행 중인 기록은 수정할 수 없음 (HTTP 409) — 먼저 정지해야 합니다.
    #[error("Cannot edit a running entry")]
    CannotEditRunning,

    /// 실행 중인 기록은 삭제할 수 없음 (HTTP 409) — 먼저 정지해야 합니다.
    #[error("Cannot delete a running entry")]
    CannotDeleteRunning,

    /// 인증 실패 (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 리소스 충돌 — 중복 사용자명 등 (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx::Error를 AppError로 자동 변환하는 From 트레이트를 구현합니다.
    /// 이를 통해 sqlx 함수에서 반환된 에러에 `?` 연산자를 사용하면
    /// 자동으로 AppError::Database로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 각 에러 종류에 따라 적절한 HTTP 상태 코드와 JSON 에러 메시지를 생성합니다.
    /// 내부 에러(Database, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다 (보안을 위해).
    fn into_response(self) -> Response {
        // ActiveTimerConflict는 에러 본문에 충돌한 entry_id를 추가로 싣습니다.
        if let AppError::ActiveTimerConflict { ref entry_id } = self {
            let body = Json(json!({
                "error": {
                    "code": "active_timer_conflict",
                    "message": self.to_string(),
                    "entry_id": entry_id,
                }
            }));
            return (StatusCode::CONFLICT, body).into_response();
        }

        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            AppError::AccessDenied => {
                (StatusCode::FORBIDDEN, "access_denied", self.to_string())
            }
            AppError::InvalidRange => {
                (StatusCode::BAD_REQUEST, "invalid_range", self.to_string())
            }
            AppError::OverlappingEntry => {
                (StatusCode::CONFLICT, "overlapping_entry", self.to_string())
            }
            AppError::CannotEditRunning => {
                (StatusCode::CONFLICT, "cannot_edit_running", self.to_string())
            }
            AppError::CannotDeleteRunning => {
                (StatusCode::CONFLICT, "cannot_delete_running", self.to_string())
            }
            AppError::Unauthorized(ref msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone())
            }
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
            // 위에서 먼저 처리했으므로 여기에 도달하지 않습니다.
            AppError::ActiveTimerConflict { .. } => unreachable!(),
        };

        // 결과: { "error": { "code": "...", "message": "..." } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_status_codes() {
        let cases: Vec<(AppError, StatusCode)> = vec![
            (AppError::NotFound, StatusCode::NOT_FOUND),
            (AppError::AccessDenied, StatusCode::FORBIDDEN),
            (AppError::InvalidRange, StatusCode::BAD_REQUEST),
            (AppError::OverlappingEntry, StatusCode::CONFLICT),
            (AppError::CannotEditRunning, StatusCode::CONFLICT),
            (AppError::CannotDeleteRunning, StatusCode::CONFLICT),
            (
                AppError::ActiveTimerConflict { entry_id: "e1".into() },
                StatusCode::CONFLICT,
            ),
        ];

        for (err, expected) in cases {
            let response = err.into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
