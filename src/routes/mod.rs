//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! Axum에서 핸들러는 HTTP 요청을 받아 응답을 반환하는 async 함수입니다.
//!
//! 각 하위 모듈:
//! - `auth`: 인증 관련 (회원가입, 로그인, 토큰 갱신, 로그아웃, 내 정보)
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `projects`: 프로젝트 CRUD 핸들러
//! - `reports`: 작업별 시간/수익 리포트 핸들러
//! - `tasks`: 작업 CRUD 핸들러
//! - `time_entries`: 시간기록 조회/수동 생성/수정/삭제 핸들러
//! - `timer`: 타이머 시작/정지/조회 핸들러 (AppState 정의 포함)

pub mod auth;
pub mod health;
pub mod projects;
pub mod reports;
pub mod tasks;
pub mod time_entries;
pub mod timer;

// 각 모듈의 핸들러 함수들을 재공개하여
// main.rs에서 `routes::start_timer`처럼 바로 접근 가능하게 합니다.
pub use health::*;
pub use projects::*;
pub use reports::*;
pub use tasks::*;
pub use time_entries::*;
pub use timer::*;
