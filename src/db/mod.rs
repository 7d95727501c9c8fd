//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `projects`: 프로젝트 CRUD 쿼리
//! - `reports`: 작업별 시간/수익 합산 쿼리
//! - `tasks`: 작업 CRUD 쿼리와 누적 시간 집계
//! - `time_entries`: 시간기록 저장소 (타이머 엔진의 핵심)
//! - `users`: 사용자 인증 관련 쿼리

pub mod projects;
pub mod reports;
pub mod tasks;
pub mod time_entries;
pub mod users;

// 하위 모듈의 모든 공개 함수를 재공개(re-export)하여
// `crate::db::list_projects`처럼 바로 접근할 수 있게 합니다.
// users와 time_entries는 함수 이름이 일반적이어서(create_user, get_entry 등)
// 모듈 경로를 통해 호출합니다.
pub use projects::*;
pub use reports::*;
pub use tasks::*;
