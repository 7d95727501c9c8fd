//! # 타이머 이벤트 싱크
//!
//! 타이머 전이(시작/정지/수동 기록)를 외부로 알리는 주입식 인터페이스입니다.
//! 전역 상태에 기대지 않고 `AppState`를 통해 `Arc<dyn EventSink>`로
//! 주입되므로, 실제 전송 계층 없이도 엔진을 테스트할 수 있습니다.
//! 기본 구현은 tracing 로그로 이벤트를 남깁니다.

use crate::models::TimeEntry;

/// 엔진이 발행하는 타이머 이벤트
#[derive(Debug, Clone)]
pub enum TimerEvent {
    /// 타이머가 시작됨
    Started { entry_id: String, task_id: String, user_id: String },
    /// 타이머가 정지되고 기록이 확정됨
    Stopped { entry_id: String, task_id: String, duration_seconds: i64 },
    /// 수동 기록이 등록됨
    Logged { entry_id: String, task_id: String, duration_seconds: i64 },
}

impl TimerEvent {
    pub fn started(entry: &TimeEntry) -> Self {
        Self::Started {
            entry_id: entry.id.clone(),
            task_id: entry.task_id.clone(),
            user_id: entry.user_id.clone(),
        }
    }

    pub fn stopped(entry: &TimeEntry) -> Self {
        Self::Stopped {
            entry_id: entry.id.clone(),
            task_id: entry.task_id.clone(),
            duration_seconds: entry.duration_seconds,
        }
    }

    pub fn logged(entry: &TimeEntry) -> Self {
        Self::Logged {
            entry_id: entry.id.clone(),
            task_id: entry.task_id.clone(),
            duration_seconds: entry.duration_seconds,
        }
    }
}

/// 이벤트를 받아 처리하는 싱크 인터페이스
///
/// Send + Sync: 여러 요청 핸들러가 동시에 공유하므로 필요합니다.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: TimerEvent);
}

/// tracing 로그로 이벤트를 남기는 기본 싱크
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&self, event: TimerEvent) {
        match event {
            TimerEvent::Started { entry_id, task_id, user_id } => {
                tracing::info!(%entry_id, %task_id, %user_id, "timer started");
            }
            TimerEvent::Stopped { entry_id, task_id, duration_seconds } => {
                tracing::info!(%entry_id, %task_id, duration_seconds, "timer stopped");
            }
            TimerEvent::Logged { entry_id, task_id, duration_seconds } => {
                tracing::info!(%entry_id, %task_id, duration_seconds, "manual entry logged");
            }
        }
    }
}
