//! # 접근 권한 판정 서비스
//!
//! "누가 무엇을 할 수 있는가"를 판정하는 단일 지점입니다.
//! 역할 문자열 비교(`role == "admin"`)를 핸들러 곳곳에 흩어놓는 대신,
//! 모든 호출부가 이 모듈의 술어(predicate) 함수를 통해 판단합니다.
//! 접근 규칙이 바뀌면 이 파일만 고치면 됩니다.

use crate::models::{Project, Task, TimeEntry, User};

/// 사용자가 이 작업에 대해 시간을 기록할 수 있는지 판정합니다.
///
/// 허용되는 관계: 작업의 담당자, 작업의 생성자, 또는 관리자.
/// 타이머 시작과 수동 기록 생성이 모두 이 규칙을 따릅니다.
pub fn can_access_task(user: &User, task: &Task) -> bool {
    user.is_admin()
        || task.assignee_id.as_deref() == Some(user.id.as_str())
        || task.created_by == user.id
}

/// 사용자가 이 시간기록을 수정/삭제할 수 있는지 판정합니다.
///
/// 기록은 만든 사용자가 단독 소유하며, 관리자는 교정 목적으로
/// 대신 쓸 수 있습니다.
pub fn can_touch_entry(user: &User, entry: &TimeEntry) -> bool {
    user.is_admin() || entry.user_id == user.id
}

/// 사용자가 이 작업 자체(메타데이터)를 수정할 수 있는지 판정합니다.
pub fn can_edit_task(user: &User, task: &Task) -> bool {
    can_access_task(user, task)
}

/// 사용자가 이 프로젝트를 수정/삭제할 수 있는지 판정합니다.
/// 프로젝트는 생성자와 관리자만 건드릴 수 있습니다.
pub fn can_edit_project(user: &User, project: &Project) -> bool {
    user.is_admin() || project.created_by == user.id
}
