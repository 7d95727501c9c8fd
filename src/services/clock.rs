//! # 시각 처리 서비스
//!
//! 타이머 엔진이 사용하는 시각 관련 유틸리티 함수들을 제공합니다.
//!
//! 이 모듈의 함수들:
//! - `now_utc()`: 현재 UTC 시각을 저장 포맷 문자열로 반환
//! - `parse_timestamp()`: 클라이언트가 보낸 시각 문자열을 파싱
//! - `normalize()`: 파싱 후 저장 포맷으로 재포맷 (저장 전 필수)
//! - `duration_seconds()`: 두 시각 사이의 소요 시간(초, 내림)
//!
//! ## 저장 포맷
//! 모든 시각은 밀리초 정밀도의 ISO-8601 UTC 문자열로 저장합니다.
//! 포맷이 고정 폭이므로 같은 포맷끼리는 **사전순 비교가 곧 시간순 비교**이며,
//! 덕분에 SQL에서 문자열 비교만으로 구간 겹침을 판정할 수 있습니다.
//! 클라이언트 입력은 반드시 `normalize()`를 거쳐야 이 성질이 유지됩니다.

use crate::error::AppError;
use chrono::{DateTime, NaiveDateTime, Utc};

/// 저장 포맷: "2024-01-01T09:00:00.000Z"
pub const TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// 현재 UTC 시각을 저장 포맷 문자열로 반환합니다.
pub fn now_utc() -> String {
    Utc::now().format(TS_FORMAT).to_string()
}

/// 시각 문자열을 `DateTime<Utc>`로 파싱합니다.
///
/// 클라이언트가 보내는 여러 정밀도의 입력을 허용합니다:
/// - RFC 3339 (오프셋 포함): "2024-01-01T09:00:00.000Z", "2024-01-01T10:00:00+01:00"
/// - 초 정밀도 (UTC로 간주): "2024-01-01T09:00:00"
/// - 분 정밀도 (UTC로 간주): "2024-01-01T09:00"
///
/// # 반환값
/// - `Ok(DateTime<Utc>)`: 파싱 성공
/// - `Err(AppError::BadRequest)`: 어떤 포맷에도 맞지 않는 입력
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, AppError> {
    // RFC 3339는 오프셋을 포함하므로 먼저 시도하고 UTC로 환산합니다.
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    // 오프셋 없는 입력은 UTC로 간주합니다.
    // .and_utc(): NaiveDateTime(시간대 없음)을 DateTime<Utc>로 변환
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(AppError::BadRequest(format!(
        "Invalid timestamp: {}",
        value
    )))
}

/// 시각 문자열을 파싱한 뒤 저장 포맷으로 재포맷합니다.
///
/// 저장소에 들어가는 모든 start/end 시각은 이 함수를 거쳐야 합니다.
/// 그래야 사전순 비교 == 시간순 비교 성질이 유지됩니다.
pub fn normalize(value: &str) -> Result<String, AppError> {
    Ok(parse_timestamp(value)?.format(TS_FORMAT).to_string())
}

/// 두 시각 사이의 소요 시간을 초 단위로 계산합니다.
///
/// 밀리초 정밀도로 차이를 구한 뒤 1000으로 나눠 **내림**합니다.
/// 예: 90.7초 차이 → 90초.
///
/// 호출자는 `end > start`를 먼저 검증해야 합니다. 이 함수는 음수 구간을
/// 만들지 않기 위해 `div_euclid`(바닥 나눗셈)를 사용하지만,
/// 검증은 호출자의 책임입니다.
pub fn duration_seconds(start: &str, end: &str) -> Result<i64, AppError> {
    let start = parse_timestamp(start)?;
    let end = parse_timestamp(end)?;
    // num_milliseconds(): 두 시각의 차이를 밀리초로
    // div_euclid(1000): 바닥 나눗셈 — 소수 초는 버림
    Ok((end - start).num_milliseconds().div_euclid(1000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2024-01-01T09:00:00.000Z", "2024-01-01T09:42:30.000Z", 2550)]
    #[case("2024-01-01T09:00:00.000Z", "2024-01-01T09:01:30.700Z", 90)] // 소수 초는 버림
    #[case("2024-01-01T09:00:00.000Z", "2024-01-01T09:00:00.999Z", 0)]
    #[case("2024-01-01T09:00:00.500Z", "2024-01-01T09:00:02.400Z", 1)]
    #[case("2024-01-01T09:00:00.000Z", "2024-01-02T09:00:00.000Z", 86400)]
    fn duration_floors_to_whole_seconds(
        #[case] start: &str,
        #[case] end: &str,
        #[case] expected: i64,
    ) {
        assert_eq!(duration_seconds(start, end).unwrap(), expected);
    }

    #[rstest]
    #[case("2024-01-01T14:00", "2024-01-01T14:00:00.000Z")] // 분 정밀도
    #[case("2024-01-01T14:00:05", "2024-01-01T14:00:05.000Z")] // 초 정밀도
    #[case("2024-01-01T14:00:05.250Z", "2024-01-01T14:00:05.250Z")] // 저장 포맷 그대로
    #[case("2024-01-01T15:00:00+01:00", "2024-01-01T14:00:00.000Z")] // 오프셋은 UTC로 환산
    fn normalize_accepts_lenient_inputs(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input).unwrap(), expected);
    }

    #[test]
    fn normalize_rejects_garbage() {
        assert!(normalize("not-a-time").is_err());
        assert!(normalize("2024-13-99T99:99").is_err());
    }

    #[test]
    fn normalized_strings_compare_chronologically() {
        let earlier = normalize("2024-01-01T09:00").unwrap();
        let later = normalize("2024-01-01T09:00:00.001Z").unwrap();
        assert!(earlier < later);
    }
}
