//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로
//! - `JWT_SECRET`: JWT 토큰 서명에 사용할 비밀키
//! - `HOST`: 서버 바인딩 주소
//! - `PORT`: 서버 포트 번호

use std::env;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 파일 경로 (예: "sqlite:data/girok.db")
    pub database_url: String,
    /// JWT 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    /// u16: 0~65535 범위의 부호 없는 16비트 정수. 포트 번호에 딱 맞는 타입입니다.
    pub port: u16,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 반환값
    /// - `Ok(Config)`: 필수 환경변수가 모두 있으면 설정 객체 반환
    /// - `Err(VarError)`: 필수 환경변수(DATABASE_URL, JWT_SECRET)가 없으면 에러
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?, // 필수: 없으면 에러
            jwt_secret: env::var("JWT_SECRET")?,     // 필수: 없으면 에러

            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            // 포트 번호는 문자열 → 숫자 변환이 필요합니다.
            // .parse(): 문자열을 다른 타입으로 파싱. 여기서는 u16으로 변환합니다.
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()          // "3000" → 3000u16
                .unwrap_or(3000), // 파싱 실패 시 기본값
        })
    }
}
