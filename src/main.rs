//! # girok 웹 서버 진입점
//!
//! 이 파일은 girok 애플리케이션의 **시작점(entry point)**입니다.
//! Rust 프로그램은 항상 `main()` 함수에서 실행이 시작됩니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. API 라우터 설정
//! 6. HTTP 서버 시작

// ── 모듈 선언 ──
// `mod` 키워드는 다른 파일을 모듈로 가져옵니다.
// 예: `mod config;`는 같은 디렉토리의 `config.rs` 또는 `config/mod.rs`를 가져옵니다.
// Rust에서는 파일 시스템 구조가 곧 모듈 구조입니다.
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;

use anyhow::Result; // anyhow::Result: 어떤 에러 타입이든 담을 수 있는 범용 Result 타입
use axum::{
    routing::{get, post}, // HTTP 메서드별 라우팅 함수들
    Router,               // 라우터: URL 경로와 핸들러를 연결하는 구조체
};
use config::Config;
use routes::{timer::AppState, *};
use services::events::TracingSink;
use sqlx::sqlite::SqlitePoolOptions; // SQLite 연결 풀 설정 옵션
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer}, // CORS(Cross-Origin Resource Sharing) 설정
    trace::TraceLayer,      // HTTP 요청/응답 로깅 미들웨어
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt}; // 로깅 초기화 유틸리티

// #[tokio::main]: 비동기 런타임을 시작하는 **어트리뷰트 매크로**
// Rust의 main() 함수는 기본적으로 동기(sync)이므로,
// async/await를 사용하려면 비동기 런타임(Tokio)이 필요합니다.
#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일에서 환경변수를 읽어옵니다. (예: DATABASE_URL, JWT_SECRET 등)
    // .ok()는 Result를 Option으로 변환하여, .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // registry(): 로그 수집기를 만들고
    // .with(): 필터와 포맷터를 레이어처럼 쌓아올립니다
    tracing_subscriber::registry()
        .with(
            // EnvFilter: RUST_LOG 환경변수로 로그 레벨을 제어합니다.
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "girok=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer()) // 로그를 터미널에 출력하는 포맷터 레이어
        .init(); // 전역 로거로 등록

    // ── 3단계: 설정 로딩 ──
    // `?` 연산자: Result가 Err이면 즉시 함수에서 반환(에러 전파).
    let config = Config::from_env()?;
    tracing::info!("Starting girok server on {}:{}", config.host, config.port);

    // ── 4단계: SQLite 연결 풀 생성 ──
    // 연결 풀(Connection Pool): 데이터베이스 연결을 미리 여러 개 만들어두고
    // 재사용하는 패턴. 매 요청마다 새 연결을 만들면 느리므로,
    // 풀에서 빌려 쓰고 반환합니다.
    let pool = SqlitePoolOptions::new()
        .max_connections(5) // 최대 5개의 동시 연결을 유지
        .connect(&config.database_url)
        .await?;

    // ── 5단계: 데이터베이스 마이그레이션 실행 ──
    // sqlx::migrate!는 컴파일 타임에 ./migrations 폴더의 SQL 파일들을 포함시키는 매크로
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool) // 아직 실행되지 않은 마이그레이션만 순서대로 실행
        .await?;

    // ── 6단계: 애플리케이션 상태(State) 생성 ──
    // AppState: 모든 라우트 핸들러가 공유하는 데이터를 담는 구조체.
    // 타이머 이벤트 싱크는 전역 변수가 아니라 여기서 주입합니다 —
    // 테스트에서는 다른 구현으로 바꿔 끼울 수 있습니다.
    let state = AppState {
        pool: pool.clone(),
        jwt_secret: config.jwt_secret.clone(),
        events: Arc::new(TracingSink),
    };

    // ── 7단계: API 라우터 설정 ──
    // Router::new(): 빈 라우터를 생성합니다.
    // .route(): URL 패턴과 핸들러 함수를 연결합니다.

    // 인증 관련 라우트 (회원가입, 로그인, 토큰 갱신, 로그아웃, 내 정보)
    let auth_routes = Router::new()
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/refresh", post(routes::auth::refresh))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/me", get(routes::auth::me).patch(routes::auth::update_me));

    // 모든 API 라우트를 하나로 합칩니다.
    let api_routes = Router::new()
        // .merge(): 다른 라우터의 라우트들을 현재 라우터에 합칩니다.
        .merge(auth_routes)
        // 프로젝트 CRUD API
        // {id}는 URL 경로 파라미터 (Path<String>으로 핸들러에서 추출)
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/{id}", get(get_project).patch(update_project).delete(delete_project))
        // 작업 CRUD API
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", get(get_task).patch(update_task).delete(delete_task))
        // 타이머 API — 시작/정지/실행 중 조회
        .route("/timer/start", post(start_timer))
        .route("/timer/{id}/stop", post(stop_timer))
        .route("/timer/active", get(get_active_timer))
        // 시간기록 API — 필터 조회, 수동 생성, 단건 조회/수정/삭제
        .route("/time-entries", get(list_time_entries).post(create_time_entry))
        .route("/time-entries/{id}", get(get_time_entry).put(update_time_entry).delete(delete_time_entry))
        // 작업별 시간/수익 리포트 API
        .route("/reports/time", get(time_report))
        // 헬스체크 API (서버 상태 확인용)
        .route("/health", get(health_check))
        // .with_state(): 이 라우터의 모든 핸들러에서 AppState를 사용할 수 있게 합니다.
        .with_state(state);

    // ── 8단계: CORS 미들웨어 설정 ──
    // 개발 환경에서는 Any(모두 허용)로 설정합니다.
    // 프로덕션에서는 특정 도메인만 허용해야 합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // .nest(): API 라우트를 /api/v1 경로 아래에 중첩시킵니다.
        // 예: /timer/start → /api/v1/timer/start
        .nest("/api/v1", api_routes)
        // .layer(): 미들웨어를 추가합니다. 미들웨어는 요청/응답을 가로채서 처리합니다.
        .layer(cors)
        .layer(TraceLayer::new_for_http()); // HTTP 요청/응답 자동 로깅

    // ── 9단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    // TcpListener: TCP 연결을 수신 대기하는 소켓
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // axum::serve(): Axum 서버를 시작하고 요청을 처리합니다.
    // 이 줄에서 서버가 영원히 실행됩니다 (Ctrl+C로 종료할 때까지).
    axum::serve(listener, app).await?;

    Ok(())
}
