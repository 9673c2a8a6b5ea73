#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`team`]: 팀 이름 정규화 (`TERRORIST` → `T`, `T` → `Terrorist`)
//! - [`i18n`]: triggered 이벤트 코드 번역 테이블 (내장 YAML + 디스크 오버라이드)
//! - [`classifier`]: 라인 형태 규칙 카탈로그와 라인 분류기
//! - [`handler`]: 표시 스위치 확인 후 디스플레이어 호출 (디스패처)
//! - [`collector`]: UDP 수신기와 로그 파일 재생
//! - [`config`]: 파서 설정 빌더
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! UdpLogCollector / replay_file -> LogHandler::process_line -> LineClassifier -> Displayer
//!        |                               |                         |
//!  split_datagram                 display_* switches     rules + team + i18n
//! ```

pub mod classifier;
pub mod collector;
pub mod config;
pub mod error;
pub mod handler;
pub mod i18n;
pub mod team;

// --- 주요 타입 re-export ---

// 디스패처
pub use handler::{LogHandler, LogHandlerBuilder};

// 분류기
pub use classifier::{Classification, LineClassifier, LineRule};

// 설정
pub use config::ParserConfigBuilder;

// 에러
pub use error::LogParserError;

// 번역
pub use i18n::{TranslationLoader, Translations};

// 수집기
pub use collector::{CollectorStats, CollectorStatus, ReplayStats, UdpLogCollector, replay_file};
