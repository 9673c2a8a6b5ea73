//! 설정 관리 -- hldslog.toml 파싱 및 런타임 설정
//!
//! [`HldsLogConfig`]는 모든 구성 요소의 설정을 담는 최상위 구조체입니다.
//! 모든 섹션과 필드는 `#[serde(default)]`이므로 생략된 키는 기본값을 쓰고,
//! 알 수 없는 키는 무시됩니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`HLDSLOG_PARSER_PORT=27016` 형식)
//! 3. 설정 파일 (`hldslog.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), hldslog_core::error::HldsLogError> {
//! use hldslog_core::config::HldsLogConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = HldsLogConfig::load("hldslog.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = HldsLogConfig::parse("[parser]\nport = 27016")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, HldsLogError};
use crate::event::EventKind;

/// hldslog 통합 설정
///
/// `hldslog.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HldsLogConfig {
    /// 일반 설정 (로깅)
    #[serde(default)]
    pub general: GeneralConfig,
    /// 라인 파서/디스패처 설정
    #[serde(default)]
    pub parser: ParserConfig,
    /// UDP 수집기 설정
    #[serde(default)]
    pub collector: CollectorConfig,
    /// Prometheus 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl HldsLogConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, HldsLogError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, HldsLogError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HldsLogError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                HldsLogError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, HldsLogError> {
        toml::from_str(toml_str).map_err(|e| {
            HldsLogError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `HLDSLOG_{SECTION}_{FIELD}`
    /// 예: `HLDSLOG_PARSER_DISPLAY_KILLS=false`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "HLDSLOG_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "HLDSLOG_GENERAL_LOG_FORMAT");

        // Parser
        let parser = &mut self.parser;
        override_string(&mut parser.host, "HLDSLOG_PARSER_HOST");
        override_u16(&mut parser.port, "HLDSLOG_PARSER_PORT");
        override_string(&mut parser.locale, "HLDSLOG_PARSER_LOCALE");
        override_string(&mut parser.locale_dir, "HLDSLOG_PARSER_LOCALE_DIR");
        override_bool(&mut parser.display_end_map, "HLDSLOG_PARSER_DISPLAY_END_MAP");
        override_bool(
            &mut parser.display_end_round,
            "HLDSLOG_PARSER_DISPLAY_END_ROUND",
        );
        override_bool(&mut parser.display_kills, "HLDSLOG_PARSER_DISPLAY_KILLS");
        override_bool(&mut parser.display_actions, "HLDSLOG_PARSER_DISPLAY_ACTIONS");
        override_bool(
            &mut parser.display_changelevel,
            "HLDSLOG_PARSER_DISPLAY_CHANGELEVEL",
        );
        override_bool(&mut parser.display_chat, "HLDSLOG_PARSER_DISPLAY_CHAT");
        override_bool(
            &mut parser.display_team_chat,
            "HLDSLOG_PARSER_DISPLAY_TEAM_CHAT",
        );
        override_bool(&mut parser.display_connect, "HLDSLOG_PARSER_DISPLAY_CONNECT");
        override_bool(
            &mut parser.display_disconnect,
            "HLDSLOG_PARSER_DISPLAY_DISCONNECT",
        );

        // Collector
        override_u64(
            &mut self.collector.idle_timeout_secs,
            "HLDSLOG_COLLECTOR_IDLE_TIMEOUT_SECS",
        );
        override_usize(
            &mut self.collector.max_datagram_size,
            "HLDSLOG_COLLECTOR_MAX_DATAGRAM_SIZE",
        );

        // Metrics
        override_bool(&mut self.metrics.enabled, "HLDSLOG_METRICS_ENABLED");
        override_string(&mut self.metrics.listen_addr, "HLDSLOG_METRICS_LISTEN_ADDR");
        override_u16(&mut self.metrics.port, "HLDSLOG_METRICS_PORT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), HldsLogError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        self.parser.validate()?;

        if self.collector.idle_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "collector.idle_timeout_secs".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.collector.max_datagram_size == 0
            || self.collector.max_datagram_size > MAX_DATAGRAM_SIZE
        {
            return Err(ConfigError::InvalidValue {
                field: "collector.max_datagram_size".to_owned(),
                reason: format!("must be 1-{MAX_DATAGRAM_SIZE}"),
            }
            .into());
        }

        if self.metrics.enabled && self.metrics.endpoint != "/metrics" {
            return Err(ConfigError::InvalidValue {
                field: "metrics.endpoint".to_owned(),
                reason: "only '/metrics' is supported".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// UDP 데이터그램 최대 크기
pub const MAX_DATAGRAM_SIZE: usize = 65535;

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 라인 파서/디스패처 설정
///
/// 프로세스 시작 시 한 번 만들어지고 이후에는 읽기 전용입니다.
/// `host`/`port`는 코어 로직에서 쓰지 않고 전송 계층과 알림 문구에 전달됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// 수신 바인드 호스트
    pub host: String,
    /// 수신 포트
    pub port: u16,
    /// triggered 이벤트 번역 로캘 (en, fr 등)
    pub locale: String,
    /// 추가 번역 파일 디렉토리 (`<locale>.yml`), 비어 있으면 내장 테이블만 사용
    pub locale_dir: String,
    /// `end_map` 표시 여부
    pub display_end_map: bool,
    /// `end_round` 표시 여부
    pub display_end_round: bool,
    /// `kill`, `suicide` 표시 여부
    pub display_kills: bool,
    /// `event` (triggered 액션) 표시 여부
    pub display_actions: bool,
    /// `loading_map` 표시 여부
    pub display_changelevel: bool,
    /// `chat` 표시 여부
    pub display_chat: bool,
    /// `team_chat` 표시 여부
    pub display_team_chat: bool,
    /// `connect` 표시 여부
    pub display_connect: bool,
    /// `disconnect` 표시 여부
    pub display_disconnect: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 27115,
            locale: "en".to_owned(),
            locale_dir: String::new(),
            display_end_map: true,
            display_end_round: true,
            display_kills: true,
            display_actions: true,
            display_changelevel: true,
            display_chat: true,
            display_team_chat: true,
            display_connect: true,
            display_disconnect: true,
        }
    }
}

impl ParserConfig {
    /// 이벤트 종류를 관장하는 표시 스위치 값을 반환합니다.
    pub fn display_enabled(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::EndMap => self.display_end_map,
            EventKind::EndRound => self.display_end_round,
            EventKind::Kill | EventKind::Suicide => self.display_kills,
            EventKind::Event => self.display_actions,
            EventKind::LoadingMap => self.display_changelevel,
            EventKind::Chat => self.display_chat,
            EventKind::TeamChat => self.display_team_chat,
            EventKind::Connect => self.display_connect,
            EventKind::Disconnect => self.display_disconnect,
        }
    }

    /// 알림 문구에 쓰이는 `host:port` 라벨
    pub fn source_label(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 파서 섹션의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "parser.host".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.locale.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "parser.locale".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        Ok(())
    }
}

/// UDP 수집기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// 이 시간(초) 동안 데이터가 없으면 "disconnected?" 알림을 발생시킵니다.
    pub idle_timeout_secs: u64,
    /// 수신 데이터그램 최대 크기 (바이트)
    pub max_datagram_size: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 60,
            max_datagram_size: MAX_DATAGRAM_SIZE,
        }
    }
}

/// Prometheus 메트릭 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 리스너 주소
    pub listen_addr: String,
    /// 리스너 포트
    pub port: u16,
    /// 스크레이프 경로 (현재 `/metrics`만 지원)
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9115,
            endpoint: "/metrics".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_parser_config_matches_documented_defaults() {
        let config = ParserConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 27115);
        assert_eq!(config.locale, "en");
        for kind in EventKind::ALL {
            assert!(config.display_enabled(kind), "{kind} should default to enabled");
        }
    }

    #[test]
    fn default_config_passes_validation() {
        HldsLogConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = HldsLogConfig::parse("").unwrap();
        assert_eq!(config.parser, ParserConfig::default());
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.collector.idle_timeout_secs, 60);
    }

    #[test]
    fn partial_toml_merges_with_defaults() {
        let toml = r#"
[parser]
host = "127.0.0.1"
port = 12345
locale = "fr"
display_kills = false
"#;
        let config = HldsLogConfig::parse(toml).unwrap();
        assert_eq!(config.parser.host, "127.0.0.1");
        assert_eq!(config.parser.port, 12345);
        assert_eq!(config.parser.locale, "fr");
        assert!(!config.parser.display_kills);
        // 생략된 스위치는 기본값 유지
        assert!(config.parser.display_chat);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let toml = r#"
[parser]
port = 27016
display_bananas = true

[unknown_section]
foo = "bar"
"#;
        let config = HldsLogConfig::parse(toml).unwrap();
        assert_eq!(config.parser.port, 27016);
    }

    #[test]
    fn kills_switch_gates_kill_and_suicide() {
        let config = ParserConfig {
            display_kills: false,
            ..Default::default()
        };
        assert!(!config.display_enabled(EventKind::Kill));
        assert!(!config.display_enabled(EventKind::Suicide));
        assert!(config.display_enabled(EventKind::Event));
    }

    #[test]
    fn switch_mapping_is_one_to_one_for_other_kinds() {
        let config = ParserConfig {
            display_actions: false,
            display_changelevel: false,
            ..Default::default()
        };
        assert!(!config.display_enabled(EventKind::Event));
        assert!(!config.display_enabled(EventKind::LoadingMap));
        assert!(config.display_enabled(EventKind::EndMap));
        assert!(config.display_enabled(EventKind::Disconnect));
    }

    #[test]
    fn source_label_joins_host_and_port() {
        assert_eq!(ParserConfig::default().source_label(), "0.0.0.0:27115");
    }

    #[test]
    fn invalid_toml_returns_parse_error() {
        let err = HldsLogConfig::parse("invalid = [[[toml").unwrap_err();
        assert!(matches!(
            err,
            HldsLogError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = HldsLogConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_empty_locale() {
        let mut config = HldsLogConfig::default();
        config.parser.locale = "  ".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("parser.locale"));
    }

    #[test]
    fn validate_rejects_oversized_datagram() {
        let mut config = HldsLogConfig::default();
        config.collector.max_datagram_size = 70_000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_datagram_size"));
    }

    #[test]
    fn validate_rejects_zero_idle_timeout() {
        let mut config = HldsLogConfig::default();
        config.collector.idle_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_ignores_endpoint_when_metrics_disabled() {
        let mut config = HldsLogConfig::default();
        config.metrics.endpoint = "/stats".to_owned();
        config.validate().unwrap();
        config.metrics.enabled = true;
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn env_override_parser_fields() {
        // SAFETY: #[serial]로 환경변수를 조작하는 테스트를 직렬화합니다.
        unsafe {
            std::env::set_var("HLDSLOG_PARSER_PORT", "27016");
            std::env::set_var("HLDSLOG_PARSER_DISPLAY_CHAT", "false");
        }
        let mut config = HldsLogConfig::default();
        config.apply_env_overrides();
        unsafe {
            std::env::remove_var("HLDSLOG_PARSER_PORT");
            std::env::remove_var("HLDSLOG_PARSER_DISPLAY_CHAT");
        }
        assert_eq!(config.parser.port, 27016);
        assert!(!config.parser.display_chat);
    }

    #[test]
    #[serial]
    fn env_override_invalid_value_keeps_original() {
        // SAFETY: #[serial]로 환경변수를 조작하는 테스트를 직렬화합니다.
        unsafe { std::env::set_var("HLDSLOG_PARSER_PORT", "not-a-port") };
        let mut config = HldsLogConfig::default();
        config.apply_env_overrides();
        unsafe { std::env::remove_var("HLDSLOG_PARSER_PORT") };
        assert_eq!(config.parser.port, 27115);
    }

    #[test]
    fn config_serialize_roundtrip() {
        let mut config = HldsLogConfig::default();
        config.parser.display_team_chat = false;
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = HldsLogConfig::parse(&toml_str).unwrap();
        assert_eq!(parsed.parser, config.parser);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let err = HldsLogConfig::from_file("/nonexistent/path/hldslog.toml")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HldsLogError::Config(ConfigError::FileNotFound { .. })
        ));
    }
}
