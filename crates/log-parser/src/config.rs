//! 파서 설정 빌더
//!
//! [`ParserConfigBuilder`]는 core의 [`ParserConfig`]를 코드에서 구성할 때 사용합니다.
//! TOML 파일에서 읽는 경우에는 [`HldsLogConfig`](hldslog_core::config::HldsLogConfig)를 사용하세요.
//!
//! # 사용 예시
//! ```ignore
//! use hldslog_parser::config::ParserConfigBuilder;
//!
//! let config = ParserConfigBuilder::new()
//!     .port(27016)
//!     .locale("fr")
//!     .display_chat(false)
//!     .build()?;
//! ```

use std::path::Path;

use hldslog_core::config::ParserConfig;
use hldslog_core::error::ConfigError;
use hldslog_core::event::EventKind;

use crate::error::LogParserError;

/// 번역 파일 디렉토리 (비어 있으면 `None`)
pub fn locale_dir(config: &ParserConfig) -> Option<&Path> {
    let dir = config.locale_dir.trim();
    if dir.is_empty() {
        None
    } else {
        Some(Path::new(dir))
    }
}

/// 파서 설정을 검증하고 에러를 파서 도메인 에러로 변환합니다.
pub fn validate(config: &ParserConfig) -> Result<(), LogParserError> {
    config.validate().map_err(|e| match e {
        ConfigError::InvalidValue { field, reason } => LogParserError::Config { field, reason },
        other => LogParserError::Config {
            field: "parser".to_owned(),
            reason: other.to_string(),
        },
    })
}

/// 파서 설정 빌더
///
/// 설정 필드가 많으므로 빌더 패턴을 사용합니다. 지정하지 않은 필드는 기본값입니다.
#[derive(Debug, Default)]
pub struct ParserConfigBuilder {
    config: ParserConfig,
}

impl ParserConfigBuilder {
    /// 기본값으로 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 기존 설정에서 시작하는 빌더를 생성합니다.
    pub fn from_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// 바인드 호스트를 설정합니다.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// 수신 포트를 설정합니다.
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// 번역 로캘을 설정합니다.
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.config.locale = locale.into();
        self
    }

    /// 추가 번역 파일 디렉토리를 설정합니다.
    pub fn locale_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.locale_dir = dir.into();
        self
    }

    /// 이벤트 종류를 관장하는 스위치를 설정합니다.
    ///
    /// `Kill`과 `Suicide`는 같은 스위치(`display_kills`)를 공유합니다.
    pub fn display(mut self, kind: EventKind, enabled: bool) -> Self {
        let switch = match kind {
            EventKind::EndMap => &mut self.config.display_end_map,
            EventKind::EndRound => &mut self.config.display_end_round,
            EventKind::Kill | EventKind::Suicide => &mut self.config.display_kills,
            EventKind::Event => &mut self.config.display_actions,
            EventKind::LoadingMap => &mut self.config.display_changelevel,
            EventKind::Chat => &mut self.config.display_chat,
            EventKind::TeamChat => &mut self.config.display_team_chat,
            EventKind::Connect => &mut self.config.display_connect,
            EventKind::Disconnect => &mut self.config.display_disconnect,
        };
        *switch = enabled;
        self
    }

    /// 모든 스위치를 한 번에 설정합니다.
    pub fn display_all(self, enabled: bool) -> Self {
        EventKind::ALL
            .into_iter()
            .fold(self, |builder, kind| builder.display(kind, enabled))
    }

    /// `end_map` 표시 여부
    pub fn display_end_map(self, enabled: bool) -> Self {
        self.display(EventKind::EndMap, enabled)
    }

    /// `end_round` 표시 여부
    pub fn display_end_round(self, enabled: bool) -> Self {
        self.display(EventKind::EndRound, enabled)
    }

    /// `kill`/`suicide` 표시 여부
    pub fn display_kills(self, enabled: bool) -> Self {
        self.display(EventKind::Kill, enabled)
    }

    /// triggered `event` 표시 여부
    pub fn display_actions(self, enabled: bool) -> Self {
        self.display(EventKind::Event, enabled)
    }

    /// `loading_map` 표시 여부
    pub fn display_changelevel(self, enabled: bool) -> Self {
        self.display(EventKind::LoadingMap, enabled)
    }

    /// `chat` 표시 여부
    pub fn display_chat(self, enabled: bool) -> Self {
        self.display(EventKind::Chat, enabled)
    }

    /// `team_chat` 표시 여부
    pub fn display_team_chat(self, enabled: bool) -> Self {
        self.display(EventKind::TeamChat, enabled)
    }

    /// `connect` 표시 여부
    pub fn display_connect(self, enabled: bool) -> Self {
        self.display(EventKind::Connect, enabled)
    }

    /// `disconnect` 표시 여부
    pub fn display_disconnect(self, enabled: bool) -> Self {
        self.display(EventKind::Disconnect, enabled)
    }

    /// 설정을 검증하고 `ParserConfig`를 생성합니다.
    pub fn build(self) -> Result<ParserConfig, LogParserError> {
        validate(&self.config)?;
        Ok(self.config)
    }
}
