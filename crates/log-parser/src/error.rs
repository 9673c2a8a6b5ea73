//! 로그 파서 에러 타입
//!
//! [`LogParserError`]는 파서 크레이트의 구성 단계와 전송 계층에서 발생하는 에러를 표현합니다.
//! 로그 라인 자체는 에러를 만들지 않습니다 (매칭 실패는 정상 결과입니다).
//! `From<LogParserError> for HldsLogError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use hldslog_core::error::{ConfigError, HldsLogError, PipelineError};

/// 로그 파서 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum LogParserError {
    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 디스플레이어 없이 핸들러를 구성하려 함
    #[error("displayer is required to build a log handler")]
    MissingDisplayer,

    /// 번역 파일 로딩 실패
    #[error("locale load error: {path}: {reason}")]
    Locale {
        /// 로캘 파일 경로 (내장 테이블은 `builtin:<locale>`)
        path: String,
        /// 로딩 실패 사유
        reason: String,
    },

    /// 수집기 에러 (소켓 바인드, 파일 I/O 등)
    #[error("collector error: {source_type}: {reason}")]
    Collector {
        /// 수집 소스 유형 (udp, replay)
        source_type: String,
        /// 에러 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<LogParserError> for HldsLogError {
    fn from(err: LogParserError) -> Self {
        match err {
            LogParserError::Config { field, reason } => {
                HldsLogError::Config(ConfigError::InvalidValue { field, reason })
            }
            LogParserError::Collector { .. } => {
                HldsLogError::Pipeline(PipelineError::Transport(err.to_string()))
            }
            LogParserError::Io(e) => HldsLogError::Io(e),
            other => HldsLogError::Pipeline(PipelineError::InitFailed(other.to_string())),
        }
    }
}
