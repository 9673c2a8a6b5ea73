//! 에러 타입 -- 도메인별 에러 정의
//!
//! 런타임 입력(로그 라인, 이벤트 코드, 팀 코드)은 에러를 만들지 않습니다.
//! 여기 정의된 에러는 설정 로딩, 구성 단계, 소켓 바인드처럼
//! 프로세스 시작 시점의 실패만 표현합니다.

/// hldslog 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum HldsLogError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파이프라인 구성/전송 에러
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파이프라인 구성/전송 에러
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 핸들러 또는 수집기 초기화 실패
    #[error("pipeline init failed: {0}")]
    InitFailed(String),

    /// 전송 계층(UDP 소켓 등) 실패
    #[error("transport failed: {0}")]
    Transport(String),
}
