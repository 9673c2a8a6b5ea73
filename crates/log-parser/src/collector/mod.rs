//! 로그 수집 모듈 -- HLDS 로그 라인을 받아 [`LogHandler`](crate::handler::LogHandler)로 전달합니다.
//!
//! # 수집 소스
//! - [`UdpLogCollector`]: `logaddress_add`로 지정된 UDP 포트에서 실시간 수신
//! - [`replay_file`]: 저장된 로그 파일을 한 줄씩 재생
//!
//! # 데이터그램 형식
//! HLDS는 라인마다 `\xFF\xFF\xFF\xFF` 대역 외 헤더와 `log ` 키워드를 붙여 전송합니다.
//! [`split_datagram`]이 헤더를 제거하고 라인 단위로 나눕니다.

pub mod replay;
pub mod udp;

pub use replay::{ReplayStats, replay_file};
pub use udp::{CollectorStats, UdpLogCollector};

/// 대역 외(out-of-band) 패킷 헤더
const OOB_HEADER: &[u8] = b"\xFF\xFF\xFF\xFF";

/// 로그 패킷 키워드
const LOG_KEYWORD: &[u8] = b"log ";

/// 수집기 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectorStatus {
    /// 실행 대기 중
    Idle,
    /// 실행 중
    Running,
    /// 에러로 중단됨
    Error(String),
    /// 정상 종료됨
    Stopped,
}

/// 데이터그램 하나를 로그 라인 목록으로 나눕니다.
///
/// - 선행 `\xFF\xFF\xFF\xFF` 헤더와 `log ` 키워드 제거
/// - UTF-8 손실 디코딩 (잘못된 바이트는 U+FFFD)
/// - `\n` 기준 분할, 각 라인의 `\r`/NUL/공백 제거
/// - 빈 라인 제외
pub fn split_datagram(data: &[u8]) -> Vec<String> {
    let data = data.strip_prefix(OOB_HEADER).unwrap_or(data);
    let data = data.strip_prefix(LOG_KEYWORD).unwrap_or(data);

    String::from_utf8_lossy(data)
        .split('\n')
        .map(|line| line.trim_matches(|c: char| c.is_whitespace() || c == '\0'))
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
