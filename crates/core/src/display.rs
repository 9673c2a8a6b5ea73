//! 디스플레이어 trait -- 이벤트 소비자 확장 포인트 정의
//!
//! 분류되고 표시가 허용된 이벤트는 [`Displayer::handle_event`]로 전달됩니다.
//! 반환 타입은 구현체가 정하며, 디스패처는 값을 그대로 호출자에게 돌려줍니다.

use std::fmt;

use crate::event::{EventFields, EventKind};

/// 로그 소스(HLDS 프로세스)의 생명주기 알림
///
/// 전송 계층이 라인 처리와 독립적으로 발생시킵니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceNotice {
    /// 수신 시작 또는 침묵 후 데이터 재개
    Connected,
    /// 유휴 타임아웃 동안 데이터가 없음
    Disconnected,
    /// 파서 종료
    Stopped,
}

impl SourceNotice {
    /// 사람이 읽는 알림 문구
    pub fn message(&self) -> &'static str {
        match self {
            Self::Connected => "HLDS connected and sending data",
            Self::Disconnected => "HLDS disconnected? No data is received.",
            Self::Stopped => "HLDS Log Parser stopped.",
        }
    }
}

impl fmt::Display for SourceNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// 이벤트 소비자 trait
///
/// 새 출력 형식(콘솔, JSON, 채널 전송 등)을 지원하려면 이 trait을 구현합니다.
/// 디스패처는 `&self`로 호출하며 호출을 직렬화하지 않으므로,
/// 동시 호출이 필요한 환경에서는 구현체가 스스로 동시성 안전을 보장해야 합니다.
pub trait Displayer: Send + Sync {
    /// `handle_event`의 결과 타입
    type Output;

    /// 표시가 허용된 이벤트를 처리합니다.
    fn handle_event(&self, kind: EventKind, fields: EventFields) -> Self::Output;

    /// 로그 소스 생명주기 알림을 처리합니다.
    ///
    /// `source`는 `host:port` 형식의 수신 주소입니다. 기본 구현은 아무것도 하지 않습니다.
    fn notify(&self, source: &str, notice: SourceNotice) {
        let _ = (source, notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Displayer for Echo {
        type Output = (EventKind, EventFields);

        fn handle_event(&self, kind: EventKind, fields: EventFields) -> Self::Output {
            (kind, fields)
        }
    }

    #[test]
    fn notice_messages() {
        assert_eq!(
            SourceNotice::Connected.to_string(),
            "HLDS connected and sending data"
        );
        assert_eq!(
            SourceNotice::Disconnected.to_string(),
            "HLDS disconnected? No data is received."
        );
        assert_eq!(SourceNotice::Stopped.to_string(), "HLDS Log Parser stopped.");
    }

    #[test]
    fn output_is_chosen_by_implementor() {
        let fields = EventFields::new().with("map", "de_aztec");
        let (kind, echoed) = Echo.handle_event(EventKind::LoadingMap, fields.clone());
        assert_eq!(kind, EventKind::LoadingMap);
        assert_eq!(echoed, fields);
    }

    #[test]
    fn default_notify_is_noop() {
        Echo.notify("0.0.0.0:27115", SourceNotice::Stopped);
    }
}
