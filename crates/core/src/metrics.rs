//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 파서와 수집기는 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않은 경우(테스트 등) 매크로 호출은 아무 일도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `hldslog_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(hldslog_core::metrics::LINES_RECEIVED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 이벤트 종류 레이블 키 (end_map, kill, chat 등)
pub const LABEL_KIND: &str = "kind";

// ─── 수집/분류 메트릭 ──────────────────────────────────────────────

/// 수신한 UDP 데이터그램 수 (counter)
pub const DATAGRAMS_RECEIVED_TOTAL: &str = "hldslog_datagrams_received_total";

/// 분류기에 전달된 라인 수 (counter)
pub const LINES_RECEIVED_TOTAL: &str = "hldslog_lines_received_total";

/// 어떤 규칙에도 매칭되지 않은 라인 수 (counter)
pub const LINES_UNRECOGNIZED_TOTAL: &str = "hldslog_lines_unrecognized_total";

/// 표시 스위치로 억제된 이벤트 수 (counter, label: kind)
pub const EVENTS_SUPPRESSED_TOTAL: &str = "hldslog_events_suppressed_total";

/// 디스플레이어로 전달된 이벤트 수 (counter, label: kind)
pub const EVENTS_DISPATCHED_TOTAL: &str = "hldslog_events_dispatched_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번 호출합니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        DATAGRAMS_RECEIVED_TOTAL,
        "Total number of UDP datagrams received from the game server"
    );
    describe_counter!(
        LINES_RECEIVED_TOTAL,
        "Total number of log lines handed to the line classifier"
    );
    describe_counter!(
        LINES_UNRECOGNIZED_TOTAL,
        "Total number of log lines that matched no line rule"
    );
    describe_counter!(
        EVENTS_SUPPRESSED_TOTAL,
        "Classified events dropped by a disabled display switch"
    );
    describe_counter!(
        EVENTS_DISPATCHED_TOTAL,
        "Classified events delivered to the displayer"
    );
}
