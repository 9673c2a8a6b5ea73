//! 라인 형태 규칙 카탈로그
//!
//! 각 규칙은 타임스탬프 머리말이 제거된 라인 본문의 시작에 고정된 정규식입니다.
//! 본문 끝은 고정하지 않으므로 마지막 필수 토큰 뒤의 텍스트는 무시됩니다.
//! [`default_rules`]는 구체적인 형태가 일반적인 형태보다 먼저 오도록 정렬된 목록을 만듭니다.

use regex::{Captures, Regex};

use hldslog_core::event::{EventFields, EventKind};

use crate::error::LogParserError;
use crate::team::short_name;

use super::LineRule;

/// 스팀 식별자 (값은 버림)
const STEAM_ID: &str = r"STEAM_ID_LAN|STEAM_ID_PENDING|BOT|STEAM_\d+:\d+:\d+";

/// 플레이어 태그 `name<id><steam>?<team>` 정규식 조각
///
/// `prefix`는 이름 캡처 그룹 이름이 되고, 팀은 `<prefix>_team` 그룹으로 캡처됩니다.
/// 이름은 최소 매칭이라 `<`, `|` 같은 문자가 들어 있어도 전체가 캡처됩니다.
/// 이름은 따옴표를 넘지 않으므로 채팅 본문 속 태그 모양은 플레이어로 잡히지 않습니다.
fn player_tag(prefix: &str) -> String {
    format!(r#"(?P<{prefix}>[^"]+?)<-?\d+>(?:<(?:{STEAM_ID})>)?<(?P<{prefix}_team>[^>]*)>"#)
}

/// 캡처 그룹 값 (없으면 빈 문자열)
fn cap<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}

/// 캡처 결과에서 필드를 만드는 함수
type Extract = fn(&Captures<'_>) -> EventFields;

/// 정규식 기반 라인 규칙
pub struct RegexRule {
    /// 규칙 이름
    name: &'static str,
    /// 생성하는 이벤트 종류
    kind: EventKind,
    /// 컴파일된 패턴
    pattern: Regex,
    /// 필드 추출기
    extract: Extract,
}

impl RegexRule {
    /// 패턴을 컴파일하여 규칙을 생성합니다.
    pub fn new(
        name: &'static str,
        kind: EventKind,
        pattern: &str,
        extract: Extract,
    ) -> Result<Self, LogParserError> {
        Ok(Self {
            name,
            kind,
            pattern: Regex::new(pattern)?,
            extract,
        })
    }
}

impl LineRule for RegexRule {
    fn name(&self) -> &str {
        self.name
    }

    fn kind(&self) -> EventKind {
        self.kind
    }

    fn try_match(&self, body: &str) -> Option<EventFields> {
        self.pattern
            .captures(body)
            .map(|caps| (self.extract)(&caps))
    }
}

impl std::fmt::Debug for RegexRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegexRule")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// 기본 규칙 목록을 우선순위 순서로 생성합니다.
///
/// # Errors
/// 패턴 컴파일 실패 시 [`LogParserError::Regex`]
pub fn default_rules() -> Result<Vec<Box<dyn LineRule>>, LogParserError> {
    let rules: Vec<Box<dyn LineRule>> = vec![
        Box::new(end_map()?),
        Box::new(end_round()?),
        Box::new(kill()?),
        Box::new(suicide()?),
        Box::new(triggered_event()?),
        Box::new(loading_map()?),
        Box::new(chat()?),
        Box::new(team_chat()?),
        Box::new(connect()?),
        Box::new(disconnect()?),
    ];
    Ok(rules)
}

/// `Team "CT" scored "17" with "0" players`
fn end_map() -> Result<RegexRule, LogParserError> {
    RegexRule::new(
        "end_map",
        EventKind::EndMap,
        r#"^Team "(?P<winner>[^"]*)" scored "(?P<score>[^"]*)" with "[^"]*" players"#,
        |caps| {
            EventFields::new()
                .with("winner", cap(caps, "winner"))
                .with("score", cap(caps, "score"))
        },
    )
}

/// `Team "CT" triggered "CTs_Win" (CT "3") (T "0")`
fn end_round() -> Result<RegexRule, LogParserError> {
    RegexRule::new(
        "end_round",
        EventKind::EndRound,
        r#"^Team "[^"]*" triggered "[^"]*" \(CT "(?P<score_ct>[^"]*)"\) \(T "(?P<score_t>[^"]*)"\)"#,
        |caps| {
            EventFields::new()
                .with("score_ct", cap(caps, "score_ct"))
                .with("score_t", cap(caps, "score_t"))
        },
    )
}

fn kill() -> Result<RegexRule, LogParserError> {
    let pattern = format!(
        r#"^"{}" killed "{}" with "(?P<weapon>[^"]*)""#,
        player_tag("killer"),
        player_tag("killed"),
    );
    RegexRule::new("kill", EventKind::Kill, &pattern, |caps| {
        EventFields::new()
            .with("killer_team", short_name(cap(caps, "killer_team")))
            .with("killer", cap(caps, "killer"))
            .with("killed_team", short_name(cap(caps, "killed_team")))
            .with("killed", cap(caps, "killed"))
            .with("weapon", cap(caps, "weapon"))
    })
}

/// `(world)` 접미사는 수류탄 자살 등에서 생략됩니다.
fn suicide() -> Result<RegexRule, LogParserError> {
    let pattern = format!(
        r#"^"{}" committed suicide with "[^"]*"(?: \(world\))?"#,
        player_tag("killed"),
    );
    RegexRule::new("suicide", EventKind::Suicide, &pattern, |caps| {
        EventFields::new().with("killed", cap(caps, "killed"))
    })
}

/// `event_i18n`은 번역 테이블을 가진 분류기가 채웁니다.
fn triggered_event() -> Result<RegexRule, LogParserError> {
    let pattern = format!(
        r#"^"{}" triggered "(?P<event_item>[^"]*)""#,
        player_tag("person"),
    );
    RegexRule::new("event", EventKind::Event, &pattern, |caps| {
        EventFields::new()
            .with("person_team", short_name(cap(caps, "person_team")))
            .with("person", cap(caps, "person"))
            .with("event_item", cap(caps, "event_item"))
    })
}

fn loading_map() -> Result<RegexRule, LogParserError> {
    RegexRule::new(
        "loading_map",
        EventKind::LoadingMap,
        r#"^Loading map "(?P<map>[^"]*)""#,
        |caps| EventFields::new().with("map", cap(caps, "map")),
    )
}

/// 채팅 본문은 마지막 따옴표까지 탐욕적으로 캡처합니다. ` (dead)` 표시는 무시합니다.
fn chat() -> Result<RegexRule, LogParserError> {
    let pattern = format!(r#"^"{}" say "(?P<chat>.*)""#, player_tag("player"));
    RegexRule::new("chat", EventKind::Chat, &pattern, chat_fields)
}

fn team_chat() -> Result<RegexRule, LogParserError> {
    let pattern = format!(r#"^"{}" say_team "(?P<chat>.*)""#, player_tag("player"));
    RegexRule::new("team_chat", EventKind::TeamChat, &pattern, chat_fields)
}

fn chat_fields(caps: &Captures<'_>) -> EventFields {
    EventFields::new()
        .with("player", cap(caps, "player"))
        .with("player_team", short_name(cap(caps, "player_team")))
        .with("chat", cap(caps, "chat"))
}

/// 접속 시점에는 팀이 없으므로 팀 자리는 `<>`여야 합니다.
fn connect() -> Result<RegexRule, LogParserError> {
    let pattern = format!(
        r#"^"(?P<player>[^"]+?)<-?\d+>(?:<(?:{STEAM_ID})>)?<>" connected, address "(?P<ip>[^":]*):(?P<port>\d+)""#
    );
    RegexRule::new("connect", EventKind::Connect, &pattern, |caps| {
        EventFields::new()
            .with("player", cap(caps, "player"))
            .with("ip", cap(caps, "ip"))
            .with("port", cap(caps, "port"))
    })
}

fn disconnect() -> Result<RegexRule, LogParserError> {
    let pattern = format!(r#"^"{}" disconnected"#, player_tag("player"));
    RegexRule::new("disconnect", EventKind::Disconnect, &pattern, |caps| {
        EventFields::new()
            .with("player", cap(caps, "player"))
            .with("player_team", short_name(cap(caps, "player_team")))
    })
}
