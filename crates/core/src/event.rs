//! 이벤트 어휘 -- 분류된 로그 라인의 기본 단위
//!
//! [`EventKind`]는 인식 가능한 서버 이벤트의 닫힌 집합이며,
//! 각 종류는 고정된 필드 집합([`EventKind::field_names`])을 가집니다.
//! [`GameEvent`]는 종류와 [`EventFields`]를 묶은 분류 결과입니다.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// 인식 가능한 이벤트 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// 맵 종료 (팀 점수 보고)
    EndMap,
    /// 라운드 종료
    EndRound,
    /// 킬
    Kill,
    /// 자살
    Suicide,
    /// 일반 triggered 액션 (폭탄 해체 등)
    Event,
    /// 맵 로딩 (changelevel)
    LoadingMap,
    /// 전체 채팅
    Chat,
    /// 팀 채팅
    TeamChat,
    /// 플레이어 접속
    Connect,
    /// 플레이어 접속 해제
    Disconnect,
}

impl EventKind {
    /// 모든 이벤트 종류 (분류 우선순위 순서)
    pub const ALL: [EventKind; 10] = [
        EventKind::EndMap,
        EventKind::EndRound,
        EventKind::Kill,
        EventKind::Suicide,
        EventKind::Event,
        EventKind::LoadingMap,
        EventKind::Chat,
        EventKind::TeamChat,
        EventKind::Connect,
        EventKind::Disconnect,
    ];

    /// 외부 표현 이름 (`"end_map"`, `"team_chat"` 등)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EndMap => "end_map",
            Self::EndRound => "end_round",
            Self::Kill => "kill",
            Self::Suicide => "suicide",
            Self::Event => "event",
            Self::LoadingMap => "loading_map",
            Self::Chat => "chat",
            Self::TeamChat => "team_chat",
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
        }
    }

    /// 이 종류의 이벤트가 가질 수 있는 필드 이름 (출력 순서)
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            Self::EndMap => &["winner", "score"],
            Self::EndRound => &["score_ct", "score_t"],
            Self::Kill => &["killer_team", "killer", "killed_team", "killed", "weapon"],
            Self::Suicide => &["killed"],
            Self::Event => &["person_team", "person", "event_item", "event_i18n"],
            Self::LoadingMap => &["map"],
            Self::Chat | Self::TeamChat => &["player", "player_team", "chat"],
            Self::Connect => &["player", "ip", "port"],
            Self::Disconnect => &["player", "player_team"],
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 이벤트 필드 -- 삽입 순서를 유지하는 이름/값 목록
///
/// 필드 수가 최대 5개이므로 해시맵 대신 벡터로 보관합니다.
/// 직렬화 시에는 JSON 객체(map)로 표현됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFields {
    entries: Vec<(&'static str, String)>,
}

impl EventFields {
    /// 빈 필드 목록을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 필드를 추가한 자신을 반환합니다. 같은 이름이 있으면 값을 교체합니다.
    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// 필드를 추가합니다. 같은 이름이 있으면 값을 교체합니다.
    pub fn insert(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// 필드 값을 조회합니다.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// 필드 이름 목록 (삽입 순서)
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(k, _)| *k).collect()
    }

    /// (이름, 값) 쌍을 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// 필드 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 필드가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for EventFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// 분류된 게임 이벤트
///
/// 직렬화 형식은 `{"type": "<kind>", "params": {...}}` 입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameEvent {
    /// 이벤트 종류
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// 종류별 고정 필드
    #[serde(rename = "params")]
    pub fields: EventFields,
}

impl GameEvent {
    /// 새 이벤트를 생성합니다.
    pub fn new(kind: EventKind, fields: EventFields) -> Self {
        Self { kind, fields }
    }

    /// 필드 집합이 종류별 허용 집합 안에 있는지 확인합니다.
    pub fn has_valid_fields(&self) -> bool {
        let allowed = self.kind.field_names();
        self.fields.iter().all(|(name, _)| allowed.contains(&name))
    }
}
