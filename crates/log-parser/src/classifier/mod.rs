//! 라인 분류기 -- HLDS 로그 라인을 타입이 있는 [`GameEvent`]로 변환
//!
//! [`LineClassifier`]는 등록된 [`LineRule`]을 우선순위 순서대로 시도하여
//! 처음 매칭된 규칙의 필드로 이벤트를 만듭니다. 어떤 규칙에도 맞지 않는 라인은
//! [`Classification::Unmatched`]이며 에러가 아닙니다.
//!
//! # 처리 순서
//! 1. 앞뒤 공백과 NUL 제거
//! 2. `L MM/DD/YYYY - HH:MM:SS: ` 타임스탬프 머리말(및 그 앞부분) 제거
//! 3. 규칙 순회, 첫 매칭 채택
//! 4. triggered 이벤트는 `event_i18n` 번역 필드 추가
//!
//! # 사용 예시
//! ```ignore
//! let classifier = LineClassifier::new(Translations::builtin("en")?)?;
//! match classifier.classify(r#"L 05/10/2000 - 12:34:56: Loading map "de_dust2""#) {
//!     Classification::Matched(event) => println!("{}", event.kind),
//!     Classification::Unmatched => {}
//! }
//! ```

pub mod rules;

pub use rules::{RegexRule, default_rules};

use regex::Regex;

use hldslog_core::event::{EventFields, EventKind, GameEvent};

use crate::error::LogParserError;
use crate::i18n::Translations;

/// HLDS 타임스탬프 머리말
///
/// 라인 맨 앞에서만 인식합니다. 앞에 올 수 있는 것은 `# ` 또는 UDP 헤더
/// (`0xFF` 바이트가 바뀐 `U+FFFD` 문자들과 `log `) 뿐입니다.
const PREAMBLE_PATTERN: &str =
    r"^(?:# |\x{FFFD}*(?:log )?)L \d{2}/\d{2}/\d{4} - \d{2}:\d{2}:\d{2}: ";

/// 라인 형태 규칙 trait
///
/// 새로운 라인 형태를 인식하려면 이 trait을 구현하여
/// [`LineClassifier::with_rules`]에 등록합니다.
pub trait LineRule: Send + Sync {
    /// 규칙 이름
    fn name(&self) -> &str;

    /// 매칭 시 생성되는 이벤트 종류
    fn kind(&self) -> EventKind;

    /// 머리말이 제거된 라인 본문에 대해 매칭을 시도합니다.
    fn try_match(&self, body: &str) -> Option<EventFields>;
}

/// 분류 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// 규칙에 매칭됨
    Matched(GameEvent),
    /// 인식할 수 없는 라인
    Unmatched,
}

impl Classification {
    /// 매칭 여부
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// 매칭된 이벤트를 꺼냅니다.
    pub fn into_event(self) -> Option<GameEvent> {
        match self {
            Self::Matched(event) => Some(event),
            Self::Unmatched => None,
        }
    }
}

/// 라인 분류기
///
/// 상태를 갖지 않으므로 `&self`로 여러 스레드에서 동시에 호출할 수 있습니다.
pub struct LineClassifier {
    /// 우선순위 순서의 규칙 목록
    rules: Vec<Box<dyn LineRule>>,
    /// triggered 이벤트 번역 테이블
    translations: Translations,
    /// 컴파일된 머리말 패턴
    preamble: Regex,
}

impl LineClassifier {
    /// 기본 규칙 카탈로그로 분류기를 생성합니다.
    pub fn new(translations: Translations) -> Result<Self, LogParserError> {
        Self::with_rules(default_rules()?, translations)
    }

    /// 지정한 규칙 목록으로 분류기를 생성합니다. 목록 순서가 우선순위입니다.
    pub fn with_rules(
        rules: Vec<Box<dyn LineRule>>,
        translations: Translations,
    ) -> Result<Self, LogParserError> {
        Ok(Self {
            rules,
            translations,
            preamble: Regex::new(PREAMBLE_PATTERN)?,
        })
    }

    /// 라인 하나를 분류합니다.
    pub fn classify(&self, line: &str) -> Classification {
        let body = self.strip_preamble(line);
        if body.is_empty() {
            return Classification::Unmatched;
        }

        for rule in &self.rules {
            if let Some(mut fields) = rule.try_match(body) {
                let kind = rule.kind();
                if kind == EventKind::Event {
                    self.add_translation(&mut fields);
                }
                tracing::trace!(rule = rule.name(), kind = %kind, "line matched");
                return Classification::Matched(GameEvent::new(kind, fields));
            }
        }

        Classification::Unmatched
    }

    /// 타임스탬프 머리말과 앞뒤 공백/NUL을 제거한 본문을 반환합니다.
    ///
    /// 머리말이 없는 라인은 공백만 제거됩니다.
    pub fn strip_preamble<'a>(&self, line: &'a str) -> &'a str {
        let line = line.trim_matches(|c: char| c.is_whitespace() || c == '\0');
        match self.preamble.find(line) {
            Some(m) => &line[m.end()..],
            None => line,
        }
    }

    /// 등록된 규칙 이름 목록 (우선순위 순서)
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// 활성 번역 테이블
    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    fn add_translation(&self, fields: &mut EventFields) {
        let phrase = fields
            .get("event_item")
            .map(|code| self.translations.translate(code).to_owned());
        if let Some(phrase) = phrase {
            fields.insert("event_i18n", phrase);
        }
    }
}

impl std::fmt::Debug for LineClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineClassifier")
            .field("rules", &self.rule_names())
            .field("locale", &self.translations.locale())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn english() -> LineClassifier {
        LineClassifier::new(Translations::builtin("en").unwrap()).unwrap()
    }

    fn matched(classifier: &LineClassifier, line: &str) -> GameEvent {
        match classifier.classify(line) {
            Classification::Matched(event) => event,
            Classification::Unmatched => panic!("expected a match for: {line}"),
        }
    }

    #[test]
    fn strips_timestamp_preamble() {
        let c = english();
        assert_eq!(
            c.strip_preamble("# L 05/10/2000 - 12:34:56: Loading map \"de_dust\""),
            "Loading map \"de_dust\""
        );
        assert_eq!(
            c.strip_preamble("\u{FFFD}\u{FFFD}log L 05/10/2000 - 12:34:56: body\0\n"),
            "body"
        );
    }

    #[test]
    fn timestamp_inside_chat_is_not_a_preamble() {
        let c = english();
        let line = r#""P<1><STEAM_ID_LAN><CT>" say "see L 05/10/2000 - 12:34:56: Loading map "x"""#;
        assert_eq!(c.strip_preamble(line), line);

        let event = matched(&c, &format!("L 05/10/2000 - 12:34:56: {line}"));
        assert_eq!(event.kind, EventKind::Chat);
        assert_eq!(
            event.fields.get("chat"),
            Some(r#"see L 05/10/2000 - 12:34:56: Loading map "x""#)
        );
    }

    #[test]
    fn text_before_timestamp_is_not_a_preamble() {
        let c = english();
        let line = "junk L 05/10/2000 - 12:34:56: Loading map \"x\"";
        assert_eq!(c.strip_preamble(line), line);
        assert!(!c.classify(line).is_matched());
    }

    #[test]
    fn line_without_preamble_is_matched_as_is() {
        let c = english();
        assert_eq!(c.strip_preamble("  Loading map \"x\"  "), "Loading map \"x\"");
        assert_eq!(matched(&c, "Loading map \"x\"").kind, EventKind::LoadingMap);
    }

    #[test]
    fn fake_line_is_unmatched() {
        let c = english();
        assert_eq!(
            c.classify("# L 05/10/2000 - 12:34:56: I am a fake line of log"),
            Classification::Unmatched
        );
    }

    #[test]
    fn triggered_event_gets_translation() {
        let c = english();
        let event = matched(&c, r#""Killer<66><CT>" triggered "Defused_The_Bomb""#);
        assert_eq!(event.kind, EventKind::Event);
        assert_eq!(
            event.fields.names(),
            vec!["person_team", "person", "event_item", "event_i18n"]
        );
        assert_eq!(event.fields.get("event_i18n"), Some("defused the bomb"));
    }

    #[test]
    fn french_translation_is_used_for_french_locale() {
        let c = LineClassifier::new(Translations::builtin("fr").unwrap()).unwrap();
        let event = matched(&c, r#""Killer<66><CT>" triggered "Defused_The_Bomb""#);
        assert_eq!(event.fields.get("event_i18n"), Some("a désamorcé la bombe"));
    }

    #[test]
    fn empty_rule_list_matches_nothing() {
        let c = LineClassifier::with_rules(Vec::new(), Translations::empty("en")).unwrap();
        assert!(!c.classify(r#"Loading map "de_dust2""#).is_matched());
    }

    #[test]
    fn custom_rule_is_consulted_in_order() {
        struct Always;
        impl LineRule for Always {
            fn name(&self) -> &str {
                "always"
            }
            fn kind(&self) -> EventKind {
                EventKind::LoadingMap
            }
            fn try_match(&self, _body: &str) -> Option<EventFields> {
                Some(EventFields::new().with("map", "forced"))
            }
        }

        let mut rules = default_rules().unwrap();
        rules.insert(0, Box::new(Always));
        let c = LineClassifier::with_rules(rules, Translations::empty("en")).unwrap();
        assert_eq!(c.rule_names()[0], "always");
        let event = matched(&c, r#""A<1><STEAM_ID_LAN><CT>" disconnected"#);
        assert_eq!(event.fields.get("map"), Some("forced"));
    }

    #[test]
    fn blank_line_is_unmatched() {
        let c = english();
        assert!(c.classify("").into_event().is_none());
        assert!(c.classify("  \0 ").into_event().is_none());
    }

    proptest! {
        #[test]
        fn classify_never_panics(line in "\\PC{0,200}") {
            let c = english();
            let _ = c.classify(&line);
        }

        #[test]
        fn matched_events_only_carry_their_own_fields(
            name in "[A-Za-z][A-Za-z0-9 |]{0,15}",
            team in "(TERRORIST|CT|T|SPECTATOR)",
            weapon in "[a-z0-9_]{1,12}",
        ) {
            let c = english();
            let line = format!(
                r#"L 01/01/2020 - 00:00:00: "{name}<1><STEAM_0:0:1><{team}>" killed "{name}<2><BOT><CT>" with "{weapon}""#
            );
            let event = c.classify(&line).into_event().unwrap();
            prop_assert!(event.has_valid_fields());
            let killer_team = event.fields.get("killer_team").unwrap_or_default();
            prop_assert!(killer_team != "TERRORIST");
            prop_assert_eq!(event.fields.get("weapon"), Some(weapon.as_str()));
        }

        #[test]
        fn unknown_trigger_codes_fall_back_to_raw(code in "Zz[A-Za-z_]{0,16}") {
            let c = english();
            let line = format!(r#""P<1><CT>" triggered "{code}""#);
            let event = c.classify(&line).into_event().unwrap();
            prop_assert_eq!(event.fields.get("event_i18n"), Some(code.as_str()));
        }
    }
}
