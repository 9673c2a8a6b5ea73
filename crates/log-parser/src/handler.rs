//! 이벤트 디스패처 -- 라인 분류, 표시 스위치 확인, 디스플레이어 호출
//!
//! [`LogHandler`]는 전송 계층이 재조립한 라인 하나마다 [`LogHandler::process_line`]으로 호출됩니다.
//! 인식되지 않은 라인과 스위치로 억제된 이벤트는 모두 `None`을 반환하며
//! 호출자 입장에서는 구분되지 않습니다. 두 경우 모두 에러가 아닙니다.
//!
//! # 사용 예시
//! ```ignore
//! let handler = LogHandler::builder()
//!     .config(parser_config)
//!     .displayer(ConsoleDisplayer::new(true))
//!     .load_translations()
//!     .await?
//!     .build()?;
//!
//! if let Some(rendered) = handler.process_line(line) {
//!     // ...
//! }
//! ```

use hldslog_core::config::ParserConfig;
use hldslog_core::display::{Displayer, SourceNotice};
use hldslog_core::metrics as m;

use crate::classifier::{Classification, LineClassifier, LineRule, default_rules};
use crate::config::{locale_dir, validate};
use crate::error::LogParserError;
use crate::i18n::{TranslationLoader, Translations};

/// 라인 처리기
///
/// 구성 후에는 설정과 디스플레이어가 바뀌지 않습니다.
/// `D`가 `Send + Sync`이므로 `LogHandler`도 `Send + Sync`이며,
/// `process_line`은 잠금 없이 동시에 호출할 수 있습니다.
pub struct LogHandler<D: Displayer> {
    /// 불변 파서 설정
    config: ParserConfig,
    /// 라인 분류기
    classifier: LineClassifier,
    /// 이벤트 소비자
    displayer: D,
    /// 알림 문구용 `host:port`
    source_label: String,
}

impl<D: Displayer> LogHandler<D> {
    /// 새 빌더를 생성합니다.
    pub fn builder() -> LogHandlerBuilder<D> {
        LogHandlerBuilder::new()
    }

    /// 라인 하나를 처리합니다.
    ///
    /// 1. 분류 실패 시 `None`
    /// 2. 이벤트 종류의 표시 스위치가 꺼져 있으면 `None`
    /// 3. 그 외에는 디스플레이어의 결과를 그대로 반환
    pub fn process_line(&self, line: &str) -> Option<D::Output> {
        metrics::counter!(m::LINES_RECEIVED_TOTAL).increment(1);

        let event = match self.classifier.classify(line) {
            Classification::Matched(event) => event,
            Classification::Unmatched => {
                metrics::counter!(m::LINES_UNRECOGNIZED_TOTAL).increment(1);
                tracing::debug!(line, "unrecognized log line");
                return None;
            }
        };

        let kind = event.kind;
        if !self.config.display_enabled(kind) {
            metrics::counter!(m::EVENTS_SUPPRESSED_TOTAL, m::LABEL_KIND => kind.as_str())
                .increment(1);
            tracing::debug!(kind = %kind, "event suppressed by display switch");
            return None;
        }

        metrics::counter!(m::EVENTS_DISPATCHED_TOTAL, m::LABEL_KIND => kind.as_str()).increment(1);
        Some(self.displayer.handle_event(kind, event.fields))
    }

    /// 라인을 분류만 합니다. 표시 스위치와 디스플레이어는 거치지 않습니다.
    pub fn classify(&self, line: &str) -> Classification {
        self.classifier.classify(line)
    }

    /// 생명주기 알림을 디스플레이어에 전달합니다.
    pub fn notify(&self, notice: SourceNotice) {
        tracing::info!(source = %self.source_label, notice = %notice, "source notice");
        self.displayer.notify(&self.source_label, notice);
    }

    /// 파서 설정
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// 등록된 디스플레이어
    pub fn displayer(&self) -> &D {
        &self.displayer
    }

    /// 라인 분류기
    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    /// `host:port` 라벨
    pub fn source_label(&self) -> &str {
        &self.source_label
    }
}

impl<D: Displayer> std::fmt::Debug for LogHandler<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogHandler")
            .field("source", &self.source_label)
            .field("classifier", &self.classifier)
            .finish()
    }
}

/// 라인 처리기 빌더
///
/// 디스플레이어는 필수이며, 없으면 [`LogParserError::MissingDisplayer`]를 반환합니다.
/// 번역 테이블을 지정하지 않으면 설정 로캘의 내장 테이블을 사용합니다.
pub struct LogHandlerBuilder<D: Displayer> {
    config: ParserConfig,
    displayer: Option<D>,
    translations: Option<Translations>,
    rules: Option<Vec<Box<dyn LineRule>>>,
}

impl<D: Displayer> LogHandlerBuilder<D> {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
            displayer: None,
            translations: None,
            rules: None,
        }
    }

    /// 파서 설정을 지정합니다.
    pub fn config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// 이벤트 소비자를 지정합니다.
    pub fn displayer(mut self, displayer: D) -> Self {
        self.displayer = Some(displayer);
        self
    }

    /// 번역 테이블을 직접 지정합니다.
    pub fn translations(mut self, translations: Translations) -> Self {
        self.translations = Some(translations);
        self
    }

    /// 규칙 목록을 직접 지정합니다. 지정하지 않으면 기본 카탈로그를 사용합니다.
    pub fn rules(mut self, rules: Vec<Box<dyn LineRule>>) -> Self {
        self.rules = Some(rules);
        self
    }

    /// 설정의 로캘과 `locale_dir`로 번역 테이블을 로드합니다.
    ///
    /// `config()` 이후에 호출해야 설정 값이 반영됩니다.
    pub async fn load_translations(mut self) -> Result<Self, LogParserError> {
        let translations =
            TranslationLoader::load(&self.config.locale, locale_dir(&self.config)).await?;
        self.translations = Some(translations);
        Ok(self)
    }

    /// 설정을 검증하고 `LogHandler`를 생성합니다.
    pub fn build(self) -> Result<LogHandler<D>, LogParserError> {
        validate(&self.config)?;

        let displayer = self.displayer.ok_or(LogParserError::MissingDisplayer)?;

        let translations = match self.translations {
            Some(translations) => translations,
            None => Translations::builtin(&self.config.locale)?,
        };
        if translations.locale() != self.config.locale {
            tracing::warn!(
                configured = %self.config.locale,
                loaded = translations.locale(),
                "translation locale differs from configured locale"
            );
        }

        let rules = match self.rules {
            Some(rules) => rules,
            None => default_rules()?,
        };
        let classifier = LineClassifier::with_rules(rules, translations)?;

        tracing::debug!(
            source = %self.config.source_label(),
            locale = %self.config.locale,
            rules = classifier.rule_names().len(),
            "log handler built"
        );

        let source_label = self.config.source_label();
        Ok(LogHandler {
            config: self.config,
            classifier,
            displayer,
            source_label,
        })
    }
}

impl<D: Displayer> Default for LogHandlerBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use hldslog_core::event::{EventFields, EventKind};

    use super::*;
    use crate::config::ParserConfigBuilder;

    struct Echo;

    impl Displayer for Echo {
        type Output = (EventKind, EventFields);

        fn handle_event(&self, kind: EventKind, fields: EventFields) -> Self::Output {
            (kind, fields)
        }
    }

    #[derive(Default)]
    struct NoticeRecorder {
        notices: Mutex<Vec<String>>,
    }

    impl Displayer for NoticeRecorder {
        type Output = ();

        fn handle_event(&self, _kind: EventKind, _fields: EventFields) -> Self::Output {}

        fn notify(&self, source: &str, notice: SourceNotice) {
            if let Ok(mut notices) = self.notices.lock() {
                notices.push(format!("## {source} => {notice}"));
            }
        }
    }

    const KILL: &str = r#""Killer<66><STEAM_ID_LAN><TERRORIST>" killed "Killed<60><STEAM_ID_LAN><CT>" with "ak47""#;

    #[test]
    fn build_without_displayer_fails() {
        let result = LogHandlerBuilder::<Echo>::new().build();
        assert!(matches!(result, Err(LogParserError::MissingDisplayer)));
    }

    #[test]
    fn build_rejects_invalid_config() {
        let config = ParserConfig {
            host: String::new(),
            ..Default::default()
        };
        let result = LogHandler::builder().config(config).displayer(Echo).build();
        assert!(matches!(result, Err(LogParserError::Config { .. })));
    }

    #[test]
    fn matched_line_reaches_displayer() {
        let handler = LogHandler::builder().displayer(Echo).build().unwrap();
        let (kind, fields) = handler.process_line(KILL).unwrap();
        assert_eq!(kind, EventKind::Kill);
        assert_eq!(fields.get("killer_team"), Some("T"));
        assert_eq!(fields.get("killed_team"), Some("CT"));
    }

    #[test]
    fn disabled_switch_suppresses_event() {
        let config = ParserConfigBuilder::new().display_kills(false).build().unwrap();
        let handler = LogHandler::builder()
            .config(config)
            .displayer(Echo)
            .build()
            .unwrap();
        assert!(handler.process_line(KILL).is_none());
        // 분류 자체는 여전히 성공
        assert!(handler.classify(KILL).is_matched());
    }

    #[test]
    fn unrecognized_line_returns_none() {
        let handler = LogHandler::builder().displayer(Echo).build().unwrap();
        assert!(handler.process_line("Server cvar \"mp_timelimit\" = \"20\"").is_none());
    }

    #[test]
    fn explicit_translations_override_locale_table() {
        let translations = Translations::from_yaml_str(
            "en",
            "en:\n  Defused_The_Bomb: \"saved the day\"\n",
            "test",
        )
        .unwrap();
        let handler = LogHandler::builder()
            .displayer(Echo)
            .translations(translations)
            .build()
            .unwrap();
        let (_, fields) = handler
            .process_line(r#""Killer<66><CT>" triggered "Defused_The_Bomb""#)
            .unwrap();
        assert_eq!(fields.get("event_i18n"), Some("saved the day"));
    }

    #[test]
    fn notify_uses_host_port_label() {
        let config = ParserConfigBuilder::new()
            .host("10.0.0.5")
            .port(27015)
            .build()
            .unwrap();
        let handler = LogHandler::builder()
            .config(config)
            .displayer(NoticeRecorder::default())
            .build()
            .unwrap();
        handler.notify(SourceNotice::Connected);
        handler.notify(SourceNotice::Stopped);

        let notices = handler.displayer().notices.lock().unwrap();
        assert_eq!(
            *notices,
            vec![
                "## 10.0.0.5:27015 => HLDS connected and sending data".to_owned(),
                "## 10.0.0.5:27015 => HLDS Log Parser stopped.".to_owned(),
            ]
        );
    }

    #[tokio::test]
    async fn load_translations_uses_configured_locale() {
        let config = ParserConfigBuilder::new().locale("fr").build().unwrap();
        let handler = LogHandler::builder()
            .config(config)
            .displayer(Echo)
            .load_translations()
            .await
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(handler.classifier().translations().locale(), "fr");
    }

    #[test]
    fn handler_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LogHandler<Echo>>();
    }
}
