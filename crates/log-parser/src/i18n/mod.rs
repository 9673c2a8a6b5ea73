//! triggered 이벤트 번역 테이블
//!
//! 서버가 내보내는 내부 이벤트 코드(`Defused_The_Bomb`)를 로캘별 문구
//! (`defused the bomb`)로 바꿉니다. 테이블에 없는 코드는 원본 그대로 돌려주므로
//! 게임 콘텐츠가 새 코드를 추가해도 조회는 실패하지 않습니다.
//!
//! # 로캘 파일 형식
//! ```yaml
//! en:
//!   Defused_The_Bomb: "defused the bomb"
//!   Planted_The_Bomb: "planted the bomb"
//! ```
//!
//! 내장 테이블(`en`, `fr`)은 바이너리에 포함되며, [`TranslationLoader`]로
//! 디스크의 `<locale>.yml` 파일을 읽어 덮어쓸 수 있습니다.

pub mod loader;

pub use loader::TranslationLoader;

use std::collections::HashMap;

use crate::error::LogParserError;

/// 내장 로캘 문서 (로캘 이름, YAML 원문)
const BUILTIN_LOCALES: &[(&str, &str)] = &[
    ("en", include_str!("../../locales/en.yml")),
    ("fr", include_str!("../../locales/fr.yml")),
];

/// 단일 로캘의 코드 → 문구 테이블
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translations {
    /// 활성 로캘
    locale: String,
    /// 이벤트 코드 → 문구
    phrases: HashMap<String, String>,
}

impl Translations {
    /// 빈 테이블을 생성합니다. 모든 조회는 원본 코드로 대체됩니다.
    pub fn empty(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            phrases: HashMap::new(),
        }
    }

    /// 내장 테이블을 로드합니다.
    ///
    /// 내장되지 않은 로캘은 빈 테이블이 됩니다.
    pub fn builtin(locale: &str) -> Result<Self, LogParserError> {
        match BUILTIN_LOCALES.iter().find(|(name, _)| *name == locale) {
            Some((_, document)) => {
                Self::from_yaml_str(locale, document, &format!("builtin:{locale}"))
            }
            None => {
                tracing::debug!(locale, "no builtin translations for locale");
                Ok(Self::empty(locale))
            }
        }
    }

    /// 내장 로캘 이름 목록
    pub fn builtin_locales() -> impl Iterator<Item = &'static str> {
        BUILTIN_LOCALES.iter().map(|(name, _)| *name)
    }

    /// YAML 문서에서 `locale` 섹션을 읽어 테이블을 생성합니다.
    ///
    /// 문서에 해당 섹션이 없으면 빈 테이블을 반환합니다.
    /// `origin`은 에러 메시지에 쓰이는 출처(파일 경로 등)입니다.
    pub fn from_yaml_str(locale: &str, yaml: &str, origin: &str) -> Result<Self, LogParserError> {
        let mut document: HashMap<String, HashMap<String, String>> = serde_yaml::from_str(yaml)
            .map_err(|e| LogParserError::Locale {
                path: origin.to_owned(),
                reason: e.to_string(),
            })?;

        let phrases = document.remove(locale).unwrap_or_default();
        Ok(Self {
            locale: locale.to_owned(),
            phrases,
        })
    }

    /// 다른 테이블의 항목으로 덮어씁니다.
    pub fn merge(&mut self, other: Translations) {
        self.phrases.extend(other.phrases);
    }

    /// 활성 로캘
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// 코드의 문구를 조회합니다. 없으면 `None`.
    pub fn lookup(&self, code: &str) -> Option<&str> {
        self.phrases.get(code).map(String::as_str)
    }

    /// 코드를 번역합니다. 없으면 원본 코드를 그대로 반환합니다.
    pub fn translate<'a>(&'a self, code: &'a str) -> &'a str {
        self.lookup(code).unwrap_or(code)
    }

    /// 항목 수
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// 테이블이 비었는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}
