//! 번역 파일 로더 -- 디스크의 `<locale>.yml` 파일을 내장 테이블에 덮어씁니다.

use std::path::Path;

use crate::error::LogParserError;

use super::Translations;

/// 로캘 파일 최대 크기
const MAX_LOCALE_FILE_SIZE: u64 = 1024 * 1024; // 1MB

/// 번역 파일 로더
pub struct TranslationLoader;

impl TranslationLoader {
    /// 내장 테이블을 로드하고, `dir`이 주어지면 `<dir>/<locale>.yml`로 덮어씁니다.
    ///
    /// 디렉토리에 해당 로캘 파일이 없으면 내장 테이블만 사용합니다.
    ///
    /// # Errors
    /// - 로캘 파일 존재 여부를 확인할 수 없는 경우 (권한, 디렉토리가 아닌 경로 등)
    /// - 로캘 파일이 존재하지만 읽거나 파싱할 수 없는 경우
    pub async fn load(locale: &str, dir: Option<&Path>) -> Result<Translations, LogParserError> {
        let mut translations = Translations::builtin(locale)?;

        let Some(dir) = dir else {
            return Ok(translations);
        };

        let path = dir.join(format!("{locale}.yml"));
        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| LogParserError::Locale {
                path: path.display().to_string(),
                reason: format!("failed to check locale file: {e}"),
            })?;
        if !exists {
            tracing::debug!(
                path = %path.display(),
                "no locale override file, using builtin translations"
            );
            return Ok(translations);
        }

        let overrides = Self::load_file(&path, locale).await?;
        tracing::info!(
            path = %path.display(),
            locale,
            count = overrides.len(),
            "loaded locale overrides"
        );
        translations.merge(overrides);
        Ok(translations)
    }

    /// 단일 YAML 파일에서 `locale` 섹션을 로드합니다.
    pub async fn load_file(
        path: impl AsRef<Path>,
        locale: &str,
    ) -> Result<Translations, LogParserError> {
        let path = path.as_ref();

        // 파일 크기 검증
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| LogParserError::Locale {
                path: path.display().to_string(),
                reason: format!("failed to read file metadata: {e}"),
            })?;

        if metadata.len() > MAX_LOCALE_FILE_SIZE {
            return Err(LogParserError::Locale {
                path: path.display().to_string(),
                reason: format!(
                    "file too large: {} bytes (max: {MAX_LOCALE_FILE_SIZE})",
                    metadata.len()
                ),
            });
        }

        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| LogParserError::Locale {
                    path: path.display().to_string(),
                    reason: format!("failed to read file: {e}"),
                })?;

        Translations::from_yaml_str(locale, &content, &path.display().to_string())
    }
}
