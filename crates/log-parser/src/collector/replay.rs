//! 로그 파일 재생
//!
//! 저장된 HLDS 로그(`logs/L0510000.log` 등)를 한 줄씩 읽어 처리기에 전달합니다.
//! 잘못된 UTF-8 바이트가 있어도 중단하지 않습니다.
//! 최대 길이를 넘는 라인은 버퍼에 모두 올리지 않고 건너뜁니다.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::{info, warn};

use hldslog_core::display::Displayer;

use crate::error::LogParserError;
use crate::handler::LogHandler;

/// 재생 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// 읽은 라인 수 (빈 라인 포함)
    pub lines: u64,
    /// 디스플레이어까지 전달된 이벤트 수
    pub events: u64,
    /// 최대 길이를 넘어 건너뛴 라인 수 (`lines`에 포함)
    pub skipped: u64,
}

/// 파일을 한 줄씩 `process_line`에 전달하고 통계를 반환합니다.
///
/// 줄바꿈을 뺀 길이가 `max_line_len` 바이트를 넘는 라인은 처리하지 않고
/// `skipped`로 집계합니다. 한 번에 읽는 양은 `max_line_len + 1` 바이트로 제한됩니다.
///
/// # Errors
/// 파일을 열거나 읽을 수 없는 경우 [`LogParserError::Collector`]
pub async fn replay_file<D: Displayer>(
    path: impl AsRef<Path>,
    handler: &LogHandler<D>,
    max_line_len: usize,
) -> Result<ReplayStats, LogParserError> {
    let path = path.as_ref();
    let io_error = |e: std::io::Error| LogParserError::Collector {
        source_type: "replay".to_owned(),
        reason: format!("{}: {e}", path.display()),
    };

    let file = File::open(path).await.map_err(io_error)?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut stats = ReplayStats::default();

    loop {
        buf.clear();
        let read = read_bounded(&mut reader, &mut buf, max_line_len)
            .await
            .map_err(io_error)?;
        if read == 0 {
            break;
        }

        stats.lines += 1;
        if buf.len() > max_line_len && buf.last() != Some(&b'\n') {
            skip_rest_of_line(&mut reader, &mut buf, max_line_len)
                .await
                .map_err(io_error)?;
            stats.skipped += 1;
            warn!(
                path = %path.display(),
                line = stats.lines,
                max_line_len,
                "skipping oversize log line"
            );
            continue;
        }

        let line = String::from_utf8_lossy(&buf);
        if handler.process_line(&line).is_some() {
            stats.events += 1;
        }
    }

    info!(
        path = %path.display(),
        lines = stats.lines,
        events = stats.events,
        skipped = stats.skipped,
        "log file replayed"
    );
    Ok(stats)
}

/// `\n`까지 읽되 최대 `max_line_len + 1` 바이트에서 멈춥니다.
async fn read_bounded<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max_line_len: usize,
) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let limit = u64::try_from(max_line_len).unwrap_or(u64::MAX).saturating_add(1);
    reader.take(limit).read_until(b'\n', buf).await
}

/// 다음 `\n` 또는 EOF까지 버립니다.
async fn skip_rest_of_line<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max_line_len: usize,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        buf.clear();
        let read = read_bounded(reader, buf, max_line_len).await?;
        if read == 0 || buf.last() == Some(&b'\n') {
            return Ok(());
        }
    }
}
