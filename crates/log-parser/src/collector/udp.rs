//! UDP 로그 수집기
//!
//! HLDS의 `logaddress_add <host> <port>` 출력을 UDP 소켓으로 수신합니다.
//! 데이터그램마다 라인을 분리하여 [`LogHandler::process_line`]으로 전달하고,
//! 수신 상태 변화(연결, 침묵, 종료)를 [`SourceNotice`]로 알립니다.

use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use hldslog_core::config::CollectorConfig;
use hldslog_core::display::{Displayer, SourceNotice};
use hldslog_core::metrics as m;

use super::{CollectorStatus, split_datagram};
use crate::error::LogParserError;
use crate::handler::LogHandler;

/// 수집 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectorStats {
    /// 수신한 데이터그램 수
    pub datagrams: u64,
    /// 처리한 라인 수
    pub lines: u64,
    /// 디스플레이어까지 전달된 이벤트 수
    pub events: u64,
}

/// UDP 로그 수집기
///
/// `CancellationToken`이 취소될 때까지 수신 루프를 실행합니다.
/// `idle_timeout_secs` 동안 데이터가 없으면 [`SourceNotice::Disconnected`]를 한 번 알리고,
/// 데이터가 다시 들어오면 [`SourceNotice::Connected`]를 알립니다.
pub struct UdpLogCollector<D: Displayer> {
    /// 라인 처리기
    handler: Arc<LogHandler<D>>,
    /// 수집기 설정
    config: CollectorConfig,
    /// Cancellation token for graceful shutdown
    cancel_token: CancellationToken,
    /// 현재 상태
    status: CollectorStatus,
}

impl<D: Displayer> UdpLogCollector<D> {
    /// 새 UDP 수집기를 생성합니다.
    pub fn new(
        handler: Arc<LogHandler<D>>,
        config: CollectorConfig,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            handler,
            config,
            cancel_token,
            status: CollectorStatus::Idle,
        }
    }

    /// 설정된 `host:port`에 바인드하고 수신 루프를 실행합니다.
    pub async fn run(&mut self) -> Result<CollectorStats, LogParserError> {
        let bind_addr = self.bind_addr();
        let socket = match UdpSocket::bind(&bind_addr).await {
            Ok(socket) => socket,
            Err(e) => {
                let reason = format!("failed to bind to {bind_addr}: {e}");
                self.status = CollectorStatus::Error(reason.clone());
                return Err(LogParserError::Collector {
                    source_type: "udp".to_owned(),
                    reason,
                });
            }
        };

        self.run_with_socket(socket).await
    }

    /// 이미 바인드된 소켓으로 수신 루프를 실행합니다.
    pub async fn run_with_socket(
        &mut self,
        socket: UdpSocket,
    ) -> Result<CollectorStats, LogParserError> {
        let local_addr = socket.local_addr()?;
        info!(addr = %local_addr, "UDP log collector listening");

        self.status = CollectorStatus::Running;
        self.handler.notify(SourceNotice::Connected);

        let idle = Duration::from_secs(self.config.idle_timeout_secs);
        let mut buf = BytesMut::zeroed(self.config.max_datagram_size);
        let mut stats = CollectorStats::default();
        let mut receiving = true;

        loop {
            tokio::select! {
                biased;
                _ = self.cancel_token.cancelled() => {
                    info!("UDP log collector received shutdown signal");
                    break;
                }
                result = timeout(idle, socket.recv_from(&mut buf[..])) => {
                    match result {
                        Ok(Ok((len, peer))) => {
                            if !receiving {
                                receiving = true;
                                self.handler.notify(SourceNotice::Connected);
                            }
                            stats.datagrams += 1;
                            metrics::counter!(m::DATAGRAMS_RECEIVED_TOTAL).increment(1);
                            debug!(peer = %peer, bytes = len, "datagram received");

                            for line in split_datagram(&buf[..len]) {
                                stats.lines += 1;
                                if self.handler.process_line(&line).is_some() {
                                    stats.events += 1;
                                }
                            }
                        }
                        Ok(Err(e)) => {
                            // ICMP port unreachable 등은 수신을 멈추지 않음
                            warn!(error = %e, "UDP receive error");
                        }
                        Err(_) => {
                            if receiving {
                                receiving = false;
                                self.handler.notify(SourceNotice::Disconnected);
                            }
                        }
                    }
                }
            }
        }

        self.handler.notify(SourceNotice::Stopped);
        self.status = CollectorStatus::Stopped;
        info!(
            datagrams = stats.datagrams,
            lines = stats.lines,
            events = stats.events,
            "UDP log collector stopped"
        );
        Ok(stats)
    }

    /// 바인드 주소 (`host:port`)
    pub fn bind_addr(&self) -> String {
        self.handler.config().source_label()
    }

    /// 현재 상태를 반환합니다.
    pub fn status(&self) -> &CollectorStatus {
        &self.status
    }
}
