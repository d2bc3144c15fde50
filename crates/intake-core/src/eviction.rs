//! Optional idle-session eviction.
//!
//! Off unless a timeout is configured. The sweep runs on a fixed interval
//! until its cancellation token fires.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::dispatch::RecordSink;
use crate::outbound::MessageSender;
use crate::repository::{SessionRepository, TranscriptRepository};
use crate::service::IntakeService;

/// Periodically evict sessions idle for longer than `idle_timeout`.
pub async fn run_idle_sweep<S, T, M, K>(
    service: Arc<IntakeService<S, T, M, K>>,
    idle_timeout: Duration,
    interval: Duration,
    cancel: CancellationToken,
) where
    S: SessionRepository,
    T: TranscriptRepository,
    M: MessageSender,
    K: RecordSink,
{
    info!(
        idle_timeout_secs = idle_timeout.as_secs(),
        interval_secs = interval.as_secs(),
        "idle session sweep started"
    );
    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("idle session sweep stopped");
                break;
            }
            _ = ticker.tick() => {
                match service.evict_idle(idle_timeout).await {
                    Ok(0) => {}
                    Ok(n) => info!(evicted = n, "idle sessions evicted"),
                    Err(e) => warn!(error = %e, "idle session sweep failed"),
                }
            }
        }
    }
}
