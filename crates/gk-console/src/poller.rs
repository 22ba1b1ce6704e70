//! Periodic refresh tasks.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Run `f` immediately and then every `period` until `cancel` fires.
///
/// A call that is already running when `cancel` fires completes; no new call
/// starts afterwards.
pub fn spawn_poller<F, Fut>(
    name: &'static str,
    period: Duration,
    cancel: CancellationToken,
    f: F,
) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                () = cancel.cancelled() => break,
                _ = interval.tick() => {
                    f().await;
                }
            }
        }
        debug!(poller = name, "Poller stopped");
    })
}
