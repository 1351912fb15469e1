use courier_api::dispatch::DynDispatch;
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::MissedTickBehavior;

/// Spawn the controlling task: on every interval, run one dispatcher step
/// and then drain the completion queue.
///
/// All callbacks of the dispatcher run on this one task. Abort the returned
/// handle to stop driving; queued requests stay queued.
///
/// Panics if `tick_interval` is zero. [CoreDispatch::new] rejects a config
/// with a zero interval, so `config.tick_interval()` is always safe here.
///
/// [CoreDispatch::new]: super::CoreDispatch::new
pub fn spawn_driver(
    dispatch: DynDispatch,
    tick_interval: Duration,
) -> AbortHandle {
    tracing::info!(?tick_interval, "starting dispatch driver");

    // Outside the task: a zero interval panics here, on the caller.
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::spawn(async move {
        loop {
            interval.tick().await;
            dispatch.tick();
            let delivered = dispatch.drain();
            if delivered > 0 {
                tracing::trace!(delivered, "driver delivered results");
            }
        }
    })
    .abort_handle()
}
