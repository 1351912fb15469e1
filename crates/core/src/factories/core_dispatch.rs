//! Dispatch is a courier module for running fetch requests on a bounded
//! number of workers and handing their results back to the caller.
//!
//! See [the docs](crate::doc::core_dispatch) for the full flow.
//!
//! It consists of multiple parts:
//! - A permit pool bounding the number of workers running at once
//! - A submission queue holding pending requests, unique by url
//! - Workers, one tokio task per dispatched request
//! - A completion queue of finished results, read only by the drain step
//!
//! ### Controlling context
//!
//! [CoreDispatch::tick] and [CoreDispatch::drain] are meant to be called
//! periodically from one task, for example through [spawn_driver].
//! Callbacks only ever run inside those two calls, never on a worker.

use courier_api::{
    builder,
    dispatch::{
        Dispatch, DispatchFactory, DispatchStats, DynDispatch,
        DynDispatchFactory,
    },
    fetch::DynFetcher,
    status, BoxFut, CourierError, CourierResult, RequestDescriptor,
    ResponseEnvelope,
};
use std::sync::Arc;

mod completion_queue;
mod driver;
mod metrics;
mod permit;
mod submission_queue;
mod worker;

pub use driver::spawn_driver;

use completion_queue::{completion_queue, CompletionReceiver, CompletionSender};
use metrics::DispatchMetrics;
use permit::PermitPool;
use submission_queue::SubmissionQueue;
use worker::{Admission, Worker};

/// CoreDispatch configuration types.
pub mod config {
    /// Configuration parameters for
    /// [CoreDispatchFactory](super::CoreDispatchFactory).
    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct CoreDispatchConfig {
        /// How many workers may run at once. Default: 1.
        pub permit_capacity: usize,
        /// How many requests may wait for a permit. Default: 20.
        pub submission_queue_capacity: usize,
        /// How many finished results may wait for the drain step.
        /// Default: 20.
        pub completion_queue_capacity: usize,
        /// How many times the head request may be denied a permit before
        /// it is dropped with a synthetic failure. Default: 5.
        pub max_admission_attempts: u32,
        /// Interval between steps when driven by
        /// [spawn_driver](super::spawn_driver). Default: 100 ms.
        pub tick_interval_ms: u32,
    }

    impl Default for CoreDispatchConfig {
        fn default() -> Self {
            Self {
                permit_capacity: 1,
                submission_queue_capacity: 20,
                completion_queue_capacity: 20,
                max_admission_attempts: 5,
                tick_interval_ms: 100,
            }
        }
    }

    impl CoreDispatchConfig {
        /// Get the tick interval as a [std::time::Duration].
        pub fn tick_interval(&self) -> std::time::Duration {
            std::time::Duration::from_millis(self.tick_interval_ms as u64)
        }
    }

    /// Module-level configuration for CoreDispatch.
    #[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct CoreDispatchModConfig {
        /// CoreDispatch configuration.
        pub core_dispatch: CoreDispatchConfig,
    }

    impl courier_api::config::ModConfig for CoreDispatchModConfig {}
}

pub use config::*;

/// A production-ready dispatch module.
#[derive(Debug)]
pub struct CoreDispatchFactory {}

impl CoreDispatchFactory {
    /// Construct a new CoreDispatchFactory.
    pub fn create() -> DynDispatchFactory {
        Arc::new(Self {})
    }
}

impl DispatchFactory for CoreDispatchFactory {
    fn default_config(
        &self,
        config: &mut courier_api::config::Config,
    ) -> CourierResult<()> {
        config.set_module_config(&CoreDispatchModConfig::default())?;
        Ok(())
    }

    fn create(
        &self,
        builder: Arc<builder::Builder>,
        fetcher: DynFetcher,
    ) -> BoxFut<'static, CourierResult<DynDispatch>> {
        Box::pin(async move {
            let config: CoreDispatchModConfig =
                builder.config.get_module_config()?;
            let out: DynDispatch =
                Arc::new(CoreDispatch::new(config.core_dispatch, fetcher)?);
            Ok(out)
        })
    }
}

/// The core dispatcher.
#[derive(Debug)]
pub struct CoreDispatch {
    config: CoreDispatchConfig,
    permits: PermitPool,
    submissions: SubmissionQueue,
    completion_tx: CompletionSender,
    completion_rx: CompletionReceiver,
    fetcher: DynFetcher,
    metrics: Arc<DispatchMetrics>,
}

impl CoreDispatch {
    /// Construct a dispatcher running requests through `fetcher`.
    ///
    /// Fails if any of the capacities or the tick interval in `config` is
    /// zero.
    pub fn new(
        config: CoreDispatchConfig,
        fetcher: DynFetcher,
    ) -> CourierResult<Self> {
        if config.permit_capacity == 0 {
            return Err(CourierError::other("permitCapacity must be > 0"));
        }
        if config.submission_queue_capacity == 0 {
            return Err(CourierError::other(
                "submissionQueueCapacity must be > 0",
            ));
        }
        if config.completion_queue_capacity == 0 {
            return Err(CourierError::other(
                "completionQueueCapacity must be > 0",
            ));
        }
        if config.tick_interval_ms == 0 {
            return Err(CourierError::other("tickIntervalMs must be > 0"));
        }

        let (completion_tx, completion_rx) =
            completion_queue(config.completion_queue_capacity);

        Ok(Self {
            permits: PermitPool::new(config.permit_capacity),
            submissions: SubmissionQueue::new(
                config.submission_queue_capacity,
            ),
            completion_tx,
            completion_rx,
            fetcher,
            metrics: Arc::new(DispatchMetrics::default()),
            config,
        })
    }

    /// The configuration this dispatcher was built with.
    pub fn config(&self) -> &CoreDispatchConfig {
        &self.config
    }

    /// Urls waiting for a permit, head first.
    pub fn queued_urls(&self) -> Vec<String> {
        self.submissions.urls()
    }

    /// Results waiting for the drain step.
    pub fn pending_completions(&self) -> usize {
        self.completion_rx.len()
    }

    /// Deliver a dispatcher-level failure straight through the request's
    /// callback, bypassing the completion queue.
    fn deliver_failure(&self, request: RequestDescriptor, message: &str) {
        ResponseEnvelope::new(
            status::DISPATCH_FAILED,
            message,
            request.on_complete,
        )
        .deliver();
        self.metrics.record_delivered(1);
    }
}

impl Dispatch for CoreDispatch {
    fn submit(&self, request: RequestDescriptor) -> bool {
        let url = request.url.clone();
        match self.submissions.submit(request) {
            Ok(queued) => {
                tracing::debug!(%url, queued, "request queued");
                true
            }
            Err(reason) => {
                tracing::warn!(%url, "request rejected: {reason}");
                false
            }
        }
    }

    fn tick(&self) {
        if self.submissions.is_empty() {
            return;
        }

        let Some(permit) = self.permits.try_acquire() else {
            if let Some(request) = self
                .submissions
                .record_denied(self.config.max_admission_attempts)
            {
                tracing::warn!(
                    url = %request.url,
                    attempts = request.retry_count,
                    "dropping request, no permit became available"
                );
                self.metrics.record_admission_dropped();
                self.deliver_failure(request, status::MSG_ADMISSION_FAILED);
            }
            return;
        };

        let admission = Admission::new(permit, self.metrics.clone());

        // Another caller may have emptied the queue since the check above.
        let Some(request) = self.submissions.pop() else {
            tracing::debug!("submission queue empty after permit acquired");
            return;
        };

        tracing::debug!(
            url = %request.url,
            remaining = self.submissions.len(),
            "dispatching request"
        );

        let worker = Worker::new(
            request,
            admission,
            self.fetcher.clone(),
            self.completion_tx.clone(),
            self.metrics.clone(),
        );

        match worker.start() {
            Ok(()) => self.metrics.record_dispatch(),
            Err(worker) => {
                self.metrics.record_worker_start_failure();
                let request = worker.abandon();
                self.deliver_failure(request, status::MSG_WORKER_START_FAILED);
            }
        }
    }

    fn drain(&self) -> usize {
        let mut delivered = 0;
        while let Some(envelope) = self.completion_rx.pop() {
            envelope.deliver();
            delivered += 1;
        }
        if delivered > 0 {
            self.metrics.record_delivered(delivered);
            tracing::trace!(delivered, "drained completion queue");
        }
        delivered
    }

    fn is_busy(&self) -> bool {
        self.permits.in_use() > 0
    }

    fn stats(&self) -> DispatchStats {
        self.metrics.snapshot(self.submissions.len())
    }
}
