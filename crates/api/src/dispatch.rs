//! Courier dispatch types.

use crate::{
    builder, config, fetch::DynFetcher, request::RequestDescriptor, BoxFut,
    CourierResult,
};
use std::sync::Arc;

/// Point-in-time counters of a dispatcher.
#[derive(
    Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct DispatchStats {
    /// Descriptors waiting in the submission queue.
    pub queued: usize,
    /// Workers currently holding a permit.
    pub active: usize,
    /// Highest number of workers ever observed holding a permit at once.
    pub max_active: usize,
    /// Workers started.
    pub dispatched: u64,
    /// Workers finished.
    pub completed: u64,
    /// Callbacks invoked by the drain step, synthetic failures included.
    pub delivered: u64,
    /// Descriptors dropped after exhausting their permit attempts.
    pub admission_dropped: u64,
    /// Envelopes lost because the completion queue was full.
    pub completion_overflow: u64,
    /// Workers that could not be started.
    pub worker_start_failures: u64,
    /// Workers whose fetch, pre-process hook or executor panicked.
    pub worker_panics: u64,
}

/// Trait for implementing a request dispatcher.
///
/// `submit` may be called from any context. `tick` and `drain` must be
/// called periodically from the one controlling context; callbacks only
/// ever run inside `tick` (synthetic failures) or `drain`.
pub trait Dispatch: 'static + Send + Sync + std::fmt::Debug {
    /// Queue a request. Returns false, dropping the descriptor without
    /// invoking its callback, if the queue is full or a request for the
    /// same url is already queued.
    fn submit(&self, request: RequestDescriptor) -> bool;

    /// Run one dispatcher step. Never waits for a permit.
    fn tick(&self);

    /// Deliver every completed result, returning the number of callbacks
    /// that were invoked.
    fn drain(&self) -> usize;

    /// True while at least one worker is running.
    fn is_busy(&self) -> bool;

    /// Current counters.
    fn stats(&self) -> DispatchStats;
}

/// Trait-object [Dispatch].
pub type DynDispatch = Arc<dyn Dispatch>;

/// A factory for creating [Dispatch] instances.
pub trait DispatchFactory: 'static + Send + Sync + std::fmt::Debug {
    /// Help the builder construct a default config from the chosen
    /// module factories.
    fn default_config(&self, config: &mut config::Config)
        -> CourierResult<()>;

    /// Construct a dispatch instance around the given fetcher.
    fn create(
        &self,
        builder: Arc<builder::Builder>,
        fetcher: DynFetcher,
    ) -> BoxFut<'static, CourierResult<DynDispatch>>;
}

/// Trait-object [DispatchFactory].
pub type DynDispatchFactory = Arc<dyn DispatchFactory>;
