use super::{
    completion_queue::CompletionSender, metrics::DispatchMetrics,
    permit::Permit,
};
use courier_api::{
    fetch::{DynFetcher, FetchOptions, FetchRequest, FetchResponse},
    request::PreProcessCallback,
    status, RequestDescriptor, ResponseEnvelope,
};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;

/// Holds a permit for the lifetime of one worker. Dropping it, however the
/// worker ends, returns the permit and decrements the active count.
#[derive(Debug)]
pub(super) struct Admission {
    permit: Option<Permit>,
    metrics: Arc<DispatchMetrics>,
}

impl Admission {
    pub fn new(permit: Permit, metrics: Arc<DispatchMetrics>) -> Self {
        let active = metrics.record_acquire();
        tracing::debug!(active, "permit acquired");
        Self {
            permit: Some(permit),
            metrics,
        }
    }
}

impl Drop for Admission {
    fn drop(&mut self) {
        let active = self.metrics.record_release();
        // Return the permit only after the count is down, so the count
        // never exceeds the permit capacity.
        drop(self.permit.take());
        tracing::debug!(active, "permit released");
    }
}

/// Executes a single request on its own task.
#[derive(Debug)]
pub(super) struct Worker {
    request: RequestDescriptor,
    admission: Admission,
    fetcher: DynFetcher,
    completions: CompletionSender,
    metrics: Arc<DispatchMetrics>,
}

impl Worker {
    pub fn new(
        request: RequestDescriptor,
        admission: Admission,
        fetcher: DynFetcher,
        completions: CompletionSender,
        metrics: Arc<DispatchMetrics>,
    ) -> Self {
        Self {
            request,
            admission,
            fetcher,
            completions,
            metrics,
        }
    }

    /// Spawn the worker task on the current runtime. If there is no
    /// runtime to spawn on, the worker is handed back untouched.
    pub fn start(self) -> Result<(), Self> {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(self.run());
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    url = %self.request.url,
                    "failed to start worker: {err}"
                );
                Err(self)
            }
        }
    }

    /// Give up on the worker, releasing its permit and returning the
    /// request.
    pub fn abandon(self) -> RequestDescriptor {
        let Self {
            request, admission, ..
        } = self;
        drop(admission);
        request
    }

    async fn run(self) {
        let Self {
            request,
            admission,
            fetcher,
            completions,
            metrics,
        } = self;
        let RequestDescriptor {
            url,
            options,
            on_complete,
            pre_process,
            executor,
            ..
        } = request;

        tracing::info!(%url, "worker started");

        match executor {
            Some(executor) => {
                // The executor delivers its own result.
                drop(on_complete);
                let ran = AssertUnwindSafe(async move { executor().await })
                    .catch_unwind()
                    .await;
                if ran.is_err() {
                    tracing::error!(%url, "custom executor panicked");
                    metrics.record_worker_panic();
                }
            }
            None => {
                let outcome = AssertUnwindSafe(fetch_and_process(
                    fetcher,
                    url.clone(),
                    options,
                    pre_process,
                ))
                .catch_unwind()
                .await;

                let (code, body) = match outcome {
                    Ok(result) => result,
                    Err(_) => {
                        tracing::error!(%url, "worker panicked");
                        metrics.record_worker_panic();
                        (
                            status::DISPATCH_FAILED,
                            status::MSG_WORKER_PANICKED.to_string(),
                        )
                    }
                };

                match completions.push(ResponseEnvelope::new(
                    code,
                    body,
                    on_complete,
                )) {
                    Ok(()) => (),
                    Err(TrySendError::Full(_)) => {
                        tracing::warn!(
                            %url,
                            "completion queue full, dropping result"
                        );
                        metrics.record_completion_overflow();
                    }
                    Err(TrySendError::Closed(_)) => {
                        tracing::warn!(
                            %url,
                            "dispatcher is gone, dropping result"
                        );
                        metrics.record_completion_overflow();
                    }
                }
            }
        }

        metrics.record_completion();
        drop(admission);
        tracing::info!(%url, "worker finished");
    }
}

/// Fetch `url` and apply the pre-process hook. Transport errors become
/// [status::FETCH_FAILED] with the error text as body.
async fn fetch_and_process(
    fetcher: DynFetcher,
    url: String,
    options: FetchOptions,
    pre_process: Option<PreProcessCallback>,
) -> (i32, String) {
    let (code, mut body) = match fetcher
        .fetch(FetchRequest {
            url: url.clone(),
            options,
        })
        .await
    {
        Ok(FetchResponse { status_code, body }) => (status_code, body),
        Err(err) => {
            tracing::warn!(%url, "fetch failed: {err}");
            (status::FETCH_FAILED, err.to_string())
        }
    };

    if let Some(pre_process) = pre_process {
        pre_process(code, &mut body);
    }

    (code, body)
}
