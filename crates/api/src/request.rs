//! The pending request record and its callback slots.

use crate::{fetch::FetchOptions, BoxFut};

/// Invoked exactly once with the result code and the body (or error text).
///
/// Always called from the context that drains the dispatcher, never from a
/// worker.
pub type ResponseCallback = Box<dyn FnOnce(i32, &str) + 'static + Send>;

/// Invoked by the worker on the raw result before it is queued for
/// delivery. May rewrite the body in place.
pub type PreProcessCallback =
    Box<dyn FnOnce(i32, &mut String) + 'static + Send>;

/// A unit of work that replaces the default fetch entirely. The executor
/// owns its own completion delivery.
pub type CustomExecutor =
    Box<dyn FnOnce() -> BoxFut<'static, ()> + 'static + Send>;

/// One pending or in-flight request.
///
/// A descriptor is moved into the submission queue, moved out of it into a
/// worker, and dropped when the worker is done with it.
pub struct RequestDescriptor {
    /// Target url, also the de-duplication key.
    pub url: String,
    /// Method, payload and timeout for the fetcher.
    pub options: FetchOptions,
    /// Completion callback.
    pub on_complete: ResponseCallback,
    /// Optional hook run by the worker on the raw result.
    pub pre_process: Option<PreProcessCallback>,
    /// Optional replacement for the default fetch.
    pub executor: Option<CustomExecutor>,
    /// How many times this descriptor was denied a permit.
    pub retry_count: u32,
}

impl std::fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("url", &self.url)
            .field("options", &self.options)
            .field("pre_process", &self.pre_process.is_some())
            .field("executor", &self.executor.is_some())
            .field("retry_count", &self.retry_count)
            .finish()
    }
}

impl RequestDescriptor {
    /// A request with the given url and completion callback, default
    /// options and no optional callbacks.
    pub fn new<F>(url: impl Into<String>, on_complete: F) -> Self
    where
        F: FnOnce(i32, &str) + 'static + Send,
    {
        Self {
            url: url.into(),
            options: FetchOptions::default(),
            on_complete: Box::new(on_complete),
            pre_process: None,
            executor: None,
            retry_count: 0,
        }
    }

    /// A GET request.
    pub fn get<F>(url: impl Into<String>, on_complete: F) -> Self
    where
        F: FnOnce(i32, &str) + 'static + Send,
    {
        Self::new(url, on_complete)
    }

    /// A POST of a JSON payload.
    pub fn post<F>(
        url: impl Into<String>,
        payload: impl Into<String>,
        on_complete: F,
    ) -> Self
    where
        F: FnOnce(i32, &str) + 'static + Send,
    {
        Self::new(url, on_complete)
            .with_options(FetchOptions::post_json(payload))
    }

    /// A request whose work is done by `executor` instead of the fetcher.
    ///
    /// `key` takes the place of the url for de-duplication. The completion
    /// callback is never invoked by the dispatcher once the executor has
    /// run, the executor is expected to deliver its own result.
    pub fn with_executor<E, Fut, F>(
        key: impl Into<String>,
        executor: E,
        on_complete: F,
    ) -> Self
    where
        E: FnOnce() -> Fut + 'static + Send,
        Fut: std::future::Future<Output = ()> + 'static + Send,
        F: FnOnce(i32, &str) + 'static + Send,
    {
        let mut out = Self::new(key, on_complete);
        out.executor = Some(Box::new(move || Box::pin(executor())));
        out
    }

    /// Replace the fetch options.
    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the pre-process hook.
    pub fn with_pre_process<P>(mut self, pre_process: P) -> Self
    where
        P: FnOnce(i32, &mut String) + 'static + Send,
    {
        self.pre_process = Some(Box::new(pre_process));
        self
    }
}
