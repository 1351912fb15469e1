//! The blocking HTTP fetcher provided by courier.
//!
//! Each request runs on tokio's blocking thread pool, since the
//! underlying client blocks the calling thread until the whole body has
//! been read or the timeout fires.

use courier_api::{builder, config::Config, fetch::*, *};
use std::sync::Arc;
use std::time::Duration;

/// UreqFetcher configuration types.
pub mod config {
    /// Configuration parameters for
    /// [UreqFetcherFactory](super::UreqFetcherFactory).
    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct UreqFetcherConfig {
        /// Timeout of a whole request, connect through body.
        /// Default: 10 s.
        pub timeout_ms: u32,
        /// User agent header to send. Default: the client's own.
        pub user_agent: Option<String>,
    }

    impl Default for UreqFetcherConfig {
        fn default() -> Self {
            Self {
                timeout_ms: 10_000,
                user_agent: None,
            }
        }
    }

    impl UreqFetcherConfig {
        /// Get the timeout as a [std::time::Duration].
        pub fn timeout(&self) -> std::time::Duration {
            std::time::Duration::from_millis(self.timeout_ms as u64)
        }
    }

    /// Module-level configuration for UreqFetcher.
    #[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct UreqFetcherModConfig {
        /// UreqFetcher configuration.
        pub ureq_fetcher: UreqFetcherConfig,
    }

    impl courier_api::config::ModConfig for UreqFetcherModConfig {}
}

pub use config::*;

/// A production-ready fetcher.
#[derive(Debug)]
pub struct UreqFetcherFactory {}

impl UreqFetcherFactory {
    /// Construct a new UreqFetcherFactory.
    pub fn create() -> DynFetcherFactory {
        Arc::new(Self {})
    }
}

impl FetcherFactory for UreqFetcherFactory {
    fn default_config(&self, config: &mut Config) -> CourierResult<()> {
        config.set_module_config(&UreqFetcherModConfig::default())?;
        Ok(())
    }

    fn create(
        &self,
        builder: Arc<builder::Builder>,
    ) -> BoxFut<'static, CourierResult<DynFetcher>> {
        Box::pin(async move {
            let config: UreqFetcherModConfig =
                builder.config.get_module_config()?;
            let out: DynFetcher =
                Arc::new(UreqFetcher::new(config.ureq_fetcher));
            Ok(out)
        })
    }
}

/// Fetcher built on a blocking [ureq::Agent].
#[derive(Clone)]
pub struct UreqFetcher {
    agent: ureq::Agent,
    timeout: Duration,
}

impl std::fmt::Debug for UreqFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqFetcher")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl UreqFetcher {
    /// Construct a new fetcher.
    pub fn new(config: UreqFetcherConfig) -> Self {
        let mut agent = ureq::AgentBuilder::new().timeout(config.timeout());
        if let Some(user_agent) = &config.user_agent {
            agent = agent.user_agent(user_agent);
        }
        Self {
            agent: agent.build(),
            timeout: config.timeout(),
        }
    }

    /// Perform the request on the calling thread.
    ///
    /// Note the `blocking_` prefix. If this is called from an async
    /// context, it should be treated as a blocking operation.
    pub fn blocking_fetch(
        &self,
        request: FetchRequest,
    ) -> CourierResult<FetchResponse> {
        let FetchRequest { url, options } = request;
        let FetchOptions {
            method,
            payload,
            content_type,
            timeout,
        } = options;

        let url = url::Url::parse(&url).map_err(|err| {
            CourierError::other_src(format!("invalid url {url}"), err)
        })?;

        let req = match method {
            Method::Get => self.agent.request_url("GET", &url),
            Method::Post => self.agent.request_url("POST", &url),
        }
        .timeout(timeout.unwrap_or(self.timeout));

        let result = match method {
            Method::Get => req.call(),
            Method::Post => {
                let req = match &content_type {
                    Some(content_type) => req.set("Content-Type", content_type),
                    None => req,
                };
                req.send_string(payload.as_deref().unwrap_or_default())
            }
        };

        let response = match result {
            Ok(response) => response,
            // Error statuses are still responses.
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(err)) => {
                return Err(CourierError::other_src(
                    format!("request to {url} failed"),
                    err,
                ));
            }
        };

        let status_code = i32::from(response.status());
        let chunked = response
            .header("Transfer-Encoding")
            .is_some_and(|v| v.eq_ignore_ascii_case("chunked"));
        let body = response.into_string().map_err(|err| {
            CourierError::other_src(
                format!("could not read response body from {url}"),
                err,
            )
        })?;

        tracing::trace!(
            %url,
            status_code,
            chunked,
            len = body.len(),
            "response read"
        );

        if method == Method::Post && status_code == 200 && body.is_empty() {
            return Err(CourierError::other(format!(
                "empty response body from {url}"
            )));
        }

        Ok(FetchResponse { status_code, body })
    }
}

impl Fetcher for UreqFetcher {
    fn fetch(
        &self,
        request: FetchRequest,
    ) -> BoxFut<'_, CourierResult<FetchResponse>> {
        let this = self.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || this.blocking_fetch(request))
                .await
                .map_err(|err| {
                    CourierError::other_src("fetch task failed", err)
                })?
        })
    }
}
