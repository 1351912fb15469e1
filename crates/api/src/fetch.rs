//! Courier fetch types.
//!
//! The [Fetcher] is the external collaborator that performs the one
//! genuinely blocking operation in courier: the network request itself.
//! TLS, header parsing, chunked transfer decoding and timeout enforcement
//! are all the fetcher's concern.

use crate::{builder, config, BoxFut, CourierResult};
use std::sync::Arc;
use std::time::Duration;

#[cfg(any(test, feature = "mockall"))]
use mockall::automock;

/// Content type sent along with a POST payload by default.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// The request method.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// A read.
    #[default]
    Get,
    /// A write carrying a payload.
    Post,
}

/// Per-request options handed to the [Fetcher].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Request method.
    pub method: Method,
    /// Request body, for writes.
    pub payload: Option<String>,
    /// Content type of the payload.
    pub content_type: Option<String>,
    /// Overrides the fetcher's configured timeout.
    pub timeout: Option<Duration>,
}

impl FetchOptions {
    /// Options for a POST of a JSON payload.
    pub fn post_json(payload: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            payload: Some(payload.into()),
            content_type: Some(CONTENT_TYPE_JSON.to_string()),
            timeout: None,
        }
    }
}

/// A single request handed to the [Fetcher].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Target url.
    pub url: String,
    /// Method, payload and timeout.
    pub options: FetchOptions,
}

/// A response from the remote, success or not.
///
/// Non-success statuses are still responses; only transport level
/// failures are reported as errors by the [Fetcher].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// Status code returned by the remote.
    pub status_code: i32,
    /// Complete response body.
    pub body: String,
}

/// The external network client wrapped by courier workers.
#[cfg_attr(any(test, feature = "mockall"), automock)]
pub trait Fetcher: 'static + Send + Sync + std::fmt::Debug {
    /// Perform the request and yield the complete body, or an error
    /// if the request never produced a response (connection refused,
    /// timed out, invalid url).
    fn fetch(
        &self,
        request: FetchRequest,
    ) -> BoxFut<'_, CourierResult<FetchResponse>>;
}

/// Trait-object [Fetcher].
pub type DynFetcher = Arc<dyn Fetcher>;

/// A factory for creating [Fetcher] instances.
pub trait FetcherFactory: 'static + Send + Sync + std::fmt::Debug {
    /// Help the builder construct a default config from the chosen
    /// module factories.
    fn default_config(&self, config: &mut config::Config)
        -> CourierResult<()>;

    /// Construct a fetcher instance.
    fn create(
        &self,
        builder: Arc<builder::Builder>,
    ) -> BoxFut<'static, CourierResult<DynFetcher>>;
}

/// Trait-object [FetcherFactory].
pub type DynFetcherFactory = Arc<dyn FetcherFactory>;
