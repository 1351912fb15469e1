//! The in-memory fetcher provided by courier.

use courier_api::{builder, config::Config, fetch::*, *};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Factory for the in-memory fetcher.
/// This is NOT a production module. It is for testing only.
#[derive(Debug)]
pub struct MemFetcherFactory {
    fetcher: Arc<MemFetcher>,
}

impl MemFetcherFactory {
    /// Construct a factory producing a fresh, empty [MemFetcher].
    pub fn create() -> DynFetcherFactory {
        Self::with_fetcher(Arc::new(MemFetcher::default()))
    }

    /// Construct a factory producing the given [MemFetcher], so a test can
    /// keep a handle on it.
    pub fn with_fetcher(fetcher: Arc<MemFetcher>) -> DynFetcherFactory {
        let out: DynFetcherFactory = Arc::new(Self { fetcher });
        out
    }
}

impl FetcherFactory for MemFetcherFactory {
    fn default_config(&self, _config: &mut Config) -> CourierResult<()> {
        Ok(())
    }

    fn create(
        &self,
        _builder: Arc<builder::Builder>,
    ) -> BoxFut<'static, CourierResult<DynFetcher>> {
        let out: DynFetcher = self.fetcher.clone();
        Box::pin(async move { Ok(out) })
    }
}

#[derive(Debug, Clone)]
enum Canned {
    Response(FetchResponse),
    Error(String),
}

#[derive(Debug, Default)]
struct Inner {
    canned: HashMap<String, Canned>,
    requests: Vec<FetchRequest>,
    delay: Duration,
}

/// Answers requests from a table of canned responses keyed by url.
/// Unknown urls get a 404.
#[derive(Debug, Default)]
pub struct MemFetcher(Mutex<Inner>);

impl MemFetcher {
    /// Answer requests for `url` with the given status and body.
    pub fn respond(
        &self,
        url: impl Into<String>,
        status_code: i32,
        body: impl Into<String>,
    ) {
        self.0.lock().unwrap().canned.insert(
            url.into(),
            Canned::Response(FetchResponse {
                status_code,
                body: body.into(),
            }),
        );
    }

    /// Fail requests for `url` with a transport error.
    pub fn fail(&self, url: impl Into<String>, message: impl Into<String>) {
        self.0
            .lock()
            .unwrap()
            .canned
            .insert(url.into(), Canned::Error(message.into()));
    }

    /// Make every fetch take at least this long.
    pub fn set_delay(&self, delay: Duration) {
        self.0.lock().unwrap().delay = delay;
    }

    /// Every request seen so far, in arrival order.
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.0.lock().unwrap().requests.clone()
    }
}

impl Fetcher for MemFetcher {
    fn fetch(
        &self,
        request: FetchRequest,
    ) -> BoxFut<'_, CourierResult<FetchResponse>> {
        let (canned, delay) = {
            let mut lock = self.0.lock().unwrap();
            lock.requests.push(request.clone());
            (lock.canned.get(&request.url).cloned(), lock.delay)
        };

        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            match canned {
                Some(Canned::Response(response)) => Ok(response),
                Some(Canned::Error(message)) => {
                    Err(CourierError::other(message))
                }
                None => Ok(FetchResponse {
                    status_code: 404,
                    body: format!("no canned response for {}", request.url),
                }),
            }
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn get(url: &str) -> FetchRequest {
        FetchRequest {
            url: url.into(),
            options: FetchOptions::default(),
        }
    }

    #[tokio::test]
    async fn canned_responses() {
        let fetcher = MemFetcher::default();
        fetcher.respond("http://x/1", 200, "ok");
        fetcher.fail("http://x/2", "connection refused");

        let res = fetcher.fetch(get("http://x/1")).await.unwrap();
        assert_eq!(200, res.status_code);
        assert_eq!("ok", res.body);

        let err = fetcher.fetch(get("http://x/2")).await.unwrap_err();
        assert_eq!("connection refused", err.context());

        let res = fetcher.fetch(get("http://x/3")).await.unwrap();
        assert_eq!(404, res.status_code);

        let urls = fetcher
            .requests()
            .into_iter()
            .map(|r| r.url)
            .collect::<Vec<_>>();
        assert_eq!(vec!["http://x/1", "http://x/2", "http://x/3"], urls);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_applies_to_every_fetch() {
        let fetcher = MemFetcher::default();
        fetcher.set_delay(Duration::from_secs(5));
        let start = tokio::time::Instant::now();
        fetcher.fetch(get("http://x/1")).await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}
