use super::utils::*;
use crate::factories::{
    core_dispatch::{spawn_driver, CoreDispatchConfig},
    MemFetcher,
};
use courier_api::{
    dispatch::{Dispatch, DynDispatch},
    RequestDescriptor,
};
use courier_test_utils::{iter_check, url::url_list};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread")]
async fn running_workers_bounded_by_permit_capacity() {
    let fetcher = GateFetcher::new();
    let config = CoreDispatchConfig {
        permit_capacity: 2,
        max_admission_attempts: 1000,
        ..Default::default()
    };
    let dispatch = make_dispatch(config, fetcher.clone());
    let delivered: Delivered = Default::default();
    let urls = url_list("http://x", 5);

    for url in urls.iter() {
        assert!(dispatch.submit(RequestDescriptor::get(
            url,
            record(&delivered, url)
        )));
    }
    for _ in 0..5 {
        dispatch.tick();
    }
    iter_check!({
        if fetcher.started().len() == 2 {
            break;
        }
    });

    let stats = dispatch.stats();
    assert_eq!(2, stats.active);
    assert_eq!(3, stats.queued);
    assert_eq!(urls[2..], dispatch.queued_urls()[..]);

    for url in urls.iter() {
        fetcher.open(url);
    }
    iter_check!(5000, {
        dispatch.tick();
        dispatch.drain();
        if delivered.lock().unwrap().len() == urls.len() {
            break;
        }
    });

    assert!(fetcher.max_in_flight() <= 2);
    assert_eq!(2, dispatch.stats().max_active);
    assert!(delivered.lock().unwrap().iter().all(|(_, code, _)| *code == 200));
}

#[tokio::test(flavor = "multi_thread")]
async fn single_permit_never_overlaps_under_driver() {
    let fetcher = Arc::new(MemFetcher::default());
    let urls = url_list("http://x", 4);
    for url in urls.iter() {
        fetcher.respond(url, 200, "ok");
    }
    fetcher.set_delay(Duration::from_millis(20));

    let config = CoreDispatchConfig {
        max_admission_attempts: 1000,
        tick_interval_ms: 5,
        ..Default::default()
    };
    let tick_interval = config.tick_interval();
    let dispatch = Arc::new(make_dispatch(config, fetcher.clone()));
    let delivered: Delivered = Default::default();

    for url in urls.iter() {
        assert!(dispatch.submit(RequestDescriptor::get(
            url,
            record(&delivered, url)
        )));
    }

    let dyn_dispatch: DynDispatch = dispatch.clone();
    let driver = spawn_driver(dyn_dispatch, tick_interval);

    iter_check!(5000, {
        if delivered.lock().unwrap().len() == urls.len() {
            break;
        }
    });
    driver.abort();

    assert_eq!(1, dispatch.stats().max_active);
    assert_eq!(urls, tags(&delivered));
}

#[tokio::test(flavor = "multi_thread")]
async fn aborted_driver_stops_dispatching() {
    let fetcher = Arc::new(MemFetcher::default());
    let dispatch = Arc::new(make_dispatch(
        Default::default(),
        fetcher.clone(),
    ));

    let dyn_dispatch: DynDispatch = dispatch.clone();
    let driver = spawn_driver(dyn_dispatch, Duration::from_millis(5));
    driver.abort();
    iter_check!({
        if driver.is_finished() {
            break;
        }
    });

    assert!(dispatch.submit(RequestDescriptor::get("http://x/1", |_, _| {})));
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(vec!["http://x/1"], dispatch.queued_urls());
    assert!(fetcher.requests().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_duplicate_submissions_accept_one() {
    let dispatch = Arc::new(make_dispatch(
        Default::default(),
        Arc::new(MemFetcher::default()),
    ));

    let accepted = futures::future::join_all((0..8).map(|_| {
        let dispatch = dispatch.clone();
        tokio::task::spawn(async move {
            dispatch
                .submit(RequestDescriptor::get("http://x/same", |_, _| {}))
        })
    }))
    .await
    .into_iter()
    .map(|r| r.unwrap())
    .filter(|accepted| *accepted)
    .count();

    assert_eq!(1, accepted);
    assert_eq!(vec!["http://x/same"], dispatch.queued_urls());
}
