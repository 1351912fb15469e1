use super::utils::*;
use crate::factories::{core_dispatch::CoreDispatchConfig, MemFetcher};
use courier_api::{dispatch::Dispatch, RequestDescriptor};
use courier_test_utils::{iter_check, url::url_list};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[tokio::test(flavor = "multi_thread")]
async fn delivery_follows_completion_order() {
    let fetcher = GateFetcher::new();
    let config = CoreDispatchConfig {
        permit_capacity: 2,
        ..Default::default()
    };
    let dispatch = make_dispatch(config, fetcher.clone());
    let delivered: Delivered = Default::default();

    for tag in ["A", "B"] {
        assert!(dispatch.submit(RequestDescriptor::get(
            format!("http://x/{tag}"),
            record(&delivered, tag)
        )));
    }
    dispatch.tick();
    dispatch.tick();
    iter_check!({
        if fetcher.started().len() == 2 {
            break;
        }
    });

    fetcher.open("http://x/B");
    iter_check!({
        if dispatch.pending_completions() == 1 {
            break;
        }
    });
    fetcher.open("http://x/A");
    iter_check!({
        if dispatch.pending_completions() == 2 {
            break;
        }
    });

    assert_eq!(2, dispatch.drain());
    assert_eq!(vec!["B", "A"], tags(&delivered));
}

#[tokio::test(flavor = "multi_thread")]
async fn callbacks_run_on_the_draining_thread() {
    let fetcher = Arc::new(MemFetcher::default());
    let dispatch = make_dispatch(CoreDispatchConfig::default(), fetcher);
    let threads = Arc::new(Mutex::new(Vec::new()));

    assert!(dispatch.submit(RequestDescriptor::get("http://x/1", {
        let threads = threads.clone();
        move |_, _| threads.lock().unwrap().push(std::thread::current().id())
    })));
    dispatch.tick();
    iter_check!({
        if dispatch.pending_completions() == 1 {
            break;
        }
    });

    let this_thread = std::thread::current().id();
    assert_eq!(1, dispatch.drain());
    assert_eq!(vec![this_thread], *threads.lock().unwrap());
}

#[tokio::test(flavor = "multi_thread")]
async fn every_accepted_request_gets_exactly_one_callback() {
    let fetcher = Arc::new(MemFetcher::default());
    let urls = url_list("http://x", 12);
    for url in urls.iter() {
        fetcher.respond(url, 200, url);
    }
    fetcher.set_delay(std::time::Duration::from_millis(5));

    // Low attempt limit: some requests will be dropped for lack of a permit,
    // which must still count as their one callback.
    let config = CoreDispatchConfig {
        permit_capacity: 3,
        max_admission_attempts: 2,
        ..Default::default()
    };
    let dispatch = make_dispatch(config, fetcher);
    let delivered: Delivered = Default::default();

    for url in urls.iter() {
        assert!(dispatch.submit(RequestDescriptor::get(
            url,
            record(&delivered, url)
        )));
    }

    iter_check!(5000, 1, {
        dispatch.tick();
        dispatch.drain();
        if delivered.lock().unwrap().len() >= urls.len()
            && !dispatch.is_busy()
        {
            break;
        }
    });
    for _ in 0..3 {
        dispatch.tick();
        dispatch.drain();
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for tag in tags(&delivered) {
        *counts.entry(tag).or_default() += 1;
    }
    assert_eq!(urls.len(), counts.len());
    assert!(counts.values().all(|n| *n == 1), "{counts:?}");

    let stats = dispatch.stats();
    assert_eq!(urls.len() as u64, stats.delivered);
    assert_eq!(
        urls.len() as u64,
        stats.dispatched + stats.admission_dropped
    );
    assert_eq!(0, stats.queued);
}
