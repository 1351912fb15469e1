//! Test utilities associated with request urls.

use rand::Rng;

/// A url that is unique within a test run.
pub fn random_url() -> String {
    let n: u64 = rand::thread_rng().gen();
    format!("http://test.invalid/{n:016x}")
}

/// `count` distinct urls sharing the given prefix, in order.
pub fn url_list(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}/{i}")).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn url_list_is_ordered_and_distinct() {
        let urls = url_list("http://x", 3);
        assert_eq!(vec!["http://x/0", "http://x/1", "http://x/2"], urls);
    }

    #[test]
    fn random_urls_differ() {
        assert_ne!(random_url(), random_url());
    }
}
