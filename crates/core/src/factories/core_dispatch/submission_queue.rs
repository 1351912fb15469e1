use courier_api::RequestDescriptor;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Why a submission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Rejected {
    /// The queue is at capacity.
    Full,
    /// A request for the same url is already queued.
    Duplicate,
}

impl std::fmt::Display for Rejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => f.write_str("submission queue full"),
            Self::Duplicate => f.write_str("request already in queue"),
        }
    }
}

/// Bounded FIFO of pending requests, unique by url.
///
/// Every operation holds the lock for its whole duration, so the duplicate
/// scan never observes a partially modified queue.
#[derive(Debug)]
pub(super) struct SubmissionQueue {
    queue: Mutex<VecDeque<RequestDescriptor>>,
    capacity: usize,
}

impl SubmissionQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append to the tail. Returns the queue length after insertion.
    ///
    /// A rejected request is dropped here without its callback running.
    pub fn submit(
        &self,
        request: RequestDescriptor,
    ) -> Result<usize, Rejected> {
        let mut queue = self.queue.lock().unwrap();
        if queue.len() >= self.capacity {
            return Err(Rejected::Full);
        }
        if queue.iter().any(|queued| queued.url == request.url) {
            return Err(Rejected::Duplicate);
        }
        queue.push_back(request);
        Ok(queue.len())
    }

    /// Remove and return the head.
    pub fn pop(&self) -> Option<RequestDescriptor> {
        self.queue.lock().unwrap().pop_front()
    }

    /// Count a failed permit acquisition against the head. If its count now
    /// exceeds `max_attempts` the head is removed and returned, otherwise it
    /// stays in place.
    pub fn record_denied(
        &self,
        max_attempts: u32,
    ) -> Option<RequestDescriptor> {
        let mut queue = self.queue.lock().unwrap();
        let head = queue.front_mut()?;
        head.retry_count += 1;
        if head.retry_count > max_attempts {
            queue.pop_front()
        } else {
            tracing::trace!(
                url = %head.url,
                attempt = head.retry_count,
                "permit denied, request stays at the head of the queue"
            );
            None
        }
    }

    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().unwrap().is_empty()
    }

    /// Queued urls, head first.
    pub fn urls(&self) -> Vec<String> {
        self.queue
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use courier_test_utils::url::url_list;

    fn req(url: &str) -> RequestDescriptor {
        RequestDescriptor::get(url, |_, _| {})
    }

    #[test]
    fn fifo_order() {
        let queue = SubmissionQueue::new(4);
        for url in url_list("http://x", 3) {
            queue.submit(req(&url)).unwrap();
        }
        assert_eq!("http://x/0", queue.pop().unwrap().url);
        assert_eq!("http://x/1", queue.pop().unwrap().url);
        assert_eq!("http://x/2", queue.pop().unwrap().url);
        assert!(queue.pop().is_none());
    }

    #[test]
    fn duplicate_rejected_without_reordering() {
        let queue = SubmissionQueue::new(4);
        for url in url_list("http://x", 3) {
            queue.submit(req(&url)).unwrap();
        }
        assert_eq!(Err(Rejected::Duplicate), queue.submit(req("http://x/1")));
        assert_eq!(url_list("http://x", 3), queue.urls());
    }

    #[test]
    fn full_rejected_without_mutation() {
        let queue = SubmissionQueue::new(2);
        queue.submit(req("http://x/a")).unwrap();
        queue.submit(req("http://x/b")).unwrap();
        assert_eq!(Err(Rejected::Full), queue.submit(req("http://x/c")));
        assert_eq!(vec!["http://x/a", "http://x/b"], queue.urls());
    }

    #[test]
    fn url_can_be_queued_again_after_pop() {
        let queue = SubmissionQueue::new(2);
        queue.submit(req("http://x/dup")).unwrap();
        queue.pop().unwrap();
        assert_eq!(Ok(1), queue.submit(req("http://x/dup")));
    }

    #[test]
    fn rejected_callback_is_not_invoked() {
        let queue = SubmissionQueue::new(1);
        queue.submit(req("http://x/a")).unwrap();
        let rejected = RequestDescriptor::get("http://x/a", |_, _| {
            panic!("callback of a rejected request must not run")
        });
        assert!(queue.submit(rejected).is_err());
    }

    #[test]
    fn head_dropped_once_attempts_exceeded() {
        let queue = SubmissionQueue::new(2);
        queue.submit(req("http://x/a")).unwrap();
        queue.submit(req("http://x/b")).unwrap();

        for _ in 0..5 {
            assert!(queue.record_denied(5).is_none());
        }
        let dropped = queue.record_denied(5).unwrap();
        assert_eq!("http://x/a", dropped.url);
        assert_eq!(6, dropped.retry_count);
        assert_eq!(vec!["http://x/b"], queue.urls());
    }

    #[test]
    fn denied_on_empty_queue_is_noop() {
        let queue = SubmissionQueue::new(1);
        assert!(queue.record_denied(0).is_none());
        assert!(queue.is_empty());
        assert_eq!(0, queue.len());
    }
}
