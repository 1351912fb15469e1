//! # CoreDispatch documentation.
//!
//! CoreDispatch is a courier module for running fetch requests without
//! blocking the caller, on a bounded number of workers, with results
//! delivered back to the caller's own context.
//!
//! It consists of multiple parts:
//! - A permit pool that bounds how many workers run at once
//! - A submission queue of pending requests
//! - Workers that perform the fetch for one request each
//! - A completion queue of finished results
//! - The tick and drain steps, run periodically by the controlling context
//!
//! ### Submission queue
//!
//! - Bounded FIFO, capacity `submissionQueueCapacity` (default 20).
//! - [Dispatch::submit] refuses a request if the queue is full or a request
//!   for the same url is already queued. A refused request is dropped and
//!   its callback never runs.
//! - The duplicate check scans the whole queue under its lock, without
//!   reordering anything.
//! - Only queued requests count as duplicates. A url can be submitted again
//!   as soon as its earlier request has been dispatched.
//!
//! ### Tick
//!
//! [Dispatch::tick] performs at most one dispatch and never waits:
//!
//! - If the submission queue is empty, do nothing.
//! - Try to take a permit.
//!     - If none is free, count a failed attempt against the request at the
//!       head of the queue. Once the count exceeds `maxAdmissionAttempts`
//!       (default 5) the request is removed and its callback is invoked right
//!       away with code [DISPATCH_FAILED] and [MSG_ADMISSION_FAILED].
//!       Otherwise the request stays at the head.
//!     - If a permit was taken, pop the head and start a worker for it. If
//!       the worker cannot be started, the permit is returned and the
//!       callback is invoked right away with [DISPATCH_FAILED] and
//!       [MSG_WORKER_START_FAILED].
//!
//! A request that keeps being denied blocks every request behind it until
//! it is dropped.
//!
//! ### Workers
//!
//! - A request with a custom executor runs the executor instead of the
//!   fetch. No result is queued and the completion callback is dropped
//!   without being invoked, the executor delivers its own result.
//! - Otherwise the worker calls the [Fetcher], applies the optional
//!   pre-process hook to the code and body, and queues the result.
//!   Transport errors are forwarded with [FETCH_FAILED] and the error text.
//! - If the fetch or the pre-process hook panics, the result is
//!   [DISPATCH_FAILED] with [MSG_WORKER_PANICKED]. A panicking executor is
//!   only counted, as its callback is already gone.
//! - If the completion queue is full the result is dropped and counted.
//! - In every case the permit is returned when the worker ends.
//!
//! ### Drain
//!
//! [Dispatch::drain] pops every queued result and invokes its callback on
//! the calling task, in the order the results were queued.
//!
//! [Dispatch::submit]: courier_api::dispatch::Dispatch::submit
//! [Dispatch::tick]: courier_api::dispatch::Dispatch::tick
//! [Dispatch::drain]: courier_api::dispatch::Dispatch::drain
//! [Fetcher]: courier_api::fetch::Fetcher
//! [DISPATCH_FAILED]: courier_api::status::DISPATCH_FAILED
//! [FETCH_FAILED]: courier_api::status::FETCH_FAILED
//! [MSG_ADMISSION_FAILED]: courier_api::status::MSG_ADMISSION_FAILED
//! [MSG_WORKER_START_FAILED]: courier_api::status::MSG_WORKER_START_FAILED
//! [MSG_WORKER_PANICKED]: courier_api::status::MSG_WORKER_PANICKED
