//! A glossary of terms used in the courier project.
//!
//! ## Request descriptor
//! The record of a pending or in-flight request: its url, fetch options, and three independent
//! callback slots. The completion callback receives the final result. The pre-process hook may
//! rewrite the body before delivery. The custom executor, when present, does the work in place
//! of the fetcher. See [RequestDescriptor](crate::RequestDescriptor).
//!
//! ## Permit
//! A counting admission token. A worker holds one permit from the moment it is dispatched until
//! it has handed off its result, so the permit capacity bounds how many workers run at once.
//!
//! ## Submission queue
//! The bounded queue of request descriptors waiting for a permit. It rejects a submission when it
//! is full, or when a request for the same url is already waiting.
//!
//! ## Dispatch step (tick)
//! The control step that moves the head of the submission queue onto a worker. If no permit is
//! available the head stays where it is and its attempt count goes up. Once the count passes the
//! configured limit the head is dropped and its callback receives a synthetic failure.
//!
//! ## Worker
//! A transient task performing one request's external call and pushing the result onto the
//! completion queue.
//!
//! ## Response envelope
//! A completed result (status code and body) together with the completion callback it is owed
//! to. See [ResponseEnvelope](crate::ResponseEnvelope).
//!
//! ## Completion queue
//! The bounded queue of response envelopes, in the order workers finished.
//!
//! ## Drain
//! The step that pops every envelope from the completion queue and invokes its callback on the
//! calling context. Callbacks never run on a worker.
//!
//! ## Synthetic failure
//! A result produced by the dispatcher rather than the network, delivered with status code
//! [DISPATCH_FAILED](crate::status::DISPATCH_FAILED) when a request could not be admitted, its
//! worker could not be started, or its worker panicked.
