//! Completed results awaiting delivery.

use crate::request::ResponseCallback;

/// Synthetic result codes produced by courier itself rather than by the
/// remote.
pub mod status {
    /// The dispatcher gave up on the request before it reached a worker.
    pub const DISPATCH_FAILED: i32 = -1;

    /// The fetcher reported a transport failure and produced no response.
    pub const FETCH_FAILED: i32 = -2;

    /// Message delivered with [DISPATCH_FAILED] when the permit could not
    /// be acquired within the attempt limit.
    pub const MSG_ADMISSION_FAILED: &str =
        "admission failed after repeated attempts";

    /// Message delivered with [DISPATCH_FAILED] when no worker could be
    /// started for the request.
    pub const MSG_WORKER_START_FAILED: &str = "worker could not be started";

    /// Message delivered with [DISPATCH_FAILED] when the worker panicked
    /// while fetching or pre-processing the result.
    pub const MSG_WORKER_PANICKED: &str = "worker panicked";
}

/// One completed result. Created by a worker, owned by the completion
/// queue until the drain step consumes it.
pub struct ResponseEnvelope {
    /// Remote status code, or one of the [status] sentinels.
    pub code: i32,
    /// Response body, or the error text.
    pub body: String,
    /// Callback copied from the originating request.
    pub on_complete: ResponseCallback,
}

impl std::fmt::Debug for ResponseEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseEnvelope")
            .field("code", &self.code)
            .field("body_len", &self.body.len())
            .finish()
    }
}

impl ResponseEnvelope {
    /// Construct a new envelope.
    pub fn new(
        code: i32,
        body: impl Into<String>,
        on_complete: ResponseCallback,
    ) -> Self {
        Self {
            code,
            body: body.into(),
            on_complete,
        }
    }

    /// Consume the envelope, invoking its callback.
    pub fn deliver(self) {
        let Self {
            code,
            body,
            on_complete,
        } = self;
        on_complete(code, &body);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn deliver_invokes_callback_with_code_and_body() {
        let seen = Arc::new(Mutex::new(None));
        let envelope = ResponseEnvelope::new(404, "not found", {
            let seen = seen.clone();
            Box::new(move |code, body| {
                *seen.lock().unwrap() = Some((code, body.to_string()));
            })
        });
        envelope.deliver();
        assert_eq!(
            Some((404, "not found".to_string())),
            *seen.lock().unwrap()
        );
    }
}
