use courier_api::ResponseEnvelope;
use std::sync::Mutex;
use tokio::sync::mpsc::{
    channel,
    error::{TryRecvError, TrySendError},
    Receiver, Sender,
};

/// Create a bounded completion queue.
pub(super) fn completion_queue(
    capacity: usize,
) -> (CompletionSender, CompletionReceiver) {
    let (tx, rx) = channel(capacity);
    (CompletionSender(tx), CompletionReceiver(Mutex::new(rx)))
}

/// Write side, one clone per worker.
#[derive(Debug, Clone)]
pub(super) struct CompletionSender(Sender<ResponseEnvelope>);

impl CompletionSender {
    /// Enqueue without waiting. On failure the envelope is handed back.
    pub fn push(
        &self,
        envelope: ResponseEnvelope,
    ) -> Result<(), TrySendError<ResponseEnvelope>> {
        self.0.try_send(envelope)
    }
}

/// Read side, owned by the dispatcher and used only by the drain step.
#[derive(Debug)]
pub(super) struct CompletionReceiver(Mutex<Receiver<ResponseEnvelope>>);

impl CompletionReceiver {
    /// Take the oldest envelope if there is one. Never waits.
    ///
    /// The lock is released before returning, so the caller may invoke the
    /// envelope's callback without holding it.
    pub fn pop(&self) -> Option<ResponseEnvelope> {
        match self.0.lock().unwrap().try_recv() {
            Ok(envelope) => Some(envelope),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::debug!("all completion senders are gone");
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}
