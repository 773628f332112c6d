//! Outgoing vote queue shared between the hotkey dispatcher and the chat worker
//!
//! An unbounded FIFO split into a producer half (cloneable, used by hotkey
//! actions) and a single consumer half owned by the chat worker. Dequeue is a
//! non-blocking poll so the worker can keep servicing keepalive timing.

use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Create a new vote queue, returning the producer and consumer halves
pub fn vote_queue() -> (VoteSender, VoteReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (VoteSender { tx }, VoteReceiver { rx })
}

/// Producer half of the vote queue
#[derive(Debug, Clone)]
pub struct VoteSender {
    tx: mpsc::UnboundedSender<String>,
}

impl VoteSender {
    /// Append a token to the back of the queue
    ///
    /// Never blocks. If the chat worker has already gone away the token is
    /// dropped with a warning, since nothing is left to deliver it.
    pub fn enqueue(&self, token: impl Into<String>) {
        let token = token.into();
        debug!(%token, "enqueue");
        if let Err(mpsc::error::SendError(token)) = self.tx.send(token) {
            warn!(%token, "vote queue closed, dropping token");
        }
    }
}

/// Consumer half of the vote queue
#[derive(Debug)]
pub struct VoteReceiver {
    rx: mpsc::UnboundedReceiver<String>,
}

impl VoteReceiver {
    /// Pop the oldest token, or `None` if the queue is currently empty
    pub fn try_dequeue(&mut self) -> Option<String> {
        self.rx.try_recv().ok()
    }

    /// Number of tokens waiting to be sent
    pub fn len(&self) -> usize {
        self.rx.len()
    }
}
