//! Background worker that owns the chat connection
//!
//! Runs on a dedicated thread. Each iteration sleeps for one tick, answers a
//! keepalive ping when one is due and relays at most one queued vote. The
//! stop flag is observed at the top of every iteration, after which the
//! worker flushes the leave sequence and hands the client back.

use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::config::ClientTiming;
use crate::queue::VoteReceiver;

use super::client::{ChatClient, ChatError};

/// Handle to the running chat worker thread
pub struct ChatWorker<T> {
    stop: Arc<AtomicBool>,
    done_rx: mpsc::Receiver<()>,
    handle: Option<JoinHandle<ChatClient<T>>>,
    stop_timeout: Duration,
}

impl<T> ChatWorker<T>
where
    T: Read + Write + Send + 'static,
{
    /// Move the client onto its own thread and start relaying votes
    pub fn spawn(
        client: ChatClient<T>,
        queue: VoteReceiver,
        timing: ClientTiming,
    ) -> Result<Self, ChatError> {
        let stop = Arc::new(AtomicBool::new(false));
        let (done_tx, done_rx) = mpsc::sync_channel(1);

        let stop_flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("twitch-chat".to_string())
            .spawn(move || {
                info!(channel = %client.channel(), "chat worker thread started");
                let client = run(client, queue, &stop_flag, timing.tick);
                let _ = done_tx.send(());
                info!("chat worker thread stopped");
                client
            })
            .map_err(|e| ChatError::ThreadSpawn(e.to_string()))?;

        Ok(Self {
            stop,
            done_rx,
            handle: Some(handle),
            stop_timeout: timing.stop_timeout,
        })
    }
}

impl<T> ChatWorker<T> {
    /// Signal the worker to stop and wait for it to leave the channel
    ///
    /// Returns the client so the caller can release the transport. The wait
    /// is bounded by the configured stop timeout.
    pub fn stop(&mut self) -> Result<ChatClient<T>, ChatError> {
        let handle = self.handle.take().ok_or(ChatError::NotRunning)?;

        info!("stopping chat worker");
        self.stop.store(true, Ordering::SeqCst);

        match self.done_rx.recv_timeout(self.stop_timeout) {
            // A disconnected channel means the thread ended without
            // signalling, i.e. it panicked; join reports that.
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
            Err(RecvTimeoutError::Timeout) => {
                error!(timeout = ?self.stop_timeout, "chat worker did not stop in time");
                return Err(ChatError::StopTimeout(self.stop_timeout));
            }
        }

        handle.join().map_err(|_| ChatError::WorkerPanicked)
    }

    /// Check if the worker thread is still running
    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<T> Drop for ChatWorker<T> {
    fn drop(&mut self) {
        if self.handle.is_some() {
            if let Err(e) = self.stop() {
                error!(%e, "chat worker shutdown on drop failed");
            }
        }
    }
}

/// Worker loop body, returns the client once the leave sequence is sent
fn run<T: Read + Write>(
    mut client: ChatClient<T>,
    mut queue: VoteReceiver,
    stop: &AtomicBool,
    tick: Duration,
) -> ChatClient<T> {
    while !stop.load(Ordering::SeqCst) {
        thread::sleep(tick);
        client.poll(&mut queue, Instant::now());
    }

    client.shutdown(&mut queue);
    client
}
