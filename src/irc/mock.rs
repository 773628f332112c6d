//! In-memory transport for exercising the chat client without a socket

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Inner {
    inbound: VecDeque<Vec<u8>>,
    written: Vec<String>,
    events: Vec<String>,
    write_limit: Option<usize>,
    fail_writes: bool,
}

/// Cloneable handle; clones share the same buffers
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MockTransport {
    /// Queue bytes to be returned by the next read
    pub fn push_inbound(&self, bytes: &[u8]) {
        self.inner.lock().unwrap().inbound.push_back(bytes.to_vec());
    }

    pub fn pending_inbound(&self) -> usize {
        self.inner.lock().unwrap().inbound.len()
    }

    /// Every write accepted so far, one entry per write call
    pub fn written(&self) -> Vec<String> {
        self.inner.lock().unwrap().written.clone()
    }

    /// Record a non-I/O event in the same timeline as the writes
    pub fn note(&self, event: impl Into<String>) {
        self.inner.lock().unwrap().events.push(event.into());
    }

    /// Writes and noted events in the order they happened
    pub fn events(&self) -> Vec<String> {
        self.inner.lock().unwrap().events.clone()
    }

    pub fn clear_written(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.written.clear();
        inner.events.clear();
    }

    /// Accept at most `limit` bytes per write
    pub fn limit_writes(&self, limit: usize) {
        self.inner.lock().unwrap().write_limit = Some(limit);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_writes = fail;
    }
}

impl Read for MockTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut inner = self.inner.lock().unwrap();
        match inner.inbound.pop_front() {
            Some(chunk) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                Ok(n)
            }
            None => Err(io::Error::from(io::ErrorKind::WouldBlock)),
        }
    }
}

impl Write for MockTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_writes {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        let n = inner.write_limit.map_or(buf.len(), |limit| limit.min(buf.len()));
        let line = String::from_utf8_lossy(&buf[..n]).into_owned();
        inner.events.push(line.clone());
        inner.written.push(line);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
