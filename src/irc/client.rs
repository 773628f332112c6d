//! Twitch chat client over a non-blocking stream
//!
//! The client owns the transport exclusively. Steady-state I/O problems never
//! escape as errors: an empty non-blocking read is "no reply yet" and a failed
//! or short write is reported as the number of bytes actually written.

use std::io::{ErrorKind, Read, Write};
use std::net::TcpStream;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::queue::VoteReceiver;

use super::protocol::{contains_ping, Command, DISCONNECT_COMMAND};
use super::state::ConnectionState;

/// Size of a single opportunistic read
const REPLY_BUFFER_SIZE: usize = 2048;

/// Errors that can occur in the chat client and its worker
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    #[error("failed to switch socket to non-blocking mode: {0}")]
    NonBlocking(std::io::Error),

    #[error("failed to spawn chat worker thread: {0}")]
    ThreadSpawn(String),

    #[error("chat worker is not running")]
    NotRunning,

    #[error("chat worker did not stop within {0:?}")]
    StopTimeout(Duration),

    #[error("chat worker panicked")]
    WorkerPanicked,
}

/// Tracks when the socket was last checked for a keepalive ping
#[derive(Debug, Clone, Copy)]
pub struct PingTimer {
    last_check: Instant,
    interval: Duration,
}

impl PingTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            last_check: Instant::now(),
            interval,
        }
    }

    /// Whether more than one interval has passed since the last check
    pub fn is_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_check) > self.interval
    }

    pub fn reset(&mut self, now: Instant) {
        self.last_check = now;
    }
}

/// Open a TCP connection to the chat server and log in
///
/// Only failing to open the socket is fatal. Handshake lines that fail to
/// send are logged and the connection is handed back regardless.
pub fn connect(config: &Config, ping_interval: Duration) -> Result<ChatClient<TcpStream>, ChatError> {
    let addr = format!("{}:{}", config.server, config.port);
    info!(%addr, "connecting to chat server");

    let stream = TcpStream::connect(&addr).map_err(|source| ChatError::Connect {
        addr: addr.clone(),
        source,
    })?;
    stream.set_nonblocking(true).map_err(ChatError::NonBlocking)?;

    let mut client = ChatClient::new(stream, &config.channel, ping_interval);
    client.handshake(&config.token, &config.username);
    Ok(client)
}

/// Chat connection bound to a single channel
pub struct ChatClient<T> {
    transport: T,
    channel: String,
    state: ConnectionState,
    ping: PingTimer,
}

impl<T: Read + Write> ChatClient<T> {
    /// Wrap an already opened transport
    pub fn new(transport: T, channel: &str, ping_interval: Duration) -> Self {
        let mut state = ConnectionState::default();
        state.advance(ConnectionState::Connecting);

        Self {
            transport,
            channel: channel.to_string(),
            state,
            ping: PingTimer::new(ping_interval),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Send PASS, NICK and JOIN in that order
    pub fn handshake(&mut self, token: &str, nickname: &str) {
        for command in [
            Command::Pass(token.to_string()),
            Command::Nick(nickname.to_string()),
            Command::Join(self.channel.clone()),
        ] {
            if self.send_command(&command) == 0 {
                warn!(command = %command.redacted(), "handshake line not sent");
            }
        }
        self.state.advance(ConnectionState::Authenticated);
    }

    /// Write one command, returning the number of bytes the transport accepted
    ///
    /// A short write is logged and otherwise treated as complete.
    pub fn send_command(&mut self, command: &Command) -> usize {
        if !self.state.can_send() {
            warn!(state = %self.state, command = %command.redacted(), "not connected, dropping line");
            return 0;
        }

        let line = command.to_line();
        let requested = line.len();
        match self.transport.write(line.as_bytes()) {
            Ok(sent) => {
                if sent < requested {
                    warn!(sent, requested, "short write, remainder dropped");
                }
                info!(command = %command.redacted(), bytes = sent, "sent");
                sent
            }
            Err(e) => {
                warn!(?e, command = %command.redacted(), "send failed");
                0
            }
        }
    }

    /// Send a chat message to the joined channel
    pub fn send_message(&mut self, text: &str) -> usize {
        self.send_command(&Command::Privmsg {
            channel: self.channel.clone(),
            text: text.to_string(),
        })
    }

    /// Read whatever bytes are currently available
    ///
    /// Returns an empty buffer when nothing is pending or the read fails.
    pub fn read_reply(&mut self) -> Vec<u8> {
        let mut buf = [0u8; REPLY_BUFFER_SIZE];
        match self.transport.read(&mut buf) {
            Ok(0) => {
                debug!("transport returned end of stream");
                Vec::new()
            }
            Ok(n) => {
                debug!(reply = %String::from_utf8_lossy(&buf[..n]).trim_end(), "received");
                buf[..n].to_vec()
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::Interrupted => {
                Vec::new()
            }
            Err(e) => {
                debug!(?e, "read failed");
                Vec::new()
            }
        }
    }

    /// Check pending input for a keepalive ping and answer it
    ///
    /// Returns true if a PONG was sent.
    pub fn reply_to_ping(&mut self, now: Instant) -> bool {
        debug!("checking for ping");
        self.ping.reset(now);

        let reply = self.read_reply();
        if contains_ping(&reply) {
            self.send_command(&Command::Pong);
            return true;
        }
        false
    }

    /// One iteration of the relay: keepalive when due, then at most one vote
    pub fn poll(&mut self, queue: &mut VoteReceiver, now: Instant) {
        if self.ping.is_due(now) {
            self.reply_to_ping(now);
        }

        if let Some(vote) = queue.try_dequeue() {
            info!(%vote, "got vote");
            self.send_message(&vote);
        }
    }

    /// Flush pending votes, then leave the channel and disconnect
    pub fn shutdown(&mut self, queue: &mut VoteReceiver) {
        self.state.advance(ConnectionState::ShuttingDown);
        info!(channel = %self.channel, pending = queue.len(), "leaving channel");

        while let Some(vote) = queue.try_dequeue() {
            info!(%vote, "flushing vote before leaving");
            self.send_message(&vote);
        }

        self.send_command(&Command::Part(self.channel.clone()));
        self.send_message(DISCONNECT_COMMAND);
        self.state.advance(ConnectionState::Closed);
    }

    /// Give the transport back so the caller can close it
    pub fn into_transport(self) -> T {
        self.transport
    }
}
