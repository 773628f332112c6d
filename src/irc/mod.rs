//! Twitch IRC module
//!
//! Owns the single chat connection: login handshake, keepalive replies and
//! relaying queued votes from a dedicated worker thread.

mod client;
#[cfg(test)]
pub(crate) mod mock;
mod protocol;
mod state;
mod worker;

pub use client::{connect, ChatClient, ChatError};
#[cfg(test)]
pub use state::ConnectionState;
pub use worker::ChatWorker;
