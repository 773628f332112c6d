//! twitch-hotkey-vote: relay global hotkey presses to Twitch chat
//!
//! Two threads share a single vote queue:
//! - the main thread registers the hotkeys and blocks on the OS message
//!   stream, turning each vote hotkey into a queued token
//! - the chat worker owns the IRC socket, answers keepalive pings and sends
//!   queued tokens to the channel
//!
//! Shutdown (quit hotkey, OS quit or SIGINT/SIGTERM) unregisters the hotkeys
//! first, then waits for the worker to leave the channel.

mod config;
mod hotkey;
mod irc;
mod lifecycle;
mod queue;

use std::net::Shutdown;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{ClientTiming, Config};
use crate::hotkey::{default_bindings, HotkeyDispatcher, HotkeySource};
use crate::irc::ChatWorker;
use crate::queue::vote_queue;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "twitch-hotkey-vote starting"
    );

    let config = Config::load().context("no twitch OAuth token provided")?;
    info!(?config, "configuration loaded");

    let timing = ClientTiming::default();
    let (vote_tx, vote_rx) = vote_queue();

    let client = irc::connect(&config, timing.ping_interval)
        .context("failed to connect to twitch chat")?;
    let chat = ChatWorker::spawn(client, vote_rx, timing)?;

    // Hotkeys are scoped to the thread that registers them
    let mut source = hotkey::platform_source()?;
    if let Err(e) = lifecycle::spawn_signal_watcher(source.quit_handle()) {
        warn!(?e, "continuing without signal handling");
    }

    let dispatcher = HotkeyDispatcher::new(vote_tx);
    let shutdown = lifecycle::run_main_loop(&mut source, &default_bindings(), &dispatcher, chat);
    info!(exit = ?shutdown.exit, "main loop exited");

    match shutdown.client {
        Ok(client) => {
            info!(state = %client.state(), "chat client finished");
            if let Err(e) = client.into_transport().shutdown(Shutdown::Both) {
                debug!(?e, "socket already closed");
            }
        }
        Err(e) => error!(%e, "chat worker did not shut down cleanly"),
    }

    info!("twitch-hotkey-vote stopped");

    Ok(())
}
