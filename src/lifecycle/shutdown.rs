//! Signal handling for graceful shutdown
//!
//! Signals are turned into a quit message for the hotkey source, so a
//! Ctrl-C takes the same cleanup path as the quit hotkey.

use std::thread;

use tracing::{debug, info};

use crate::hotkey::QuitHandle;

/// Handles shutdown signals (SIGTERM, SIGINT)
///
/// The OS handlers are in place as soon as [`ShutdownSignal::install`]
/// returns; signals delivered after that are buffered until `wait` runs.
pub struct ShutdownSignal {
    #[cfg(unix)]
    sigterm: tokio::signal::unix::Signal,
    #[cfg(unix)]
    sigint: tokio::signal::unix::Signal,
    #[cfg(windows)]
    ctrl_c: tokio::signal::windows::CtrlC,
}

impl ShutdownSignal {
    /// Register the handlers; must be called inside a runtime context
    #[cfg(unix)]
    pub fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            sigterm: signal(SignalKind::terminate())?,
            sigint: signal(SignalKind::interrupt())?,
        })
    }

    /// Register the handlers; must be called inside a runtime context
    #[cfg(windows)]
    pub fn install() -> std::io::Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    /// Wait for a shutdown signal
    #[cfg(unix)]
    pub async fn wait(&mut self) {
        tokio::select! {
            _ = self.sigterm.recv() => {
                debug!("received SIGTERM");
            }
            _ = self.sigint.recv() => {
                debug!("received SIGINT");
            }
        }
    }

    /// Wait for a shutdown signal
    #[cfg(windows)]
    pub async fn wait(&mut self) {
        self.ctrl_c.recv().await;
        debug!("received Ctrl-C");
    }
}

/// Watch for shutdown signals on a helper thread and post quit when one arrives
///
/// The handlers are registered before this returns, so a signal sent right
/// after startup is never lost to the default disposition.
pub fn spawn_signal_watcher(quit: QuitHandle) -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut signals = {
        let _guard = runtime.enter();
        ShutdownSignal::install()?
    };

    thread::Builder::new()
        .name("signal-watcher".to_string())
        .spawn(move || {
            runtime.block_on(signals.wait());
            info!("shutdown signal received");
            quit.request_quit();
        })?;

    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use std::process::Command;
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_signal_right_after_spawn_posts_quit() {
        let (tx, rx) = mpsc::channel();
        let quit = QuitHandle::new(move || {
            let _ = tx.send(());
        });
        spawn_signal_watcher(quit).unwrap();

        // Sent before the watcher thread has necessarily been scheduled
        let status = Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
    }
}
