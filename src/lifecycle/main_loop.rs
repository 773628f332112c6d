//! Hotkey dispatch loop and ordered shutdown
//!
//! Registers the bindings, blocks on the hotkey source and dispatches fired
//! ids until a quit hotkey or an OS quit message arrives. Cleanup always
//! runs in the same order: unregister every hotkey, then stop the chat
//! worker and wait for it to flush the leave sequence.

use std::io::{Read, Write};

use tracing::{debug, error, info, warn};

use crate::hotkey::{Dispatch, HotkeyBinding, HotkeyDispatcher, HotkeySource, OsMessage};
use crate::irc::{ChatClient, ChatError, ChatWorker};

/// Why the dispatch loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The quit hotkey fired
    QuitHotkey,
    /// The OS (or a signal) posted a quit message
    OsQuit,
}

/// Result of a finished main loop
pub struct Shutdown<T> {
    pub exit: LoopExit,
    /// The chat client after its leave sequence, ready to be closed
    pub client: Result<ChatClient<T>, ChatError>,
}

/// Unregisters every id it holds when dropped, including during unwinding
struct Registrations<'a, S: HotkeySource> {
    source: &'a mut S,
    ids: Vec<i32>,
}

impl<'a, S: HotkeySource> Registrations<'a, S> {
    /// Register each binding, skipping the ones the OS refuses
    fn register_all(source: &'a mut S, bindings: &[HotkeyBinding]) -> Self {
        let mut ids = Vec::with_capacity(bindings.len());
        for binding in bindings {
            info!(id = binding.id, key = %binding, "registering hotkey");
            match source.register(binding) {
                Ok(()) => ids.push(binding.id),
                Err(e) => error!(id = binding.id, %e, "unable to register hotkey"),
            }
        }
        Self { source, ids }
    }
}

impl<S: HotkeySource> Drop for Registrations<'_, S> {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            debug!(id, "unregistering hotkey");
            if let Err(e) = self.source.unregister(id) {
                warn!(id, %e, "failed to unregister hotkey");
            }
        }
    }
}

/// Run the dispatch loop to completion and shut the chat worker down
///
/// The worker is stopped only after every hotkey has been unregistered. If
/// the loop unwinds, the registrations and the worker are still released in
/// that order by their destructors.
pub fn run_main_loop<S, T>(
    source: &mut S,
    bindings: &[HotkeyBinding],
    dispatcher: &HotkeyDispatcher,
    mut chat: ChatWorker<T>,
) -> Shutdown<T>
where
    S: HotkeySource,
    T: Read + Write + Send + 'static,
{
    let exit = {
        let mut registrations = Registrations::register_all(source, bindings);
        info!(registered = registrations.ids.len(), "waiting for hotkeys");
        wait_for_quit(&mut registrations, dispatcher)
    };
    info!(?exit, "hotkeys unregistered");

    Shutdown {
        exit,
        client: chat.stop(),
    }
}

fn wait_for_quit<S: HotkeySource>(
    registrations: &mut Registrations<'_, S>,
    dispatcher: &HotkeyDispatcher,
) -> LoopExit {
    loop {
        match registrations.source.next_message() {
            OsMessage::Hotkey(id) => {
                if dispatcher.dispatch(id) == Dispatch::Shutdown {
                    return LoopExit::QuitHotkey;
                }
            }
            OsMessage::Quit => return LoopExit::OsQuit,
            message @ OsMessage::Other(_) => registrations.source.pass_through(&message),
        }
    }
}
