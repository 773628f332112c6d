//! Terminal-driven hotkey source for platforms without global hotkeys
//!
//! Each stdin line is one notification: a registered hotkey id fires that
//! hotkey, `q`/`quit` or end of input posts quit, and anything else is an
//! opaque message that is passed straight through.

use std::collections::HashMap;
use std::io::BufRead;
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::keys::HotkeyBinding;
use super::source::{HotkeyError, HotkeySource, OsMessage, QuitHandle};

/// Message code reported for lines that are neither ids nor quit
const OPAQUE_MESSAGE: u32 = 0;

/// Hotkey source fed by lines of text
pub struct ConsoleSource {
    registered: HashMap<i32, HotkeyBinding>,
    tx: mpsc::UnboundedSender<OsMessage>,
    rx: mpsc::UnboundedReceiver<OsMessage>,
}

impl ConsoleSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            registered: HashMap::new(),
            tx,
            rx,
        }
    }

    /// Feed stdin into the source from a dedicated thread
    pub fn spawn_stdin_reader(&self) -> Result<(), HotkeyError> {
        let tx = self.tx.clone();
        thread::Builder::new()
            .name("console-hotkeys".to_string())
            .spawn(move || {
                info!("type a hotkey id and press enter, q to quit");
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    let Ok(line) = line else { break };
                    if tx.send(parse_line(&line)).is_err() {
                        return;
                    }
                }
                debug!("stdin closed");
                let _ = tx.send(OsMessage::Quit);
            })
            .map_err(|e| HotkeyError::ThreadSpawn(e.to_string()))?;
        Ok(())
    }

    /// Inject a message as if it came from the terminal
    #[cfg(test)]
    pub fn post(&self, message: OsMessage) {
        let _ = self.tx.send(message);
    }

    #[cfg(test)]
    pub fn is_registered(&self, id: i32) -> bool {
        self.registered.contains_key(&id)
    }
}

impl Default for ConsoleSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HotkeySource for ConsoleSource {
    fn register(&mut self, binding: &HotkeyBinding) -> Result<(), HotkeyError> {
        if self.registered.contains_key(&binding.id) {
            return Err(HotkeyError::AlreadyRegistered(binding.id));
        }
        self.registered.insert(binding.id, *binding);
        Ok(())
    }

    fn unregister(&mut self, id: i32) -> Result<(), HotkeyError> {
        self.registered
            .remove(&id)
            .map(|_| ())
            .ok_or(HotkeyError::NotRegistered(id))
    }

    fn next_message(&mut self) -> OsMessage {
        // The source holds a sender itself, so the channel never closes
        let message = self.rx.blocking_recv().unwrap_or(OsMessage::Quit);
        match message {
            OsMessage::Hotkey(id) if !self.registered.contains_key(&id) => {
                debug!(id, "input does not match a registered hotkey");
                OsMessage::Other(OPAQUE_MESSAGE)
            }
            other => other,
        }
    }

    fn pass_through(&mut self, message: &OsMessage) {
        debug!(?message, "ignoring console input");
    }

    fn quit_handle(&self) -> QuitHandle {
        let tx = self.tx.clone();
        QuitHandle::new(move || {
            if tx.send(OsMessage::Quit).is_err() {
                warn!("console source already gone");
            }
        })
    }
}

fn parse_line(line: &str) -> OsMessage {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return OsMessage::Quit;
    }
    match line.parse::<i32>() {
        Ok(id) => OsMessage::Hotkey(id),
        Err(_) => OsMessage::Other(OPAQUE_MESSAGE),
    }
}

#[cfg(test)]
mod tests {
    use super::super::keys::{vk, Modifiers};
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("2"), OsMessage::Hotkey(2));
        assert_eq!(parse_line("  32 \n"), OsMessage::Hotkey(32));
        assert_eq!(parse_line("q"), OsMessage::Quit);
        assert_eq!(parse_line("QUIT"), OsMessage::Quit);
        assert_eq!(parse_line("hello"), OsMessage::Other(OPAQUE_MESSAGE));
        assert_eq!(parse_line(""), OsMessage::Other(OPAQUE_MESSAGE));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut source = ConsoleSource::new();
        let binding = HotkeyBinding::new(1, vk::NUMPAD1, Modifiers::NONE);

        source.register(&binding).unwrap();
        assert!(matches!(
            source.register(&binding),
            Err(HotkeyError::AlreadyRegistered(1))
        ));
    }

    #[test]
    fn test_unregister() {
        let mut source = ConsoleSource::new();
        source
            .register(&HotkeyBinding::new(1, vk::NUMPAD1, Modifiers::NONE))
            .unwrap();

        source.unregister(1).unwrap();
        assert!(!source.is_registered(1));
        assert!(matches!(
            source.unregister(1),
            Err(HotkeyError::NotRegistered(1))
        ));
    }

    #[test]
    fn test_only_registered_ids_fire() {
        let mut source = ConsoleSource::new();
        source
            .register(&HotkeyBinding::new(2, vk::NUMPAD2, Modifiers::NONE))
            .unwrap();

        source.post(OsMessage::Hotkey(2));
        source.post(OsMessage::Hotkey(3));
        assert_eq!(source.next_message(), OsMessage::Hotkey(2));
        assert_eq!(source.next_message(), OsMessage::Other(OPAQUE_MESSAGE));
    }

    #[test]
    fn test_quit_handle_wakes_source() {
        let mut source = ConsoleSource::new();
        let quit = source.quit_handle();

        let poster = thread::spawn(move || quit.request_quit());
        poster.join().unwrap();
        assert_eq!(source.next_message(), OsMessage::Quit);
    }
}
