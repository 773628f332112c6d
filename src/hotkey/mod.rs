//! Hotkey module for global keyboard shortcuts
//!
//! Registers the vote and quit hotkeys with the OS and maps fired ids to
//! actions. Windows uses native global hotkeys; elsewhere a console source
//! reads hotkey ids from stdin.

mod console;
mod dispatcher;
mod keys;
mod source;
#[cfg(windows)]
mod win32;

pub use console::ConsoleSource;
pub use dispatcher::{Dispatch, HotkeyDispatcher};
pub use keys::{default_bindings, HotkeyBinding};
pub use source::{HotkeyError, HotkeySource, OsMessage, QuitHandle};

#[cfg(windows)]
pub type PlatformSource = win32::Win32Source;
#[cfg(not(windows))]
pub type PlatformSource = ConsoleSource;

/// Create the hotkey source for the current platform on the calling thread
#[cfg(windows)]
pub fn platform_source() -> Result<PlatformSource, HotkeyError> {
    Ok(win32::Win32Source::new())
}

/// Create the hotkey source for the current platform on the calling thread
#[cfg(not(windows))]
pub fn platform_source() -> Result<PlatformSource, HotkeyError> {
    let source = ConsoleSource::new();
    source.spawn_stdin_reader()?;
    Ok(source)
}

#[cfg(test)]
pub(crate) use keys::QUIT_HOTKEY_ID;
