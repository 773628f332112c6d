//! Blocking source of OS hotkey notifications

use std::sync::Arc;

use super::keys::HotkeyBinding;

/// One message pulled from the OS notification stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsMessage {
    /// A registered hotkey fired
    Hotkey(i32),
    /// The message loop was asked to quit
    Quit,
    /// Anything else, handed back for default processing
    Other(u32),
}

/// Errors that can occur while registering hotkeys
#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    #[cfg(any(windows, test))]
    #[error("unable to register hotkey id {id}: {reason}")]
    Register { id: i32, reason: String },

    #[error("hotkey id {0} is already registered")]
    AlreadyRegistered(i32),

    #[error("hotkey id {0} is not registered")]
    NotRegistered(i32),

    #[cfg(windows)]
    #[error("unable to unregister hotkey id {id}: {reason}")]
    Unregister { id: i32, reason: String },

    #[error("failed to spawn input thread: {0}")]
    ThreadSpawn(String),
}

/// Posts a quit notification into a source from any thread
#[derive(Clone)]
pub struct QuitHandle(Arc<dyn Fn() + Send + Sync>);

impl QuitHandle {
    pub fn new(post: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(post))
    }

    /// Ask the owning source to deliver [`OsMessage::Quit`]
    pub fn request_quit(&self) {
        (self.0)()
    }
}

impl std::fmt::Debug for QuitHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("QuitHandle")
    }
}

/// System-wide hotkey facility
///
/// Registration is scoped to the thread that owns the source, and
/// `next_message` blocks that thread until the OS has something to say.
pub trait HotkeySource {
    /// Register `binding` under its id
    fn register(&mut self, binding: &HotkeyBinding) -> Result<(), HotkeyError>;

    /// Release a previously registered id
    fn unregister(&mut self, id: i32) -> Result<(), HotkeyError>;

    /// Block until the next message arrives
    fn next_message(&mut self) -> OsMessage;

    /// Default processing for messages the relay does not handle
    fn pass_through(&mut self, message: &OsMessage);

    /// Handle for waking the loop with a quit message from another thread
    fn quit_handle(&self) -> QuitHandle;
}
