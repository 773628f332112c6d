//! Global hotkeys through the Win32 thread message queue
//!
//! Hotkeys are registered without a window, so `WM_HOTKEY` lands in the
//! message queue of the thread that created the source. That thread must be
//! the one calling `next_message`.

use tracing::error;
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    RegisterHotKey, UnregisterHotKey, HOT_KEY_MODIFIERS,
};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, PostThreadMessageW, TranslateMessage, MSG, WM_HOTKEY, WM_QUIT,
};

use super::keys::HotkeyBinding;
use super::source::{HotkeyError, HotkeySource, OsMessage, QuitHandle};

/// Hotkey source backed by `RegisterHotKey` and `GetMessageW`
pub struct Win32Source {
    thread_id: u32,
    last: MSG,
}

impl Win32Source {
    pub fn new() -> Self {
        Self {
            thread_id: unsafe { GetCurrentThreadId() },
            last: MSG::default(),
        }
    }
}

impl Default for Win32Source {
    fn default() -> Self {
        Self::new()
    }
}

impl HotkeySource for Win32Source {
    fn register(&mut self, binding: &HotkeyBinding) -> Result<(), HotkeyError> {
        unsafe {
            RegisterHotKey(
                HWND::default(),
                binding.id,
                HOT_KEY_MODIFIERS(binding.modifiers.bits()),
                binding.key,
            )
        }
        .map_err(|e| HotkeyError::Register {
            id: binding.id,
            reason: e.to_string(),
        })
    }

    fn unregister(&mut self, id: i32) -> Result<(), HotkeyError> {
        unsafe { UnregisterHotKey(HWND::default(), id) }.map_err(|e| HotkeyError::Unregister {
            id,
            reason: e.to_string(),
        })
    }

    fn next_message(&mut self) -> OsMessage {
        let ret = unsafe { GetMessageW(&mut self.last, HWND::default(), 0, 0) };
        match ret.0 {
            0 => OsMessage::Quit,
            -1 => {
                error!("GetMessageW failed, leaving message loop");
                OsMessage::Quit
            }
            _ if self.last.message == WM_HOTKEY => OsMessage::Hotkey(self.last.wParam.0 as i32),
            _ => OsMessage::Other(self.last.message),
        }
    }

    fn pass_through(&mut self, _message: &OsMessage) {
        unsafe {
            let _ = TranslateMessage(&self.last);
            DispatchMessageW(&self.last);
        }
    }

    fn quit_handle(&self) -> QuitHandle {
        let thread_id = self.thread_id;
        QuitHandle::new(move || {
            if let Err(e) = unsafe { PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) } {
                error!(?e, "failed to post quit message");
            }
        })
    }
}
