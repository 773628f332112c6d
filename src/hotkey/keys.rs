//! Hotkey binding definitions
//!
//! Virtual-key codes and modifier masks use the Win32 numbering, which the
//! other hotkey sources adopt as a neutral encoding.

/// Modifier mask for a hotkey registration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers(u32);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    /// Alt key modifier flag
    pub const ALT: Modifiers = Modifiers(0x0001);
    /// Control key modifier flag
    pub const CONTROL: Modifiers = Modifiers(0x0002);
    /// Shift key modifier flag
    pub const SHIFT: Modifiers = Modifiers(0x0004);
    /// Windows/Super key modifier flag
    pub const WIN: Modifiers = Modifiers(0x0008);

    #[cfg(any(windows, test))]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[cfg(test)]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    pub const fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = [
            (Modifiers::CONTROL, "Ctrl"),
            (Modifiers::ALT, "Alt"),
            (Modifiers::SHIFT, "Shift"),
            (Modifiers::WIN, "Win"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    f.write_str("+")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Virtual-key codes for the numeric keypad
pub mod vk {
    pub const NUMPAD0: u32 = 0x60;
    pub const NUMPAD1: u32 = 0x61;
    pub const NUMPAD2: u32 = 0x62;
    pub const NUMPAD3: u32 = 0x63;
    pub const NUMPAD4: u32 = 0x64;
    pub const NUMPAD5: u32 = 0x65;
}

/// Id of the hotkey that shuts the relay down
pub const QUIT_HOTKEY_ID: i32 = 32;

/// A system-wide key combination registered under an id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyBinding {
    /// Id unique within the process
    pub id: i32,
    /// Virtual-key code
    pub key: u32,
    /// Required modifiers
    pub modifiers: Modifiers,
}

impl HotkeyBinding {
    pub const fn new(id: i32, key: u32, modifiers: Modifiers) -> Self {
        Self { id, key, modifiers }
    }
}

impl std::fmt::Display for HotkeyBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match self.key {
            vk::NUMPAD0..=vk::NUMPAD5 => format!("Numpad{}", self.key - vk::NUMPAD0),
            other => format!("0x{:02X}", other),
        };
        if self.modifiers.is_empty() {
            write!(f, "{}", key)
        } else {
            write!(f, "{}+{}", self.modifiers, key)
        }
    }
}

/// Numpad 1-5 vote under ids 1-5, Win+Numpad0 quits
pub fn default_bindings() -> Vec<HotkeyBinding> {
    vec![
        HotkeyBinding::new(1, vk::NUMPAD1, Modifiers::NONE),
        HotkeyBinding::new(2, vk::NUMPAD2, Modifiers::NONE),
        HotkeyBinding::new(3, vk::NUMPAD3, Modifiers::NONE),
        HotkeyBinding::new(4, vk::NUMPAD4, Modifiers::NONE),
        HotkeyBinding::new(5, vk::NUMPAD5, Modifiers::NONE),
        HotkeyBinding::new(QUIT_HOTKEY_ID, vk::NUMPAD0, Modifiers::WIN),
    ]
}
