//! Process lifecycle: the hotkey dispatch loop and signal-driven shutdown

mod main_loop;
mod shutdown;

pub use main_loop::run_main_loop;
pub use shutdown::spawn_signal_watcher;
