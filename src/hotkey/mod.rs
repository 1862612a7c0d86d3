//! Hotkey module: key translation and global registration
//!
//! `keys` is the pure mapping from abstract key descriptors to the
//! Win32 modifier-mask/virtual-key pairs used for registration;
//! `registry` owns the live registration pair and the message pump
//! thread that receives `WM_HOTKEY`.

pub mod keys;
mod registry;

pub use keys::{Key, KeyDescriptor, Modifiers, NativeHotkeyCode};
pub use registry::{HotkeyBindings, HotkeyError, HotkeyEvent, HotkeyRegistry};
