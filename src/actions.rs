//! Window actions applied to resolved handles
//!
//! The resolver only queries; this module is the collaborator that
//! actually minimizes or restores the returned windows.

use tracing::debug;

use crate::resolver::WindowHandle;

/// Action applied to a process's top-level windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    Minimize,
    Restore,
}

impl std::fmt::Display for WindowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowAction::Minimize => write!(f, "minimize"),
            WindowAction::Restore => write!(f, "restore"),
        }
    }
}

/// Apply the action to every handle, returning the number acted on
#[cfg(windows)]
pub fn apply(action: WindowAction, handles: &[WindowHandle]) -> usize {
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::WindowsAndMessaging::{ShowWindow, SW_MINIMIZE, SW_RESTORE};

    let command = match action {
        WindowAction::Minimize => SW_MINIMIZE,
        WindowAction::Restore => SW_RESTORE,
    };

    for handle in handles {
        let hwnd = HWND(handle.0 as *mut core::ffi::c_void);
        // Return value is the previous visibility state, not success
        let _ = unsafe { ShowWindow(hwnd, command) };
    }

    debug!(%action, count = handles.len(), "applied window action");
    handles.len()
}

#[cfg(not(windows))]
pub fn apply(action: WindowAction, handles: &[WindowHandle]) -> usize {
    debug!(%action, count = handles.len(), "window actions unsupported on this platform");
    0
}
