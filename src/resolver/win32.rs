//! Win32 snapshot backends for process and window enumeration
//!
//! Both enumerations are read-only and release their OS resources
//! before returning; failures degrade to empty record lists rather
//! than errors.

use std::mem;

use tracing::warn;
use windows::Win32::Foundation::{CloseHandle, BOOL, HANDLE, HWND, LPARAM, TRUE};
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W,
    TH32CS_SNAPPROCESS,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindow, GetWindowThreadProcessId, IsWindowVisible, GW_OWNER,
};

use super::{ProcessRecord, WindowHandle, WindowRecord};

/// RAII guard for a toolhelp snapshot handle, released on all paths
struct SnapshotHandle(HANDLE);

impl Drop for SnapshotHandle {
    fn drop(&mut self) {
        if !self.0.is_invalid() {
            unsafe {
                let _ = CloseHandle(self.0);
            }
        }
    }
}

/// Enumerate all running processes from a toolhelp snapshot
pub(super) fn snapshot_processes() -> Vec<ProcessRecord> {
    // WinAPI quirk: snapshot failure is INVALID_HANDLE_VALUE, not null
    let snapshot = match unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) } {
        Ok(handle) => SnapshotHandle(handle),
        Err(e) => {
            warn!(?e, "failed to create process snapshot");
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    let mut entry = PROCESSENTRY32W {
        dwSize: mem::size_of::<PROCESSENTRY32W>() as u32,
        ..Default::default()
    };

    if unsafe { Process32FirstW(snapshot.0, &mut entry) }.is_ok() {
        loop {
            records.push(ProcessRecord {
                pid: entry.th32ProcessID,
                name: exe_name(&entry.szExeFile),
            });
            if unsafe { Process32NextW(snapshot.0, &mut entry) }.is_err() {
                break;
            }
        }
    }

    records
}

fn exe_name(buffer: &[u16]) -> String {
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}

/// Enumerate all top-level windows system-wide with the attributes the
/// filtering core needs
pub(super) fn snapshot_windows() -> Vec<WindowRecord> {
    unsafe extern "system" fn enum_proc(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let records = &mut *(lparam.0 as *mut Vec<WindowRecord>);

        let mut pid = 0u32;
        GetWindowThreadProcessId(hwnd, Some(&mut pid));

        records.push(WindowRecord {
            handle: WindowHandle(hwnd.0 as isize),
            pid,
            visible: IsWindowVisible(hwnd).as_bool(),
            // GetWindow yields the owner window, or an error when the
            // window is a genuine top-level one
            owned: GetWindow(hwnd, GW_OWNER).is_ok(),
        });
        TRUE
    }

    let mut records: Vec<WindowRecord> = Vec::new();
    if let Err(e) = unsafe {
        EnumWindows(
            Some(enum_proc),
            LPARAM(&mut records as *mut Vec<WindowRecord> as isize),
        )
    } {
        warn!(?e, "window enumeration failed");
        return Vec::new();
    }

    records
}
