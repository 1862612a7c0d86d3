//! Launch-at-startup registration
//!
//! Adds or removes a value under the HKCU Run key pointing at the
//! current executable.

/// Errors from startup registration
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("startup registration is not supported on this platform")]
    Unsupported,

    #[error("registry operation failed: {0}")]
    Registry(String),

    #[error("failed to determine executable path: {0}")]
    ExePath(String),
}

/// Synchronize the Run key entry with the launch-at-startup setting.
/// Disabling when no entry was ever written is a no-op, not an error.
pub fn set_launch_at_startup(enabled: bool) -> Result<(), StartupError> {
    #[cfg(windows)]
    {
        if enabled {
            win32::enable()
        } else {
            win32::disable()
        }
    }
    #[cfg(not(windows))]
    {
        let _ = enabled;
        Err(StartupError::Unsupported)
    }
}

#[cfg(windows)]
mod win32 {
    use windows::core::w;
    use windows::Win32::Foundation::ERROR_FILE_NOT_FOUND;
    use windows::Win32::System::Registry::{
        RegCloseKey, RegDeleteValueW, RegOpenKeyExW, RegSetValueExW, HKEY, HKEY_CURRENT_USER,
        KEY_SET_VALUE, REG_SZ,
    };

    use super::StartupError;

    /// RAII guard for the opened Run key
    struct RunKey(HKEY);

    impl Drop for RunKey {
        fn drop(&mut self) {
            unsafe {
                let _ = RegCloseKey(self.0);
            }
        }
    }

    fn open_run_key() -> Result<RunKey, StartupError> {
        let mut key = HKEY::default();
        unsafe {
            RegOpenKeyExW(
                HKEY_CURRENT_USER,
                w!(r"Software\Microsoft\Windows\CurrentVersion\Run"),
                0,
                KEY_SET_VALUE,
                &mut key,
            )
        }
        .ok()
        .map_err(|e| StartupError::Registry(e.to_string()))?;
        Ok(RunKey(key))
    }

    pub(super) fn enable() -> Result<(), StartupError> {
        let exe = std::env::current_exe()
            .map_err(|e| StartupError::ExePath(e.to_string()))?
            .display()
            .to_string();
        // Quoted so paths with spaces survive
        let command = format!("\"{exe}\"");

        let mut data: Vec<u16> = command.encode_utf16().collect();
        data.push(0);
        // REG_SZ data is the UTF-16 string including its terminator
        let bytes =
            unsafe { std::slice::from_raw_parts(data.as_ptr() as *const u8, data.len() * 2) };

        let key = open_run_key()?;
        unsafe { RegSetValueExW(key.0, w!("Minimizer"), 0, REG_SZ, Some(bytes)) }
            .ok()
            .map_err(|e| StartupError::Registry(e.to_string()))
    }

    pub(super) fn disable() -> Result<(), StartupError> {
        let key = open_run_key()?;
        let status = unsafe { RegDeleteValueW(key.0, w!("Minimizer")) };
        // A value that was never written is already the desired state
        if status == ERROR_FILE_NOT_FOUND {
            return Ok(());
        }
        status
            .ok()
            .map_err(|e| StartupError::Registry(e.to_string()))
    }
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;

    #[test]
    fn test_sync_covers_both_directions() {
        // Off Windows both directions surface Unsupported rather than
        // pretending to have touched the registry
        assert!(matches!(
            set_launch_at_startup(true),
            Err(StartupError::Unsupported)
        ));
        assert!(matches!(
            set_launch_at_startup(false),
            Err(StartupError::Unsupported)
        ));
    }
}
