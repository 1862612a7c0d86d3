//! Global hotkey registry
//!
//! Owns the pair of minimize/restore hotkey registrations and the
//! dedicated Win32 message pump thread that receives `WM_HOTKEY`.
//! Registration ids never leak past this module; the registry is the
//! only registrant in the process.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use super::keys::{self, KeyDescriptor, NativeHotkeyCode};

/// Events sent from the pump thread to the main loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyEvent {
    /// The minimize hotkey fired
    Minimize,
    /// The restore hotkey fired
    Restore,
}

/// The pair of bindings managed by the registry
#[derive(Debug, Clone, Copy)]
pub struct HotkeyBindings {
    pub minimize: KeyDescriptor,
    pub restore: KeyDescriptor,
}

/// Errors that can occur while registering hotkeys
#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    #[error("hotkey registry is already running")]
    AlreadyRunning,

    #[error("minimize and restore hotkeys must be different")]
    DuplicateBinding,

    #[error("unsupported key in binding '{0}'")]
    UnsupportedKey(String),

    #[error("failed to register hotkey '{binding}' - already in use by another application?")]
    Registration { binding: String },

    #[error("failed to spawn pump thread: {0}")]
    ThreadSpawn(String),

    #[error("global hotkeys are not supported on this platform")]
    Unsupported,
}

/// Global hotkey registry holding the current registration pair
pub struct HotkeyRegistry {
    #[cfg_attr(not(windows), allow(dead_code))]
    event_tx: mpsc::Sender<HotkeyEvent>,
    running: Arc<AtomicBool>,
    #[cfg_attr(not(windows), allow(dead_code))]
    pump_thread_id: Arc<AtomicU32>,
}

impl HotkeyRegistry {
    /// Create a registry that reports fired hotkeys on `event_tx`
    pub fn new(event_tx: mpsc::Sender<HotkeyEvent>) -> Self {
        Self {
            event_tx,
            running: Arc::new(AtomicBool::new(false)),
            pump_thread_id: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Register both hotkeys and start the message pump.
    ///
    /// Validates the bindings before touching the OS: both must
    /// translate to a nonzero virtual key and must be distinct. If the
    /// second registration fails the first is rolled back so the
    /// registry never holds a half pair.
    #[cfg(windows)]
    pub fn start(&self, bindings: HotkeyBindings) -> Result<(), HotkeyError> {
        let (minimize, restore) = validate(&bindings)?;

        if self.running.swap(true, Ordering::SeqCst) {
            return Err(HotkeyError::AlreadyRunning);
        }

        let event_tx = self.event_tx.clone();
        let running = Arc::clone(&self.running);
        let pump_thread_id = Arc::clone(&self.pump_thread_id);

        // The pump thread reports its registration outcome back before
        // start() returns, so callers see RegisterHotKey failures.
        let (result_tx, result_rx) = std::sync::mpsc::channel();

        std::thread::Builder::new()
            .name("hotkey-pump".to_string())
            .spawn(move || {
                win32::run_pump(
                    bindings,
                    minimize,
                    restore,
                    event_tx,
                    running.clone(),
                    pump_thread_id,
                    result_tx,
                );
                running.store(false, Ordering::SeqCst);
            })
            .map_err(|e| HotkeyError::ThreadSpawn(e.to_string()))?;

        let result = match result_rx.recv() {
            Ok(result) => result,
            Err(_) => Err(HotkeyError::ThreadSpawn(
                "pump thread exited before registering".to_string(),
            )),
        };
        if result.is_err() {
            self.running.store(false, Ordering::SeqCst);
        }
        result
    }

    /// Global hotkey registration requires the Win32 message pump
    #[cfg(not(windows))]
    pub fn start(&self, bindings: HotkeyBindings) -> Result<(), HotkeyError> {
        validate(&bindings)?;
        Err(HotkeyError::Unsupported)
    }

    /// Unregister both hotkeys and stop the pump thread
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        #[cfg(windows)]
        win32::post_quit(self.pump_thread_id.load(Ordering::SeqCst));
    }

    /// Check if the registry currently holds registrations
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Translate both bindings and reject pairs that cannot be registered
fn validate(
    bindings: &HotkeyBindings,
) -> Result<(NativeHotkeyCode, NativeHotkeyCode), HotkeyError> {
    let minimize = keys::translate(&bindings.minimize);
    if minimize.is_unmapped() {
        return Err(HotkeyError::UnsupportedKey(bindings.minimize.to_string()));
    }

    let restore = keys::translate(&bindings.restore);
    if restore.is_unmapped() {
        return Err(HotkeyError::UnsupportedKey(bindings.restore.to_string()));
    }

    if minimize == restore {
        return Err(HotkeyError::DuplicateBinding);
    }

    Ok((minimize, restore))
}

/// Forward a fired hotkey to the main loop without blocking the pump.
///
/// The pump must stay responsive to WM_QUIT, so a stalled receiver
/// drops the event instead of parking the thread. Returns false once
/// the channel is closed and the pump should stop.
#[cfg_attr(not(windows), allow(dead_code))]
fn forward_event(event_tx: &mpsc::Sender<HotkeyEvent>, event: HotkeyEvent) -> bool {
    match event_tx.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(event)) => {
            debug!(?event, "hotkey channel full, dropping event");
            true
        }
        Err(TrySendError::Closed(_)) => {
            warn!("hotkey channel closed, stopping pump");
            false
        }
    }
}

#[cfg(windows)]
mod win32 {
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Arc;

    use tokio::sync::mpsc;
    use tracing::{debug, info, warn};
    use windows::Win32::Foundation::{LPARAM, WPARAM};
    use windows::Win32::System::Threading::GetCurrentThreadId;
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        RegisterHotKey, UnregisterHotKey, HOT_KEY_MODIFIERS,
    };
    use windows::Win32::UI::WindowsAndMessaging::{
        GetMessageW, PostThreadMessageW, MSG, WM_HOTKEY, WM_QUIT,
    };

    use super::{HotkeyBindings, HotkeyError, HotkeyEvent, NativeHotkeyCode};

    /// Registration ids, fixed because the registry owns both slots
    const MINIMIZE_ID: i32 = 1;
    const RESTORE_ID: i32 = 2;

    /// Register both hotkeys on this thread and pump messages until
    /// WM_QUIT or channel closure. Hotkeys registered with a null HWND
    /// are bound to the registering thread, so registration and the
    /// pump must share this thread.
    pub(super) fn run_pump(
        bindings: HotkeyBindings,
        minimize: NativeHotkeyCode,
        restore: NativeHotkeyCode,
        event_tx: mpsc::Sender<HotkeyEvent>,
        running: Arc<AtomicBool>,
        pump_thread_id: Arc<AtomicU32>,
        result_tx: std::sync::mpsc::Sender<Result<(), HotkeyError>>,
    ) {
        pump_thread_id.store(unsafe { GetCurrentThreadId() }, Ordering::SeqCst);

        let registered = register_pair(&bindings, minimize, restore);
        let ok = registered.is_ok();
        let _ = result_tx.send(registered);
        if !ok {
            return;
        }

        info!(
            minimize = %bindings.minimize,
            restore = %bindings.restore,
            "hotkeys registered"
        );

        let mut msg = MSG::default();
        loop {
            // GetMessage returns 0 for WM_QUIT and -1 on error
            let status = unsafe { GetMessageW(&mut msg, None, 0, 0) }.0;
            if status <= 0 {
                if status < 0 {
                    warn!("message pump error, stopping");
                }
                break;
            }

            if msg.message != WM_HOTKEY {
                continue;
            }

            let event = match msg.wParam.0 as i32 {
                MINIMIZE_ID => HotkeyEvent::Minimize,
                RESTORE_ID => HotkeyEvent::Restore,
                other => {
                    debug!(id = other, "ignoring unknown hotkey id");
                    continue;
                }
            };

            if !super::forward_event(&event_tx, event) {
                break;
            }

            if !running.load(Ordering::SeqCst) {
                break;
            }
        }

        unsafe {
            let _ = UnregisterHotKey(None, MINIMIZE_ID);
            let _ = UnregisterHotKey(None, RESTORE_ID);
        }
        info!("hotkeys unregistered, pump stopped");
    }

    fn register_pair(
        bindings: &HotkeyBindings,
        minimize: NativeHotkeyCode,
        restore: NativeHotkeyCode,
    ) -> Result<(), HotkeyError> {
        unsafe {
            RegisterHotKey(
                None,
                MINIMIZE_ID,
                HOT_KEY_MODIFIERS(minimize.modifiers),
                minimize.virtual_key,
            )
        }
        .map_err(|_| HotkeyError::Registration {
            binding: bindings.minimize.to_string(),
        })?;

        let restore_result = unsafe {
            RegisterHotKey(
                None,
                RESTORE_ID,
                HOT_KEY_MODIFIERS(restore.modifiers),
                restore.virtual_key,
            )
        };
        if restore_result.is_err() {
            // Roll back so the registry never holds a half pair
            unsafe {
                let _ = UnregisterHotKey(None, MINIMIZE_ID);
            }
            return Err(HotkeyError::Registration {
                binding: bindings.restore.to_string(),
            });
        }

        Ok(())
    }

    /// Ask the pump thread to exit its GetMessage loop
    pub(super) fn post_quit(thread_id: u32) {
        if thread_id == 0 {
            return;
        }
        if let Err(e) = unsafe { PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) } {
            warn!(?e, "failed to post quit to pump thread");
        }
    }
}
