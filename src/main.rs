//! minimizerd: background daemon that minimizes/restores windows of
//! selected processes via global hotkeys
//!
//! The daemon:
//! - translates the two configured key bindings to Win32 hotkey codes
//!   and registers them on a dedicated message-pump thread
//! - on each trigger, re-resolves the visible top-level windows of the
//!   configured processes from a fresh OS snapshot
//! - applies the minimize/restore action to the resolved handles

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use minimizer_daemon::actions::{self, WindowAction};
use minimizer_daemon::config::Settings;
use minimizer_daemon::hotkey::{HotkeyEvent, HotkeyRegistry};
use minimizer_daemon::lifecycle::ShutdownSignal;
use minimizer_daemon::resolver::{self, ProcessNameSet};
use minimizer_daemon::startup;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "minimizerd starting");

    // Load settings
    let settings = Settings::load()?;
    info!(
        processes = settings.processes.len(),
        minimize = %settings.minimize_hotkey,
        restore = %settings.restore_hotkey,
        "settings loaded"
    );

    // Both directions: a disabled setting must clear a previously
    // written Run entry
    match startup::set_launch_at_startup(settings.launch_at_startup) {
        Ok(()) | Err(startup::StartupError::Unsupported) => {}
        Err(e) => warn!(%e, "failed to sync startup registration"),
    }

    // Create shutdown signal handler
    let shutdown = ShutdownSignal::new();

    // Hotkey pump thread -> main loop
    let (hotkey_tx, mut hotkey_rx) = mpsc::channel(32);
    let registry = HotkeyRegistry::new(hotkey_tx);

    match settings.bindings() {
        Ok(bindings) => match registry.start(bindings) {
            Ok(()) => info!("hotkey registry started"),
            Err(e) => {
                error!(%e, "failed to register hotkeys");
                warn!("continuing without hotkey support");
            }
        },
        Err(e) => {
            error!(%e, "invalid hotkey bindings in settings");
            warn!("continuing without hotkey support");
        }
    }

    let targets = ProcessNameSet::new(&settings.processes);

    info!("daemon initialized, entering main loop");

    loop {
        tokio::select! {
            event = hotkey_rx.recv() => {
                match event {
                    Some(event) => handle_hotkey(event, &targets),
                    None => {
                        info!("hotkey channel closed");
                        break;
                    }
                }
            }

            _ = shutdown.wait() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    // Cleanup
    info!("shutting down...");
    registry.stop();
    info!("minimizerd stopped");

    Ok(())
}

/// Resolve the configured processes and apply the triggered action.
/// An empty resolution is a legitimate no-op, not an error.
fn handle_hotkey(event: HotkeyEvent, targets: &ProcessNameSet) {
    let action = match event {
        HotkeyEvent::Minimize => WindowAction::Minimize,
        HotkeyEvent::Restore => WindowAction::Restore,
    };

    let handles = resolver::resolve(targets);
    if handles.is_empty() {
        info!(%action, "no matching windows");
        return;
    }

    let count = actions::apply(action, &handles);
    info!(%action, count, "window action applied");
}
