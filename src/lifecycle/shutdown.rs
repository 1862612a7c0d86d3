//! Signal handling for graceful shutdown

use tracing::debug;

/// Handles the shutdown signal (Ctrl-C / console close)
pub struct ShutdownSignal;

impl ShutdownSignal {
    /// Create a new shutdown signal handler
    pub fn new() -> Self {
        Self
    }

    /// Wait for a shutdown signal
    pub async fn wait(&self) {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to register Ctrl-C handler");
        debug!("received shutdown signal");
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
