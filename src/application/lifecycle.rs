//! Monitor lifecycle: the shutdown request and the loop state it drives

use tokio_util::sync::CancellationToken;

/// Running → Stopping (shutdown requested) → Stopped (loop exited)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Running,
    Stopping,
    Stopped,
}

/// The single entry point the signal layer uses to request a graceful stop.
/// Requests are observed at cycle boundaries only; in-flight calls finish first.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    token: CancellationToken,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.token.cancel();
    }

    pub fn is_requested(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once a shutdown has been requested.
    pub async fn requested(&self) {
        self.token.cancelled().await
    }
}

/// Wait for SIGINT or SIGTERM and request shutdown.
pub async fn shutdown_on_signal(handle: ShutdownHandle) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, shutting down gracefully..."),
        () = terminate => tracing::info!("Received SIGTERM, shutting down gracefully..."),
        () = handle.requested() => return,
    }
    handle.request();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_shared_between_clones() {
        let handle = ShutdownHandle::new();
        let signal_side = handle.clone();
        assert!(!handle.is_requested());
        signal_side.request();
        assert!(handle.is_requested());
    }

    #[tokio::test]
    async fn test_signal_listener_exits_when_already_requested() {
        let handle = ShutdownHandle::new();
        handle.request();
        shutdown_on_signal(handle.clone()).await;
        assert!(handle.is_requested());
    }
}
