//! # OS shutdown signals.
//!
//! [`wait_for_shutdown_signal`] resolves with the name of the first
//! termination signal the process receives. Used by
//! [`Service::poweroff_on_signal`](crate::Service::poweroff_on_signal).
//!
//! - **unix**: `SIGINT`, `SIGTERM`, `SIGQUIT`
//! - **elsewhere**: Ctrl-C

use std::io;

/// Waits for a termination signal and returns its name.
///
/// Each call installs fresh listeners, so it can be awaited again to catch a
/// second signal.
#[cfg(unix)]
pub(crate) async fn wait_for_shutdown_signal() -> io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    let name = tokio::select! {
        _ = sigint.recv() => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
        _ = sigquit.recv() => "SIGQUIT",
    };
    Ok(name)
}

/// Waits for Ctrl-C and returns its name.
#[cfg(not(unix))]
pub(crate) async fn wait_for_shutdown_signal() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}
