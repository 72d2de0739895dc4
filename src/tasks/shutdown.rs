//! Shutdown Hook Task
//!
//! Best-effort process hook: on Ctrl+C the cache is emptied and its sweeper
//! stopped, so nothing is left ticking while the process winds down.
//!
//! Listening for Ctrl+C replaces the default SIGINT disposition for the rest
//! of the process, so the hook is only spawned when the config opts in.

use std::sync::Weak;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::warn;

use crate::cache::CacheState;

/// Spawns a task that waits for Ctrl+C, then clears `state` and aborts the sweeper.
pub fn spawn_shutdown_hook(
    runtime: &Handle,
    name: String,
    state: Weak<Mutex<CacheState>>,
    sweeper: AbortHandle,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(cache = %name, "Could not install Ctrl+C handler: {}", err);
            return;
        }

        warn!(cache = %name, "Received Ctrl+C, shutting cache down");
        sweeper.abort();
        if let Some(state) = state.upgrade() {
            state.lock().clear();
        }
    })
}
