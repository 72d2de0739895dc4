//! Expiry Sweeper Task
//!
//! Background task that periodically drains the head of a cache's expiry queue.

use std::sync::Weak;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::cache::{current_timestamp_ms, CacheState};

// == Sweeper Handle ==
/// Join handles of a started cache's background tasks.
#[derive(Debug)]
pub struct SweeperHandle {
    sweeper: JoinHandle<()>,
    hook: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    pub fn new(sweeper: JoinHandle<()>, hook: Option<JoinHandle<()>>) -> Self {
        Self { sweeper, hook }
    }

    /// False once the sweeper was aborted or its cache was dropped.
    pub fn is_running(&self) -> bool {
        !self.sweeper.is_finished()
    }

    /// Aborts both tasks. A tick already holding the lock runs to completion.
    pub fn stop(self) {
        self.sweeper.abort();
        if let Some(hook) = self.hook {
            hook.abort();
        }
    }
}

/// Spawns a task that sweeps the cache state every `interval`.
///
/// The task holds only a weak reference to the state and exits on its own
/// once the owning cache is dropped.
///
/// # Arguments
/// * `runtime` - Runtime to spawn onto
/// * `name` - Cache name, for log output
/// * `state` - The cache state to sweep
/// * `interval` - Time between sweep ticks
/// * `margin_ms` - Entries expiring within this window are swept early
pub fn spawn_sweeper(
    runtime: &Handle,
    name: String,
    state: Weak<Mutex<CacheState>>,
    interval: Duration,
    margin_ms: u64,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        info!(cache = %name, "Starting expiry sweeper with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let Some(state) = state.upgrade() else {
                debug!(cache = %name, "Cache dropped, stopping expiry sweeper");
                break;
            };
            let report = state.lock().sweep(current_timestamp_ms(), margin_ms);

            if report.total() > 0 {
                debug!(
                    cache = %name,
                    expired = report.expired,
                    reclaimed = report.reclaimed,
                    stale = report.stale,
                    "Expiry sweep removed entries"
                );
            } else {
                trace!(cache = %name, "Expiry sweep: nothing due");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn shared_state() -> Arc<Mutex<CacheState>> {
        Arc::new(Mutex::new(CacheState::new(300, 0)))
    }

    #[tokio::test]
    async fn test_sweeper_removes_expired_entries() {
        let state = shared_state();
        state
            .lock()
            .put("expire_soon", Arc::new("value"), 1)
            .unwrap();

        let handle = spawn_sweeper(
            &Handle::current(),
            "test".to_string(),
            Arc::downgrade(&state),
            Duration::from_millis(50),
            50,
        );

        // Wait for entry to expire and a sweep to run
        tokio::time::sleep(Duration::from_millis(1300)).await;

        {
            let guard = state.lock();
            assert_eq!(guard.indexed(), 0, "Expired entry should have been swept");
            assert_eq!(guard.stats().expirations, 1);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweeper_preserves_valid_entries() {
        let state = shared_state();
        state
            .lock()
            .put("long_lived", Arc::new("value"), 3600)
            .unwrap();

        let handle = spawn_sweeper(
            &Handle::current(),
            "test".to_string(),
            Arc::downgrade(&state),
            Duration::from_millis(50),
            50,
        );

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(state
            .lock()
            .get("long_lived", current_timestamp_ms())
            .is_some());

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweeper_exits_when_state_dropped() {
        let state = shared_state();
        let handle = spawn_sweeper(
            &Handle::current(),
            "test".to_string(),
            Arc::downgrade(&state),
            Duration::from_millis(20),
            50,
        );

        drop(state);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(handle.is_finished(), "Sweeper should stop without its cache");
    }

    #[tokio::test]
    async fn test_sweeper_handle_stop() {
        let state = shared_state();
        let sweeper = spawn_sweeper(
            &Handle::current(),
            "test".to_string(),
            Arc::downgrade(&state),
            Duration::from_millis(20),
            50,
        );
        let handle = SweeperHandle::new(sweeper, None);
        assert!(handle.is_running());

        handle.stop();
    }
}
