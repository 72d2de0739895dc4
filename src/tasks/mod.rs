//! Background Tasks Module
//!
//! Tasks a cache runs while it is started.
//!
//! # Tasks
//! - Expiry sweeper: drains due, reclaimed and stale entries on a fixed period
//! - Shutdown hook: shuts the cache down when the process receives Ctrl+C

mod shutdown;
mod sweeper;

pub use shutdown::spawn_shutdown_hook;
pub use sweeper::{spawn_sweeper, SweeperHandle};
