//! Deferred file-deletion scheduler for the peerdrop inbox.
//!
//! Files in the inbox are never removed the moment they are marked: every
//! deletion is deferred by a fixed grace period so that an interrupted
//! transfer still has a chance to resume and reclaim its payload. All
//! pending deletions coalesce into a single background worker that sleeps
//! until the oldest record matures, sweeps everything that is due, retries
//! failures once per grace-period cycle, and exits when the queue drains.
//!
//! ## Architecture
//!
//! - `config`: grace-period constant and scheduler configuration
//! - `queue`: the ordered pending-deletion store
//! - `reaper`: public API (`insert`/`remove`/`shutdown`), worker loop, and
//!   the cold-start directory scan
//! - `metrics`: atomic counters for sweep activity

pub mod config;
pub mod metrics;
mod queue;
mod reaper;

pub use config::{GRACE_PERIOD, ReaperConfig};
pub use metrics::ReaperMetrics;
pub use reaper::{EventHook, FileReaper};
