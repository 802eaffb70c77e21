//! The deletion scheduler: public API, background worker, cold-start scan.
//!
//! Producers hand file names to [`FileReaper::insert`]; each name waits out
//! [`GRACE_PERIOD`](crate::GRACE_PERIOD) before the background worker
//! removes it from disk. All pending names share one worker task: the
//! insert that takes the queue from empty to non-empty spawns it, every
//! later insert relies on it, and it exits once the queue drains. Failed
//! removals are rescheduled at the back of the queue and retried once per
//! grace-period cycle, indefinitely.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use common::names;

use crate::config::{GRACE_PERIOD, ReaperConfig};
use crate::metrics::ReaperMetrics;
use crate::queue::DeleteQueue;

/// Callback invoked with a description at lifecycle points.
///
/// Intended for test observability only; emission points are `start init`,
/// `end init`, `start waitAndDelete`, `end waitAndDelete`, and
/// `deleted <name>`. The hook may run with the scheduler's internal lock
/// held and must not call back into the scheduler.
pub type EventHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Deferred file-deletion scheduler for one inbox directory.
///
/// Cheap to clone; all clones share the same queue and background tasks.
/// Must be created from within a Tokio runtime (construction spawns the
/// cold-start scan).
#[derive(Clone)]
pub struct FileReaper {
    inner: Arc<Inner>,
}

struct Inner {
    dir: PathBuf,
    events: Option<EventHook>,
    metrics: ReaperMetrics,

    queue: Mutex<DeleteQueue>,
    empty_wake: Notify,
    shutdown: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl FileReaper {
    /// Create a scheduler and start the cold-start scan of the inbox.
    pub fn new(config: ReaperConfig) -> Self {
        Self::build(config, None)
    }

    /// Like [`new`](Self::new), with an event hook for tests.
    pub fn with_events(config: ReaperConfig, events: EventHook) -> Self {
        Self::build(config, Some(events))
    }

    fn build(config: ReaperConfig, events: Option<EventHook>) -> Self {
        let (shutdown, _) = watch::channel(false);
        let reaper = Self {
            inner: Arc::new(Inner {
                dir: config.dir,
                events,
                metrics: ReaperMetrics::new(),
                queue: Mutex::new(DeleteQueue::new()),
                empty_wake: Notify::new(),
                shutdown,
                tasks: Mutex::new(Vec::new()),
            }),
        };

        let scan = tokio::spawn(run_scan(reaper.clone()));
        reaper.inner.register_task(scan);

        reaper
    }

    /// Enqueue `name` for deletion after the grace period.
    ///
    /// A no-op once shutdown has begun, and a no-op while `name` is already
    /// pending.
    pub fn insert(&self, name: &str) {
        let mut queue = self.inner.lock_queue();
        if self.inner.is_shutdown() {
            return;
        }
        let was_empty = queue.is_empty();
        if !queue.insert(name, Instant::now()) {
            return; // already queued for deletion
        }
        if was_empty {
            let handle = tokio::spawn(run_worker(Arc::clone(&self.inner), GRACE_PERIOD));
            self.inner.register_task(handle);
        }
    }

    /// Cancel the pending deletion of `name`, if any.
    ///
    /// Keeps working during and after shutdown so in-flight callers never
    /// block on teardown.
    pub fn remove(&self, name: &str) {
        let mut queue = self.inner.lock_queue();
        if queue.remove(name) && queue.is_empty() {
            // Best-effort wake so a sleeping worker can exit early instead
            // of waiting out its timer. A worker that has not parked yet
            // misses this and later sweeps an empty queue, which is fine.
            self.inner.empty_wake.notify_waiters();
        }
    }

    /// Number of deletions currently pending.
    pub fn pending(&self) -> usize {
        self.inner.lock_queue().len()
    }

    /// Scheduler activity counters.
    pub fn metrics(&self) -> ReaperMetrics {
        self.inner.metrics.clone()
    }

    /// Stop the scheduler and wait for its background tasks to exit.
    ///
    /// Call once. The shutdown flag is raised while the queue lock is held,
    /// so no new worker can be spawned afterwards; pending records stay on
    /// disk and are picked up by the next cold-start scan.
    pub async fn shutdown(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let queue = self.inner.lock_queue();
            self.inner.shutdown.send_replace(true);
            drop(queue);
            self.inner.lock_tasks().drain(..).collect()
        };

        for handle in handles {
            if let Err(err) = handle.await {
                warn!(error = %err, "background task terminated abnormally");
            }
        }
    }
}

impl Inner {
    /// One sweep pass: remove every mature record, requeue failures, and
    /// report how long the worker should sleep before the next pass (`None`
    /// means the worker is done).
    fn sweep(&self, now: Instant) -> Option<Duration> {
        let mut queue = self.lock_queue();
        self.metrics.record_sweep();

        let mut failed: Vec<String> = Vec::new();
        while let Some(record) = queue.pop_mature(now, GRACE_PERIOD) {
            match self.delete_record(&record.name) {
                Ok(()) => {
                    queue.finish(&record.name);
                    self.metrics.record_deleted();
                    debug!("removed expired inbox file");
                    self.emit(&format!("deleted {}", record.name));
                }
                Err(err) => {
                    // OS error text can embed the full path, so log the
                    // kind only.
                    warn!(error_kind = ?err.kind(), "could not delete, retrying after grace period");
                    self.metrics.record_failure();
                    failed.push(record.name);
                }
            }
        }

        // Failures are requeued after the walk so a stubborn record cannot
        // starve the younger records behind it in this pass.
        for name in failed {
            queue.requeue(name, now);
        }

        if !queue.is_empty() && !self.is_shutdown() {
            queue.next_deadline(now, GRACE_PERIOD)
        } else {
            None
        }
    }

    /// Remove the files behind one record: the tombstone's companion first
    /// (when the record is a tombstone), then the record's own file. A
    /// missing file counts as success.
    fn delete_record(&self, name: &str) -> io::Result<()> {
        if let Some(companion) = names::companion_of(name) {
            remove_if_exists(&self.dir.join(companion))?;
        }
        remove_if_exists(&self.dir.join(name))
    }

    fn is_shutdown(&self) -> bool {
        *self.shutdown.borrow()
    }

    fn register_task(&self, handle: JoinHandle<()>) {
        let mut tasks = self.lock_tasks();
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);
    }

    fn lock_queue(&self) -> MutexGuard<'_, DeleteQueue> {
        self.queue.lock().expect("delete queue lock poisoned")
    }

    fn lock_tasks(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.tasks.lock().expect("task registry lock poisoned")
    }

    fn emit(&self, event: &str) {
        if let Some(hook) = &self.events {
            hook(event);
        }
    }
}

/// The background worker. At most one instance runs at a time: it is only
/// spawned when an insert takes the queue from empty to non-empty, and it
/// loops until the queue drains, shutdown begins, or the empty-wake fires.
async fn run_worker(inner: Arc<Inner>, mut wait: Duration) {
    let mut shutdown = inner.shutdown.subscribe();
    loop {
        inner.emit("start waitAndDelete");
        let timer_fired = tokio::select! {
            _ = shutdown.changed() => false,
            _ = inner.empty_wake.notified() => false,
            _ = sleep(wait) => true,
        };
        if !timer_fired {
            inner.emit("end waitAndDelete");
            return;
        }

        let next = inner.sweep(Instant::now());
        inner.emit("end waitAndDelete");
        match next {
            Some(next_wait) => wait = next_wait,
            None => return,
        }
    }
}

/// Cold-start recovery: rebuild the pending set from on-disk markers.
///
/// Partial payloads are fed through the normal insert path. Tombstones get
/// one best-effort immediate removal (companion first); when that fails
/// they fall back to the queue and its retry discipline.
async fn run_scan(reaper: FileReaper) {
    reaper.inner.emit("start init");
    scan_dir(&reaper);
    reaper.inner.emit("end init");
}

fn scan_dir(reaper: &FileReaper) {
    let inner = &reaper.inner;
    let entries = match fs::read_dir(&inner.dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(error_kind = ?err.kind(), "could not scan inbox directory");
            return;
        }
    };

    for entry in entries {
        if inner.is_shutdown() {
            return; // terminate early
        }
        // Unreadable or unclassifiable entries are skipped; the scan is
        // best-effort.
        let Ok(entry) = entry else { continue };
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };

        if names::is_partial(name) {
            reaper.insert(name);
        } else if names::is_deleted_marker(name) {
            let companion = names::companion_of(name).unwrap_or(name);
            if fs::remove_file(inner.dir.join(companion)).is_ok()
                && fs::remove_file(inner.dir.join(name)).is_ok()
            {
                continue;
            }
            // Immediate removal did not finish; leave it to the queue.
            reaper.insert(name);
        }
    }
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}
