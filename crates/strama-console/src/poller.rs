//! Visibility-aware polling scheduler
//!
//! Runs the recurring list fetch on a fixed cadence, starting with an
//! immediate call. One scheduler object owns both the timer and the
//! visibility subscription, with a single teardown path: stopping (or
//! dropping) the handle guarantees no further fetch runs and no state
//! mutation from a fetch that was in flight at the time.
//!
//! Scheduling rules:
//! - at most one fetch outstanding; a tick that fires mid-fetch is
//!   skipped, not queued
//! - fetch failures are logged and the schedule continues unchanged —
//!   no backoff, every tick equally spaced
//! - while the document is hidden the timer is suspended; on return
//!   one immediate refresh runs, then the cadence restarts
//! - `refresh_now` runs one out-of-band fetch without shifting the
//!   interval's phase

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use crate::visibility::VisibilitySignal;

/// One poll cycle: fetch the list and apply the outcome.
///
/// Implementations own their error surfacing (banners, staleness
/// flags); the returned error is only logged here so the schedule can
/// note the failure and carry on.
#[async_trait]
pub trait PollTarget: Send + Sync + 'static {
    /// Perform one fetch-and-apply cycle.
    async fn poll(&self) -> strama_client::Result<()>;
}

/// Starts polling loops. See [`PollingScheduler::start`].
pub struct PollingScheduler;

impl PollingScheduler {
    /// Begin polling `target` every `interval`, starting immediately.
    ///
    /// The returned handle owns the loop: `stop()` (or dropping the
    /// handle) tears down the timer and the visibility subscription
    /// together.
    pub fn start(
        target: Arc<dyn PollTarget>,
        interval: Duration,
        visibility: VisibilitySignal,
    ) -> PollHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let refresh = Arc::new(Notify::new());

        let task = tokio::spawn(run_loop(
            target,
            interval,
            shutdown_rx,
            visibility.receiver(),
            Arc::clone(&refresh),
        ));

        PollHandle {
            shutdown: shutdown_tx,
            refresh,
            task,
        }
    }
}

/// Handle owning a polling loop.
pub struct PollHandle {
    shutdown: watch::Sender<bool>,
    refresh: Arc<Notify>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop the loop. Idempotent; guarantees zero further fetch
    /// invocations, abandoning any fetch currently in flight.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Trigger one out-of-band fetch without disturbing the interval's
    /// phase. Used after a mutating call so the view reflects the
    /// change before the next scheduled tick.
    pub fn refresh_now(&self) {
        self.refresh.notify_one();
    }

    /// A cloneable trigger for out-of-band refreshes.
    pub fn refresher(&self) -> Refresher {
        Refresher {
            notify: Arc::clone(&self.refresh),
        }
    }

    /// Whether the loop has fully wound down.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        // Dropping the handle must not leak the timer or the
        // visibility subscription.
        self.stop();
    }
}

/// Cloneable out-of-band refresh trigger, detached from the handle.
#[derive(Clone)]
pub struct Refresher {
    notify: Arc<Notify>,
}

impl Refresher {
    /// Request one out-of-band fetch.
    pub fn request(&self) {
        self.notify.notify_one();
    }
}

async fn run_loop(
    target: Arc<dyn PollTarget>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
    mut visibility: watch::Receiver<bool>,
    refresh: Arc<Notify>,
) {
    let mut ticker = new_ticker(interval, true);
    // Set false once the visibility publisher goes away; the loop then
    // behaves as permanently visible.
    let mut vis_live = true;

    loop {
        if vis_live && !*visibility.borrow() {
            debug!("document hidden; polling suspended");
            loop {
                tokio::select! {
                    biased;
                    changed = shutdown.changed() => {
                        if stop_requested(changed, &shutdown) {
                            return;
                        }
                    }
                    changed = visibility.changed() => {
                        if changed.is_err() {
                            vis_live = false;
                            break;
                        }
                        if *visibility.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("document visible; refreshing immediately");
            if fetch_interrupted(&target, &mut shutdown).await {
                return;
            }
            // Restart the cadence relative to the resume refresh.
            ticker = new_ticker(interval, false);
            continue;
        }

        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if stop_requested(changed, &shutdown) {
                    return;
                }
            }
            changed = visibility.changed(), if vis_live => {
                if changed.is_err() {
                    vis_live = false;
                }
                // Visibility is re-evaluated at the top of the loop.
            }
            _ = refresh.notified() => {
                if fetch_interrupted(&target, &mut shutdown).await {
                    return;
                }
            }
            _ = ticker.tick() => {
                if fetch_interrupted(&target, &mut shutdown).await {
                    return;
                }
            }
        }
    }
}

fn new_ticker(interval: Duration, immediate_first_tick: bool) -> time::Interval {
    let start = if immediate_first_tick {
        time::Instant::now()
    } else {
        time::Instant::now() + interval
    };
    let mut ticker = time::interval_at(start, interval);
    // A tick that fires while a fetch is outstanding is skipped, never
    // queued: at most one fetch in flight.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

fn stop_requested(
    changed: Result<(), watch::error::RecvError>,
    shutdown: &watch::Receiver<bool>,
) -> bool {
    // A dropped sender means the handle is gone; treat it as stop.
    changed.is_err() || *shutdown.borrow()
}

/// Run one fetch, racing it against shutdown. Returns true when the
/// loop must exit; an in-flight fetch is dropped at that point, so its
/// response never mutates state after teardown.
async fn fetch_interrupted(
    target: &Arc<dyn PollTarget>,
    shutdown: &mut watch::Receiver<bool>,
) -> bool {
    tokio::select! {
        biased;
        changed = shutdown.changed() => {
            if stop_requested(changed, shutdown) {
                debug!("fetch abandoned during teardown");
                return true;
            }
            false
        }
        result = target.poll() => {
            if let Err(e) = result {
                warn!(error = %e, "list fetch failed; next tick proceeds normally");
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visibility::visibility_channel;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts poll starts and completions, with a configurable delay
    /// and failure mode.
    struct CountingTarget {
        started: AtomicUsize,
        completed: AtomicUsize,
        delay: Duration,
        fail: bool,
    }

    impl CountingTarget {
        fn new() -> Self {
            Self {
                started: AtomicUsize::new(0),
                completed: AtomicUsize::new(0),
                delay: Duration::ZERO,
                fail: false,
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::new()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl PollTarget for CountingTarget {
        async fn poll(&self) -> strama_client::Result<()> {
            self.started.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.completed.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(strama_client::Error::Connection("test".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_immediate_first_fetch_and_cadence() {
        let target = Arc::new(CountingTarget::new());
        let handle = PollingScheduler::start(
            Arc::clone(&target) as Arc<dyn PollTarget>,
            Duration::from_millis(25),
            VisibilitySignal::always_visible(),
        );

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(target.completed.load(Ordering::SeqCst), 1, "immediate first call");

        tokio::time::sleep(Duration::from_millis(110)).await;
        let after = target.completed.load(Ordering::SeqCst);
        assert!(after >= 3, "expected recurring fetches, got {}", after);

        handle.stop();
    }

    #[tokio::test]
    async fn test_stop_halts_all_fetches() {
        let target = Arc::new(CountingTarget::new());
        let handle = PollingScheduler::start(
            Arc::clone(&target) as Arc<dyn PollTarget>,
            Duration::from_millis(20),
            VisibilitySignal::always_visible(),
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.stop();
        handle.stop(); // idempotent
        tokio::time::sleep(Duration::from_millis(20)).await;

        let frozen = target.started.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(target.started.load(Ordering::SeqCst), frozen);
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn test_stop_abandons_in_flight_fetch() {
        let target = Arc::new(CountingTarget::slow(Duration::from_millis(200)));
        let handle = PollingScheduler::start(
            Arc::clone(&target) as Arc<dyn PollTarget>,
            Duration::from_millis(30),
            VisibilitySignal::always_visible(),
        );

        // The immediate first fetch is now in flight.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(target.started.load(Ordering::SeqCst), 1);
        handle.stop();

        // The in-flight fetch is dropped: it never completes, and no
        // further fetch starts.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(target.started.load(Ordering::SeqCst), 1);
        assert_eq!(target.completed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_drop_stops_the_loop() {
        let target = Arc::new(CountingTarget::new());
        let handle = PollingScheduler::start(
            Arc::clone(&target) as Arc<dyn PollTarget>,
            Duration::from_millis(20),
            VisibilitySignal::always_visible(),
        );

        tokio::time::sleep(Duration::from_millis(30)).await;
        drop(handle);
        tokio::time::sleep(Duration::from_millis(20)).await;

        let frozen = target.started.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(target.started.load(Ordering::SeqCst), frozen);
    }

    #[tokio::test]
    async fn test_refresh_now_out_of_band() {
        let target = Arc::new(CountingTarget::new());
        let handle = PollingScheduler::start(
            Arc::clone(&target) as Arc<dyn PollTarget>,
            Duration::from_secs(60), // ticks effectively never fire
            VisibilitySignal::always_visible(),
        );

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(target.completed.load(Ordering::SeqCst), 1);

        handle.refresh_now();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(target.completed.load(Ordering::SeqCst), 2);

        // The detached refresher works the same way.
        handle.refresher().request();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(target.completed.load(Ordering::SeqCst), 3);

        handle.stop();
    }

    #[tokio::test]
    async fn test_fetch_failure_does_not_stop_schedule() {
        let target = Arc::new(CountingTarget::failing());
        let handle = PollingScheduler::start(
            Arc::clone(&target) as Arc<dyn PollTarget>,
            Duration::from_millis(25),
            VisibilitySignal::always_visible(),
        );

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(target.completed.load(Ordering::SeqCst) >= 3);
        handle.stop();
    }

    #[tokio::test]
    async fn test_hidden_document_suspends_polling() {
        let (publisher, signal) = visibility_channel();
        publisher.set_visible(false);

        let target = Arc::new(CountingTarget::new());
        let handle = PollingScheduler::start(
            Arc::clone(&target) as Arc<dyn PollTarget>,
            Duration::from_millis(20),
            signal,
        );

        // Hidden from the start: nothing fetches.
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(target.started.load(Ordering::SeqCst), 0);

        // Visibility returns: one immediate refresh, then the cadence.
        publisher.set_visible(true);
        tokio::time::sleep(Duration::from_millis(15)).await;
        assert_eq!(target.completed.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(70)).await;
        assert!(target.completed.load(Ordering::SeqCst) >= 3);

        // Hiding again stops the ticks.
        publisher.set_visible(false);
        tokio::time::sleep(Duration::from_millis(30)).await;
        let frozen = target.started.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(target.started.load(Ordering::SeqCst), frozen);

        handle.stop();
    }
}
