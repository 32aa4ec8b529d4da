//! Periodic tick task
//!
//! Drives the store once per period while a cycle runs. Elapsed time is
//! always recomputed from the cycle's start date, so late or skipped ticks
//! never accumulate error. The task ends on its own when the cycle finishes
//! or stops being the active one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::cycle::clock::Clock;
use crate::cycle::countdown::{page_title, Countdown};
use crate::cycle::model::{Cycle, CycleId};
use crate::cycle::store::{CycleStore, TickOutcome};

/// Store shared between the front end and the tick task
pub type SharedStore<C> = Arc<Mutex<CycleStore<C>>>;

/// Lock a shared store, recovering the data if a holder panicked.
pub fn lock_store<C: Clock>(store: &SharedStore<C>) -> MutexGuard<'_, CycleStore<C>> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Something that shows the countdown outside the main view, such as a
/// window or terminal title.
pub trait TitleSurface: Send + Sync {
    /// Replace the visible title.
    fn set_title(&self, title: &str);
}

/// Notifications the tick task sends back to the front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleNotice {
    /// The countdown ran out and the cycle was marked finished
    Finished(Cycle),
}

/// Handle to a running tick task. Dropping it stops the task.
#[derive(Debug)]
pub struct Ticker {
    cycle_id: CycleId,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Start ticking `cycle_id` every `period`.
    ///
    /// The first tick fires one period after the call.
    pub fn spawn<C: Clock + 'static>(
        store: SharedStore<C>,
        cycle_id: CycleId,
        surface: Arc<dyn TitleSurface>,
        title_suffix: String,
        period: Duration,
        notices: mpsc::UnboundedSender<CycleNotice>,
    ) -> Self {
        let task_cycle_id = cycle_id.clone();
        let handle = tokio::spawn(async move {
            run_ticks(
                store,
                task_cycle_id,
                surface,
                title_suffix,
                period,
                notices,
            )
            .await;
        });
        Self { cycle_id, handle }
    }

    /// The cycle this ticker drives.
    #[must_use]
    pub const fn cycle_id(&self) -> &CycleId {
        &self.cycle_id
    }

    /// True once the task has exited or been cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the task.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run_ticks<C: Clock>(
    store: SharedStore<C>,
    cycle_id: CycleId,
    surface: Arc<dyn TitleSurface>,
    title_suffix: String,
    period: Duration,
    notices: mpsc::UnboundedSender<CycleNotice>,
) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let outcome = {
            let mut store = lock_store(&store);
            if store.active_cycle_id() != Some(&cycle_id) {
                return;
            }
            store.tick()
        };

        match outcome {
            TickOutcome::Running { remaining, .. } => {
                surface.set_title(&page_title(
                    &Countdown::from_remaining(remaining),
                    &title_suffix,
                ));
            }
            TickOutcome::Finished(cycle) => {
                surface.set_title(&page_title(&Countdown::idle(), &title_suffix));
                // The receiver may already be gone during shutdown.
                let _ = notices.send(CycleNotice::Finished(cycle));
                return;
            }
            TickOutcome::Idle => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::clock::ManualClock;
    use crate::cycle::validation::NewCycleData;
    use crate::testutil::{t0, RecordingTitle};

    const PERIOD: Duration = Duration::from_secs(1);

    fn shared_store() -> (SharedStore<ManualClock>, ManualClock) {
        let clock = ManualClock::new(t0());
        let store = Arc::new(Mutex::new(CycleStore::new(clock.clone())));
        (store, clock)
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_updates_title_while_running() {
        let (store, clock) = shared_store();
        let id = lock_store(&store)
            .create_cycle(&NewCycleData::new("Write spec", 5))
            .unwrap();
        let title = Arc::new(RecordingTitle::default());
        let (tx, _rx) = mpsc::unbounded_channel();

        clock.advance_secs(10);
        let ticker = Ticker::spawn(
            store.clone(),
            id,
            title.clone(),
            "Ignite timer".to_string(),
            PERIOD,
            tx,
        );
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(title.last().as_deref(), Some("04:50 | Ignite timer"));
        assert_eq!(lock_store(&store).seconds_passed(), 10);
        assert!(!ticker.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_finishes_and_stops() {
        let (store, clock) = shared_store();
        let id = lock_store(&store)
            .create_cycle(&NewCycleData::new("Write spec", 5))
            .unwrap();
        let title = Arc::new(RecordingTitle::default());
        let (tx, mut rx) = mpsc::unbounded_channel();

        clock.advance_secs(300);
        let ticker = Ticker::spawn(
            store.clone(),
            id.clone(),
            title.clone(),
            "Ignite timer".to_string(),
            PERIOD,
            tx,
        );

        let CycleNotice::Finished(cycle) = rx.recv().await.unwrap();
        assert_eq!(cycle.id, id);
        assert!(cycle.finished_date.is_some());
        assert_eq!(title.last().as_deref(), Some("00:00 | Ignite timer"));

        tokio::time::sleep(PERIOD * 3).await;
        assert!(ticker.is_finished());
        assert_eq!(lock_store(&store).seconds_passed(), 300);
        // Exactly one notice, then the sender is dropped with the task.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_exits_when_cycle_interrupted() {
        let (store, clock) = shared_store();
        let id = lock_store(&store)
            .create_cycle(&NewCycleData::new("Write spec", 5))
            .unwrap();
        let title = Arc::new(RecordingTitle::default());
        let (tx, _rx) = mpsc::unbounded_channel();

        let ticker = Ticker::spawn(
            store.clone(),
            id,
            title.clone(),
            "Ignite timer".to_string(),
            PERIOD,
            tx,
        );
        lock_store(&store).interrupt_active_cycle();
        clock.advance_secs(5);

        tokio::time::sleep(PERIOD * 2).await;
        assert!(ticker.is_finished());
        assert!(title.titles().is_empty());
        assert_eq!(lock_store(&store).seconds_passed(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_updates() {
        let (store, _clock) = shared_store();
        let id = lock_store(&store)
            .create_cycle(&NewCycleData::new("Write spec", 5))
            .unwrap();
        let title = Arc::new(RecordingTitle::default());
        let (tx, _rx) = mpsc::unbounded_channel();

        let ticker = Ticker::spawn(
            store.clone(),
            id,
            title.clone(),
            "Ignite timer".to_string(),
            PERIOD,
            tx,
        );
        ticker.cancel();

        tokio::time::sleep(PERIOD * 3).await;
        assert!(title.titles().is_empty());
    }
}
