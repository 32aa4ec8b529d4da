//! Timer session
//!
//! A `Session` is the single owner of the cycle store for one run of the
//! program. The front end holds it and passes it around by reference; it
//! keeps at most one tick task alive and restarts it whenever a new cycle
//! begins.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::cycle::clock::Clock;
use crate::cycle::config::TimerConfig;
use crate::cycle::countdown::{page_title, Countdown};
use crate::cycle::model::Cycle;
use crate::cycle::store::CycleStore;
use crate::cycle::ticker::{lock_store, CycleNotice, SharedStore, Ticker, TitleSurface};
use crate::cycle::validation::{NewCycleData, ValidationError};

/// Cycle store plus the tick task that drives it
pub struct Session<C: Clock + 'static> {
    store: SharedStore<C>,
    ticker: Option<Ticker>,
    surface: Arc<dyn TitleSurface>,
    config: TimerConfig,
    notices: mpsc::UnboundedSender<CycleNotice>,
}

impl<C: Clock + 'static> Session<C> {
    /// Create an empty session. The receiver yields a notice each time a
    /// cycle finishes on its own.
    pub fn new(
        clock: C,
        config: TimerConfig,
        surface: Arc<dyn TitleSurface>,
    ) -> (Self, mpsc::UnboundedReceiver<CycleNotice>) {
        let (notices, rx) = mpsc::unbounded_channel();
        let store = CycleStore::with_bounds(clock, config.bounds());
        let session = Self {
            store: Arc::new(Mutex::new(store)),
            ticker: None,
            surface,
            config,
            notices,
        };
        (session, rx)
    }

    /// Start a new cycle and its tick task.
    ///
    /// Must be called from within a tokio runtime. On a validation error the
    /// running cycle and its ticker are left untouched.
    pub fn start(&mut self, data: &NewCycleData) -> Result<Cycle, ValidationError> {
        let (id, cycle, countdown) = {
            let mut store = lock_store(&self.store);
            let id = store.create_cycle(data)?;
            let cycle = store
                .active_cycle()
                .cloned()
                .ok_or(ValidationError::CycleAlreadyActive)?;
            (id, cycle, store.countdown())
        };

        self.stop_ticker();
        self.surface
            .set_title(&page_title(&countdown, &self.config.title_suffix));
        self.ticker = Some(Ticker::spawn(
            Arc::clone(&self.store),
            id,
            Arc::clone(&self.surface),
            self.config.title_suffix.clone(),
            self.config.tick_interval(),
            self.notices.clone(),
        ));
        Ok(cycle)
    }

    /// Interrupt the running cycle and stop ticking. No-op when idle.
    pub fn interrupt(&mut self) -> Option<Cycle> {
        let interrupted = lock_store(&self.store).interrupt_active_cycle();
        self.stop_ticker();
        interrupted
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    /// True while a tick task is alive.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Copy of all cycles in creation order.
    #[must_use]
    pub fn cycles(&self) -> Vec<Cycle> {
        lock_store(&self.store).cycles().to_vec()
    }

    /// Copy of the running cycle, if any.
    #[must_use]
    pub fn active_cycle(&self) -> Option<Cycle> {
        lock_store(&self.store).active_cycle().cloned()
    }

    /// Seconds elapsed as of the last tick.
    #[must_use]
    pub fn seconds_passed(&self) -> u64 {
        lock_store(&self.store).seconds_passed()
    }

    /// Countdown for the running cycle, `00:00` when idle.
    #[must_use]
    pub fn countdown(&self) -> Countdown {
        lock_store(&self.store).countdown()
    }

    /// Timer settings this session was built with.
    #[must_use]
    pub const fn config(&self) -> &TimerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::clock::ManualClock;
    use crate::testutil::{t0, RecordingTitle};
    use std::time::Duration;

    fn session() -> (
        Session<ManualClock>,
        mpsc::UnboundedReceiver<CycleNotice>,
        ManualClock,
        Arc<RecordingTitle>,
    ) {
        let clock = ManualClock::new(t0());
        let title = Arc::new(RecordingTitle::default());
        let (session, rx) = Session::new(clock.clone(), TimerConfig::default(), title.clone());
        (session, rx, clock, title)
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_sets_initial_title_and_ticks() {
        let (mut session, _rx, clock, title) = session();
        let cycle = session.start(&NewCycleData::new("Write spec", 5)).unwrap();

        assert_eq!(cycle.task, "Write spec");
        assert_eq!(title.last().as_deref(), Some("05:00 | Ignite timer"));
        assert!(session.is_ticking());

        clock.advance_secs(1);
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(session.seconds_passed(), 1);
        assert_eq!(title.last().as_deref(), Some("04:59 | Ignite timer"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_start_keeps_running_cycle() {
        let (mut session, _rx, _clock, _title) = session();
        let running = session.start(&NewCycleData::new("Write spec", 5)).unwrap();

        assert_eq!(
            session.start(&NewCycleData::new("", 5)),
            Err(ValidationError::EmptyTask)
        );
        assert_eq!(
            session.start(&NewCycleData::new("Other", 5)),
            Err(ValidationError::CycleAlreadyActive)
        );
        assert_eq!(session.active_cycle(), Some(running));
        assert!(session.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_stops_ticker() {
        let (mut session, _rx, clock, _title) = session();
        session.start(&NewCycleData::new("Write spec", 5)).unwrap();
        clock.advance_secs(10);
        tokio::time::sleep(Duration::from_millis(1100)).await;

        let cycle = session.interrupt().unwrap();
        assert!(cycle.interrupted_date.is_some());
        assert!(!session.is_ticking());
        assert_eq!(session.seconds_passed(), 10);
        assert_eq!(session.countdown(), Countdown::idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_when_idle_is_noop() {
        let (mut session, _rx, _clock, _title) = session();
        assert!(session.interrupt().is_none());
        assert!(session.cycles().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_ticker() {
        let (mut session, mut rx, clock, _title) = session();
        session.start(&NewCycleData::new("First", 5)).unwrap();
        session.interrupt();
        session.start(&NewCycleData::new("Second", 5)).unwrap();

        clock.advance_secs(300);
        let CycleNotice::Finished(cycle) = rx.recv().await.unwrap();
        assert_eq!(cycle.task, "Second");

        let cycles = session.cycles();
        assert_eq!(cycles.len(), 2);
        assert!(cycles[0].interrupted_date.is_some());
        assert!(cycles[0].finished_date.is_none());
        assert!(cycles[1].finished_date.is_some());
        assert!(session.active_cycle().is_none());
    }
}
