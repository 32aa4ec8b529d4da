//! Cycle store
//!
//! Owns the cycle state, the clock and the seconds-passed counter, and
//! exposes the operations the front end calls: create, interrupt, finish and
//! tick. All state changes are routed through [`reduce`].

use chrono::{DateTime, Utc};

use crate::cycle::clock::Clock;
use crate::cycle::countdown::Countdown;
use crate::cycle::model::{Cycle, CycleId};
use crate::cycle::reducer::{reduce, CycleAction, CyclesState};
use crate::cycle::validation::{CycleBounds, NewCycleData, ValidationError};

/// Result of a single tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No cycle is running; nothing to do
    Idle,
    /// The running cycle still has time left
    Running {
        /// Id of the running cycle
        cycle_id: CycleId,
        /// Seconds since the cycle started
        elapsed: u64,
        /// Seconds until it finishes
        remaining: u64,
    },
    /// The running cycle just reached its duration and was finished
    Finished(Cycle),
}

/// In-memory store for one timer session
pub struct CycleStore<C: Clock> {
    state: CyclesState,
    clock: C,
    bounds: CycleBounds,
    seconds_passed: u64,
}

impl<C: Clock> CycleStore<C> {
    /// Create an empty store using the default duration bounds.
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self::with_bounds(clock, CycleBounds::default())
    }

    /// Create an empty store with custom duration bounds.
    #[must_use]
    pub fn with_bounds(clock: C, bounds: CycleBounds) -> Self {
        Self {
            state: CyclesState::default(),
            clock,
            bounds,
            seconds_passed: 0,
        }
    }

    fn dispatch(&mut self, action: CycleAction) {
        self.state = reduce(std::mem::take(&mut self.state), action);
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Pick an id for a cycle created at `at` that no other cycle uses.
    fn next_id(&self, at: DateTime<Utc>) -> CycleId {
        let mut millis = at.timestamp_millis();
        loop {
            let id = CycleId::new(millis.to_string());
            if !self.state.cycles.iter().any(|c| c.id == id) {
                return id;
            }
            millis += 1;
        }
    }

    /// Validate `data`, append a new cycle and make it the running one.
    ///
    /// Resets `seconds_passed` to zero.
    pub fn create_cycle(&mut self, data: &NewCycleData) -> Result<CycleId, ValidationError> {
        data.validate(&self.bounds)?;
        if self.state.active_cycle().is_some() {
            return Err(ValidationError::CycleAlreadyActive);
        }

        let start_date = self.now();
        let id = self.next_id(start_date);
        let cycle = Cycle::new(id.clone(), data.task.trim(), data.minutes_amount, start_date);
        self.dispatch(CycleAction::AddNewCycle(cycle));
        self.seconds_passed = 0;
        Ok(id)
    }

    /// Stop the running cycle early. Returns the stamped cycle, or `None`
    /// when nothing was running.
    pub fn interrupt_active_cycle(&mut self) -> Option<Cycle> {
        let id = self.state.active_cycle_id.clone()?;
        let at = self.now();
        self.dispatch(CycleAction::InterruptCurrentCycle { at });
        self.find(&id).filter(|c| c.interrupted_date.is_some()).cloned()
    }

    /// Mark the running cycle as finished. Returns the stamped cycle, or
    /// `None` when nothing was running.
    pub fn mark_current_cycle_as_finished(&mut self) -> Option<Cycle> {
        let id = self.state.active_cycle_id.clone()?;
        let at = self.now();
        self.dispatch(CycleAction::MarkCurrentCycleAsFinished { at });
        self.find(&id).filter(|c| c.finished_date.is_some()).cloned()
    }

    /// Recompute elapsed time for the running cycle from its start date.
    ///
    /// Finishes the cycle once elapsed time reaches its duration, clamping
    /// `seconds_passed` to the total.
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.now();
        let Some(active) = self.state.active_cycle() else {
            return TickOutcome::Idle;
        };

        let cycle_id = active.id.clone();
        let total = active.total_seconds();
        let elapsed = active.elapsed_seconds(now);
        if elapsed >= total {
            let finished = self.mark_current_cycle_as_finished();
            self.seconds_passed = total;
            return finished.map_or(TickOutcome::Idle, TickOutcome::Finished);
        }

        self.seconds_passed = elapsed;
        TickOutcome::Running {
            cycle_id,
            elapsed,
            remaining: total - elapsed,
        }
    }

    fn find(&self, id: &CycleId) -> Option<&Cycle> {
        self.state.cycles.iter().find(|c| &c.id == id)
    }

    /// The running cycle, if any.
    #[must_use]
    pub fn active_cycle(&self) -> Option<&Cycle> {
        self.state.active_cycle()
    }

    /// Id of the running cycle, if any.
    #[must_use]
    pub const fn active_cycle_id(&self) -> Option<&CycleId> {
        self.state.active_cycle_id.as_ref()
    }

    /// All cycles in creation order.
    #[must_use]
    pub fn cycles(&self) -> &[Cycle] {
        &self.state.cycles
    }

    /// Seconds elapsed as of the last tick.
    #[must_use]
    pub const fn seconds_passed(&self) -> u64 {
        self.seconds_passed
    }

    /// Countdown for the running cycle, or `00:00` when idle.
    #[must_use]
    pub fn countdown(&self) -> Countdown {
        self.active_cycle().map_or_else(Countdown::idle, |c| {
            Countdown::new(c.total_seconds(), self.seconds_passed)
        })
    }

    /// Duration bounds enforced on creation.
    #[must_use]
    pub const fn bounds(&self) -> &CycleBounds {
        &self.bounds
    }

    /// Snapshot of the underlying state.
    #[must_use]
    pub const fn state(&self) -> &CyclesState {
        &self.state
    }
}
