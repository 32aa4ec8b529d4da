//! Cycle reducer
//!
//! The pure transition function behind the store. Every change to the cycle
//! list goes through `reduce`, which takes the current state and an action
//! and returns the next state. Timestamps travel inside the actions, so the
//! same inputs always produce the same output.

use chrono::{DateTime, Utc};

use crate::cycle::model::{Cycle, CycleId};

/// Ordered cycle history plus the id of the running cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CyclesState {
    /// All cycles in creation order
    pub cycles: Vec<Cycle>,
    /// The running cycle, if any
    pub active_cycle_id: Option<CycleId>,
}

impl CyclesState {
    /// Look up the running cycle.
    #[must_use]
    pub fn active_cycle(&self) -> Option<&Cycle> {
        self.active_index().map(|i| &self.cycles[i])
    }

    /// Position of the running cycle in `cycles`.
    fn active_index(&self) -> Option<usize> {
        let active = self.active_cycle_id.as_ref()?;
        self.cycles.iter().position(|c| &c.id == active)
    }
}

/// Events that change the cycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleAction {
    /// Append a cycle and make it the running one
    AddNewCycle(Cycle),
    /// Stop the running cycle early
    InterruptCurrentCycle {
        /// When the user cancelled
        at: DateTime<Utc>,
    },
    /// Stop the running cycle because its countdown ran out
    MarkCurrentCycleAsFinished {
        /// When the countdown reached zero
        at: DateTime<Utc>,
    },
}

/// Apply `action` to `state`.
///
/// Interrupt and finish are no-ops when no running cycle can be found.
#[must_use]
pub fn reduce(mut state: CyclesState, action: CycleAction) -> CyclesState {
    match action {
        CycleAction::AddNewCycle(cycle) => {
            // A cycle replaced while still running counts as interrupted.
            if let Some(index) = state.active_index() {
                state.cycles[index].interrupted_date = Some(cycle.start_date);
            }
            state.active_cycle_id = Some(cycle.id.clone());
            state.cycles.push(cycle);
            state
        }
        CycleAction::InterruptCurrentCycle { at } => {
            let Some(index) = state.active_index() else {
                return state;
            };
            state.active_cycle_id = None;
            state.cycles[index].interrupted_date = Some(at);
            state
        }
        CycleAction::MarkCurrentCycleAsFinished { at } => {
            let Some(index) = state.active_index() else {
                return state;
            };
            state.active_cycle_id = None;
            state.cycles[index].finished_date = Some(at);
            state
        }
    }
}
