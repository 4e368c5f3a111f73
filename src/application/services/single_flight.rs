use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::GenerationState;

/// Per-orchestrator guard allowing one generation run at a time.
#[derive(Debug, Default)]
pub struct SingleFlight {
    state: Mutex<GenerationState>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GenerationState {
        *self.lock()
    }

    /// Moves to `Generating`, or returns `None` without touching the state
    /// when a run is already in flight.
    pub fn try_acquire(&self) -> Option<GenerationPermit<'_>> {
        let mut state = self.lock();
        if state.is_in_flight() {
            return None;
        }
        *state = GenerationState::Generating;
        Some(GenerationPermit {
            owner: self,
            released: false,
        })
    }

    fn lock(&self) -> MutexGuard<'_, GenerationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Held for the duration of a run. Dropping it without calling
/// [`complete`](Self::complete) records the run as failed.
#[derive(Debug)]
pub struct GenerationPermit<'a> {
    owner: &'a SingleFlight,
    released: bool,
}

impl GenerationPermit<'_> {
    pub fn complete(mut self) {
        self.release(GenerationState::Completed);
    }

    pub fn fail(mut self) {
        self.release(GenerationState::Failed);
    }

    fn release(&mut self, outcome: GenerationState) {
        if self.released {
            return;
        }
        *self.owner.lock() = outcome;
        self.released = true;
        tracing::debug!(state = %outcome, "Generation guard released");
    }
}

impl Drop for GenerationPermit<'_> {
    fn drop(&mut self) {
        self.release(GenerationState::Failed);
    }
}
