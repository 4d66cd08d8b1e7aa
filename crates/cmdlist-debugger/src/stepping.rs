//! Blocking stepping gate for interpreters that run on their own thread.

use parking_lot::{Condvar, Mutex};

use crate::Stepper;

#[derive(Debug, Default)]
struct GateState {
    suspended: bool,
    resumes: u64,
}

/// Parks the dispatch thread after a break until the control plane resumes it.
///
/// The dispatch loop calls [`StepGate::enter_stepping`] when the debugger
/// returns a break verdict; configuration calls on the debugger resume it via
/// [`Stepper::resume_from_suspension`].
#[derive(Debug, Default)]
pub struct StepGate {
    state: Mutex<GateState>,
    wake: Condvar,
}

impl StepGate {
    /// Creates an open gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks the calling thread until the next resume.
    pub fn enter_stepping(&self) {
        let mut state = self.state.lock();
        state.suspended = true;
        let entered_at = state.resumes;
        while state.resumes == entered_at {
            self.wake.wait(&mut state);
        }
    }

    /// Number of resumes delivered since creation.
    #[must_use]
    pub fn resume_count(&self) -> u64 {
        self.state.lock().resumes
    }
}

impl Stepper for StepGate {
    fn is_suspended(&self) -> bool {
        self.state.lock().suspended
    }

    fn resume_from_suspension(&self) {
        let mut state = self.state.lock();
        if !state.suspended {
            return;
        }
        state.suspended = false;
        state.resumes = state.resumes.wrapping_add(1);
        drop(state);
        self.wake.notify_all();
    }
}
