//! Exclusive ownership of the shared hardware output path.
//!
//! The pipeline hands each session an `OutputClaim` when it starts. A worker
//! may drive the output only while its claim is current; every ownership
//! change bumps a generation counter, so audio enqueued under a superseded
//! session can never reach the hardware, however late its worker pulls it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::state::OutputOwner;

/// A session's ticket for the output path.
///
/// Shared between the pipeline (which activates and supersedes it) and the
/// session's output worker (which checks it before every hardware write).
#[derive(Debug)]
pub struct OutputClaim {
    owner: OutputOwner,
    generation: AtomicU64,
}

impl OutputClaim {
    pub fn owner(&self) -> OutputOwner {
        self.owner
    }
}

struct State {
    owner: OutputOwner,
    generation: u64,
}

/// Arbitrates the single hardware output path between sessions.
///
/// Only the pipeline mutates ownership; workers only ask `is_current`.
pub struct OutputArbiter {
    state: Mutex<State>,
}

impl OutputArbiter {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                owner: OutputOwner::None,
                generation: 0,
            }),
        }
    }

    pub fn owner(&self) -> OutputOwner {
        self.state.lock().owner
    }

    /// Mint a claim for `owner` without activating it. Generation zero is
    /// never current.
    pub fn register(&self, owner: OutputOwner) -> Arc<OutputClaim> {
        Arc::new(OutputClaim {
            owner,
            generation: AtomicU64::new(0),
        })
    }

    /// Make `claim` the current owner, invalidating every other claim.
    pub fn activate(&self, claim: &OutputClaim) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.owner = claim.owner;
        claim.generation.store(state.generation, Ordering::Release);
        log::info!("output path claimed by {:?}", state.owner);
    }

    /// Drop ownership entirely; every claim becomes stale.
    pub fn vacate(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.owner = OutputOwner::None;
        log::info!("output path released");
    }

    /// Whether `claim` still names the current owner and generation.
    pub fn is_current(&self, claim: &OutputClaim) -> bool {
        let state = self.state.lock();
        state.owner == claim.owner
            && claim.generation.load(Ordering::Acquire) == state.generation
    }
}

impl Default for OutputArbiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_claim_is_not_current() {
        let arbiter = OutputArbiter::new();
        let claim = arbiter.register(OutputOwner::Media);
        assert!(!arbiter.is_current(&claim));
        assert!(arbiter.owner().is_none());
    }

    #[test]
    fn activation_supersedes_previous_owner() {
        let arbiter = OutputArbiter::new();
        let media = arbiter.register(OutputOwner::Media);
        let voice = arbiter.register(OutputOwner::Voice);

        arbiter.activate(&media);
        assert!(arbiter.is_current(&media));

        arbiter.activate(&voice);
        assert_eq!(arbiter.owner(), OutputOwner::Voice);
        assert!(arbiter.is_current(&voice));
        assert!(!arbiter.is_current(&media));
    }

    #[test]
    fn reactivation_revives_a_stale_claim() {
        let arbiter = OutputArbiter::new();
        let media = arbiter.register(OutputOwner::Media);
        let voice = arbiter.register(OutputOwner::Voice);

        arbiter.activate(&media);
        arbiter.activate(&voice);
        arbiter.activate(&media);
        assert!(arbiter.is_current(&media));
        assert!(!arbiter.is_current(&voice));
    }

    #[test]
    fn vacate_leaves_no_owner() {
        let arbiter = OutputArbiter::new();
        let voice = arbiter.register(OutputOwner::Voice);
        arbiter.activate(&voice);
        arbiter.vacate();
        assert!(arbiter.owner().is_none());
        assert!(!arbiter.is_current(&voice));
    }
}
