//! Core types for synchronization runs

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Target condition for every resource in one synchronization run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DesiredState {
    /// Resource exists and matches its manifest
    Present,
    /// Resource does not exist
    Absent,
}

impl DesiredState {
    /// Check if the run is removing resources
    pub fn is_absent(self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Result of one reconcile attempt on one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconcileOutcome {
    /// The remote object now matches the desired state
    Done,
    /// The change is pending because a related object has not been
    /// garbage-collected yet; retry the pass later
    Blocked,
}

impl ReconcileOutcome {
    /// Check if the outcome should trigger a retry pass
    pub fn is_blocked(self) -> bool {
        matches!(self, Self::Blocked)
    }
}

/// Options for a synchronization run
///
/// Constructed by the caller and handed to [`Syncer::new`](crate::Syncer::new);
/// there is no process-wide configuration.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Overall wall-clock budget for the run
    pub timeout: Duration,
    /// Fixed delay between a blocked pass and the next one
    pub pass_delay: Duration,
    /// Polling template for deletion confirmation; the run caps it with the
    /// remaining budget before each wait
    pub deletion_backoff: BackoffPolicy,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            pass_delay: Duration::from_secs(5),
            deletion_backoff: BackoffPolicy::default(),
        }
    }
}

/// Bounded polling schedule
///
/// `factor` is expected to be at most 1.0 for deletion waits, so the
/// interval never grows; `steps` and `cap` bound the wait regardless.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    /// First interval between probes
    pub initial: Duration,
    /// Multiplier applied to the interval after each probe
    pub factor: f64,
    /// Maximum number of probes
    pub steps: u32,
    /// Hard limit on the cumulative wait
    pub cap: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            factor: 1.0,
            steps: 9999,
            cap: Duration::from_secs(300),
        }
    }
}

impl BackoffPolicy {
    /// Copy of this policy with the cumulative cap replaced
    pub fn capped(&self, cap: Duration) -> Self {
        Self {
            cap,
            ..self.clone()
        }
    }

    /// Interval to use after one that just elapsed
    pub fn next_interval(&self, current: Duration) -> Duration {
        current.mul_f64(self.factor)
    }
}
