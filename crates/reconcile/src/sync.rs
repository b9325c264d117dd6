//! The synchronization run - passes, retries, and the overall timeout

use crate::descriptor::ResourceDescriptor;
use crate::traits::{DeletionWaiter, Reconciler};
use crate::types::{DesiredState, ReconcileOutcome, SyncOptions};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Terminal failure of a synchronization run
#[derive(Debug, Error)]
pub enum SyncError {
    /// A reconcile attempt failed hard; hard errors are never retried
    #[error("cannot reconcile {resource}")]
    Reconcile {
        resource: String,
        #[source]
        source: anyhow::Error,
    },

    /// A deleted resource was still present when its wait budget ran out
    #[error("deletion of {resource} did not complete")]
    DeletionWait {
        resource: String,
        #[source]
        source: anyhow::Error,
    },

    /// Passes kept reporting blocked resources past the overall budget
    #[error("reconciliation timed out after {elapsed:?} (budget {budget:?})")]
    Timeout { elapsed: Duration, budget: Duration },
}

/// Drives an ordered resource sequence toward one desired state.
///
/// The sequence is reconciled in passes: each pass visits every resource in
/// order and a blocked resource aborts the remainder of the pass. Blocked
/// passes are retried after a fixed delay until a pass completes clean or
/// the overall timeout elapses. The resource order is fixed for the whole
/// run; passes never re-sort.
pub struct Syncer<R, W> {
    reconciler: R,
    waiter: W,
    options: SyncOptions,
}

impl<R: Reconciler, W: DeletionWaiter> Syncer<R, W> {
    pub fn new(reconciler: R, waiter: W, options: SyncOptions) -> Self {
        Self {
            reconciler,
            waiter,
            options,
        }
    }

    /// Run passes over `resources` until every one reaches `desired`.
    ///
    /// Returns the first hard error, a deletion-wait failure, or a timeout
    /// once blocked passes have eaten the whole budget. Resources reconciled
    /// before a failure stay as they are; there is no rollback.
    pub fn run(
        &self,
        resources: &[ResourceDescriptor],
        desired: DesiredState,
    ) -> Result<(), SyncError> {
        let started = Instant::now();
        loop {
            let elapsed = started.elapsed();
            if elapsed > self.options.timeout {
                return Err(SyncError::Timeout {
                    elapsed,
                    budget: self.options.timeout,
                });
            }

            if !self.run_pass(resources, desired, started)? {
                log::info!("reconciliation complete");
                return Ok(());
            }

            log::info!("waiting on dependent items to be garbage-collected, retrying");
            thread::sleep(self.options.pass_delay);
        }
    }

    /// One pass over the ordered sequence.
    ///
    /// Returns `true` if the pass was cut short by a blocked resource.
    fn run_pass(
        &self,
        resources: &[ResourceDescriptor],
        desired: DesiredState,
        started: Instant,
    ) -> Result<bool, SyncError> {
        for resource in resources {
            let outcome = self
                .reconciler
                .reconcile(resource, desired)
                .map_err(|source| SyncError::Reconcile {
                    resource: resource.to_string(),
                    source,
                })?;

            match outcome {
                ReconcileOutcome::Blocked => {
                    log::debug!("{resource} blocked, abandoning the rest of this pass");
                    return Ok(true);
                }
                ReconcileOutcome::Done => {
                    if desired.is_absent() {
                        // Deletion is only done once the object is confirmed
                        // gone, within whatever budget the run has left.
                        let remaining = self.options.timeout.saturating_sub(started.elapsed());
                        let backoff = self.options.deletion_backoff.capped(remaining);
                        self.waiter
                            .wait_absent(resource, &backoff)
                            .map_err(|source| SyncError::DeletionWait {
                                resource: resource.to_string(),
                                source,
                            })?;
                    }
                }
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BackoffPolicy;
    use anyhow::bail;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn desc(kind: &str, name: &str) -> ResourceDescriptor {
        ResourceDescriptor::new("v1", kind, name, None, json!({}))
    }

    fn fast_options(timeout_ms: u64, delay_ms: u64) -> SyncOptions {
        SyncOptions {
            timeout: Duration::from_millis(timeout_ms),
            pass_delay: Duration::from_millis(delay_ms),
            deletion_backoff: BackoffPolicy::default(),
        }
    }

    #[derive(Clone, Copy)]
    enum Step {
        Done,
        Blocked,
        Fail(&'static str),
    }

    /// Pops one scripted outcome per reconcile call, recording the visit
    /// order. Once the script is empty it keeps returning `fallback`.
    struct ScriptedReconciler {
        script: Mutex<VecDeque<Step>>,
        fallback: Step,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedReconciler {
        fn new(script: Vec<Step>, fallback: Step) -> Self {
            Self {
                script: Mutex::new(script.into()),
                fallback,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Reconciler for &ScriptedReconciler {
        fn reconcile(
            &self,
            resource: &ResourceDescriptor,
            _desired: DesiredState,
        ) -> anyhow::Result<ReconcileOutcome> {
            self.calls.lock().unwrap().push(resource.name().to_string());
            let step = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(self.fallback);
            match step {
                Step::Done => Ok(ReconcileOutcome::Done),
                Step::Blocked => Ok(ReconcileOutcome::Blocked),
                Step::Fail(msg) => bail!(msg),
            }
        }
    }

    /// Waiter that records the cap of every wait and always succeeds
    struct RecordingWaiter {
        caps: Mutex<Vec<Duration>>,
    }

    impl RecordingWaiter {
        fn new() -> Self {
            Self {
                caps: Mutex::new(Vec::new()),
            }
        }
    }

    impl DeletionWaiter for &RecordingWaiter {
        fn wait_absent(
            &self,
            _resource: &ResourceDescriptor,
            backoff: &BackoffPolicy,
        ) -> anyhow::Result<()> {
            self.caps.lock().unwrap().push(backoff.cap);
            Ok(())
        }
    }

    /// Waiter that reports the object as never disappearing
    struct StuckWaiter;

    impl DeletionWaiter for StuckWaiter {
        fn wait_absent(
            &self,
            resource: &ResourceDescriptor,
            backoff: &BackoffPolicy,
        ) -> anyhow::Result<()> {
            bail!("{resource} still present after {:?}", backoff.cap)
        }
    }

    /// Waiter that must never be called (present-state runs)
    struct NoWait;

    impl DeletionWaiter for NoWait {
        fn wait_absent(
            &self,
            resource: &ResourceDescriptor,
            _backoff: &BackoffPolicy,
        ) -> anyhow::Result<()> {
            panic!("unexpected deletion wait for {resource}");
        }
    }

    #[test]
    fn test_clean_pass_succeeds_without_sleeping() {
        let resources = vec![desc("Namespace", "demo"), desc("ConfigMap", "settings")];
        let reconciler = ScriptedReconciler::new(vec![Step::Done, Step::Done], Step::Done);
        // A generous delay: if the loop slept even once the elapsed check
        // below would catch it.
        let syncer = Syncer::new(&reconciler, NoWait, fast_options(1_000, 500));

        let started = Instant::now();
        syncer
            .run(&resources, DesiredState::Present)
            .expect("clean run");

        assert!(started.elapsed() < Duration::from_millis(400));
        assert_eq!(reconciler.calls(), vec!["demo", "settings"]);
    }

    #[test]
    fn test_blocked_aborts_pass_and_restarts_from_the_top() {
        let resources = vec![
            desc("Namespace", "a"),
            desc("ConfigMap", "b"),
            desc("Deployment", "c"),
        ];
        // Pass 1: a done, b blocked (c never visited). Pass 2: all done.
        let reconciler = ScriptedReconciler::new(
            vec![
                Step::Done,
                Step::Blocked,
                Step::Done,
                Step::Done,
                Step::Done,
            ],
            Step::Done,
        );
        let syncer = Syncer::new(&reconciler, NoWait, fast_options(1_000, 5));

        syncer
            .run(&resources, DesiredState::Present)
            .expect("second pass should complete");

        // The retry pass starts from the beginning of the ordered sequence,
        // in the same order - nothing is re-sorted between passes.
        assert_eq!(reconciler.calls(), vec!["a", "b", "a", "b", "c"]);
    }

    #[test]
    fn test_hard_error_stops_the_run_and_names_the_resource() {
        let resources = vec![
            desc("Namespace", "one"),
            desc("ConfigMap", "two"),
            desc("ConfigMap", "three"),
            desc("Service", "four"),
            desc("Deployment", "five"),
        ];
        let reconciler = ScriptedReconciler::new(
            vec![Step::Done, Step::Done, Step::Fail("denied")],
            Step::Done,
        );
        let syncer = Syncer::new(&reconciler, NoWait, fast_options(1_000, 5));

        let err = syncer
            .run(&resources, DesiredState::Present)
            .expect_err("third resource fails hard");

        match &err {
            SyncError::Reconcile { resource, .. } => {
                assert!(resource.contains("three"), "got: {resource}");
            }
            other => panic!("expected a reconcile error, got {other:?}"),
        }
        // The remaining two resources are never attempted.
        assert_eq!(reconciler.calls().len(), 3);
    }

    #[test]
    fn test_blocked_forever_times_out_with_bounded_passes() {
        let resources = vec![desc("Namespace", "stuck")];
        let reconciler = ScriptedReconciler::new(Vec::new(), Step::Blocked);
        // timeout 55ms, delay 20ms: passes start at ~0, ~20, ~40; the check
        // at ~60 trips. floor(55 / 20) + 1 = 3 passes.
        let syncer = Syncer::new(&reconciler, NoWait, fast_options(55, 20));

        let err = syncer
            .run(&resources, DesiredState::Present)
            .expect_err("never unblocks");

        assert!(matches!(err, SyncError::Timeout { .. }), "got {err:?}");
        assert_eq!(reconciler.calls().len(), 3);
    }

    #[test]
    fn test_absent_waits_with_the_remaining_budget() {
        let resources = vec![desc("Deployment", "web"), desc("Namespace", "demo")];
        let reconciler = ScriptedReconciler::new(vec![Step::Done, Step::Done], Step::Done);
        let waiter = RecordingWaiter::new();
        let options = fast_options(1_000, 5);
        let syncer = Syncer::new(&reconciler, &waiter, options.clone());

        syncer
            .run(&resources, DesiredState::Absent)
            .expect("both deletions confirmed");

        let caps = waiter.caps.lock().unwrap();
        assert_eq!(caps.len(), 2);
        // Each wait gets what is left of the overall budget, so the caps
        // never exceed it and never grow.
        assert!(caps[0] <= options.timeout);
        assert!(caps[1] <= caps[0]);
    }

    #[test]
    fn test_unconfirmed_deletion_is_a_distinct_fatal_error() {
        let resources = vec![desc("Namespace", "lingering")];
        let reconciler = ScriptedReconciler::new(vec![Step::Done], Step::Done);
        let syncer = Syncer::new(&reconciler, StuckWaiter, fast_options(50, 5));

        let err = syncer
            .run(&resources, DesiredState::Absent)
            .expect_err("the waiter never confirms");

        match &err {
            SyncError::DeletionWait { resource, .. } => {
                assert!(resource.contains("lingering"), "got: {resource}");
            }
            other => panic!("expected a deletion-wait error, got {other:?}"),
        }
    }

    #[test]
    fn test_namespace_then_dependent_succeeds_on_second_pass() {
        // A namespace and a custom resource living in it: the first pass
        // applies the namespace but the custom resource is still waiting on
        // the old namespace's garbage collection; the second pass finishes.
        let resources = vec![desc("Namespace", "ns"), desc("Widget", "widget")];
        let reconciler = ScriptedReconciler::new(
            vec![Step::Done, Step::Blocked, Step::Done, Step::Done],
            Step::Done,
        );
        let syncer = Syncer::new(&reconciler, NoWait, fast_options(1_000, 5));

        syncer
            .run(&resources, DesiredState::Present)
            .expect("second pass completes");

        assert_eq!(reconciler.calls(), vec!["ns", "widget", "ns", "widget"]);
    }
}
