//! Collaborator seams for the synchronization loop
//!
//! These traits let the loop be driven against any backend - the real
//! control-plane client in production, scripted fakes in tests.

use crate::descriptor::ResourceDescriptor;
use crate::types::{BackoffPolicy, DesiredState, ReconcileOutcome};
use anyhow::Result;

/// Per-resource reconcile operation.
///
/// Implementations must be idempotent: calling [`reconcile`](Self::reconcile)
/// on a resource that already matches the desired state is a no-op returning
/// [`ReconcileOutcome::Done`]. The blocked-on-garbage-collection condition is
/// reported through the outcome, never as an error; errors are reserved for
/// hard failures that should abort the run.
pub trait Reconciler {
    /// Drive one resource toward the desired state
    fn reconcile(
        &self,
        resource: &ResourceDescriptor,
        desired: DesiredState,
    ) -> Result<ReconcileOutcome>;
}

/// Confirms that a deleted resource is actually gone.
///
/// Deletion is asynchronous on the remote side; a successful delete call only
/// means the removal was accepted. Implementations poll existence per the
/// backoff policy until the object disappears or the policy's cap or step
/// budget is exhausted, which is an error.
pub trait DeletionWaiter {
    /// Block until the resource no longer exists
    fn wait_absent(&self, resource: &ResourceDescriptor, backoff: &BackoffPolicy) -> Result<()>;
}
