//! Per-resource reconcile mechanics and deletion confirmation

use crate::client::ClusterClient;
use crate::error::Error;
use anyhow::{Context, Result, bail};
use reconcile::{
    BackoffPolicy, DeletionWaiter, DesiredState, ReconcileOutcome, Reconciler, ResourceDescriptor,
};
use serde_json::Value;
use std::thread;
use std::time::Instant;

/// Reconciles one resource at a time against the control plane.
///
/// Every operation is idempotent: applying an object that already matches
/// its manifest writes nothing, deleting an absent object succeeds. The
/// blocked-on-garbage-collection condition is detected in two places: a
/// remote object that is still terminating, and a create rejected because
/// the name is held by an object the server is tearing down.
#[derive(Clone)]
pub struct ClusterReconciler {
    client: ClusterClient,
    allow_recreate: bool,
}

impl ClusterReconciler {
    pub fn new(client: ClusterClient, allow_recreate: bool) -> Self {
        Self {
            client,
            allow_recreate,
        }
    }

    fn apply(&self, resource: &ResourceDescriptor) -> Result<ReconcileOutcome> {
        match self
            .client
            .get(resource)
            .with_context(|| format!("fetching {resource}"))?
        {
            Some(remote) => {
                if is_terminating(&remote) {
                    log::debug!("{resource} is terminating, waiting for garbage collection");
                    return Ok(ReconcileOutcome::Blocked);
                }
                if !needs_update(&remote, resource.manifest()) {
                    log::debug!("{resource} already matches its manifest");
                    return Ok(ReconcileOutcome::Done);
                }
                match self.client.replace(resource) {
                    Ok(()) => {
                        log::debug!("{resource} updated");
                        Ok(ReconcileOutcome::Done)
                    }
                    Err(err) if err.is_unprocessable() => self.recreate(resource, err),
                    Err(err) => Err(err).with_context(|| format!("updating {resource}")),
                }
            }
            None => match self.client.create(resource) {
                Ok(()) => {
                    log::debug!("{resource} created");
                    Ok(ReconcileOutcome::Done)
                }
                Err(err) if err.is_conflict() => {
                    // The name is still held by an object the server has not
                    // finished garbage-collecting.
                    log::debug!("{resource} create conflicted, waiting for garbage collection");
                    Ok(ReconcileOutcome::Blocked)
                }
                Err(err) => Err(err).with_context(|| format!("creating {resource}")),
            },
        }
    }

    /// An update was rejected for immutable field changes. With recreation
    /// enabled the object is deleted and the pass reports blocked, so the
    /// next pass recreates it once the old object is gone.
    fn recreate(&self, resource: &ResourceDescriptor, err: Error) -> Result<ReconcileOutcome> {
        if !self.allow_recreate {
            return Err(err).with_context(|| {
                format!("{resource} has immutable field changes (re-run with --allow-recreate)")
            });
        }
        log::warn!("{resource} has immutable field changes, deleting it for recreation");
        self.client
            .delete(resource)
            .with_context(|| format!("deleting {resource} for recreation"))?;
        Ok(ReconcileOutcome::Blocked)
    }

    fn remove(&self, resource: &ResourceDescriptor) -> Result<ReconcileOutcome> {
        self.client
            .delete(resource)
            .with_context(|| format!("deleting {resource}"))?;
        log::debug!("{resource} deletion requested");
        Ok(ReconcileOutcome::Done)
    }
}

impl Reconciler for ClusterReconciler {
    fn reconcile(
        &self,
        resource: &ResourceDescriptor,
        desired: DesiredState,
    ) -> Result<ReconcileOutcome> {
        match desired {
            DesiredState::Present => self.apply(resource),
            DesiredState::Absent => self.remove(resource),
        }
    }
}

impl DeletionWaiter for ClusterReconciler {
    fn wait_absent(&self, resource: &ResourceDescriptor, backoff: &BackoffPolicy) -> Result<()> {
        log::debug!("waiting for removal of {resource}");
        poll_until_gone(backoff, || self.client.exists(resource))
            .with_context(|| format!("confirming removal of {resource}"))
    }
}

/// Whether the remote object is marked for asynchronous deletion
fn is_terminating(remote: &Value) -> bool {
    remote
        .pointer("/metadata/deletionTimestamp")
        .is_some_and(|v| !v.is_null())
}

/// Whether the remote object diverges from the desired manifest.
///
/// Server-managed fields (status, resourceVersion, timestamps) only exist on
/// the remote side, so the comparison checks that every field the manifest
/// declares is present remotely with the same value.
fn needs_update(remote: &Value, desired: &Value) -> bool {
    !is_subset(desired, remote)
}

fn is_subset(desired: &Value, remote: &Value) -> bool {
    match (desired, remote) {
        (Value::Object(d), Value::Object(r)) => d
            .iter()
            .all(|(key, value)| r.get(key).is_some_and(|rv| is_subset(value, rv))),
        _ => desired == remote,
    }
}

/// Poll `exists` until it reports false, sleeping per `backoff` between
/// probes. Fails once the next probe would overrun the cumulative cap or
/// the step budget runs out while the object is still present.
fn poll_until_gone<F>(backoff: &BackoffPolicy, mut exists: F) -> Result<()>
where
    F: FnMut() -> std::result::Result<bool, Error>,
{
    let started = Instant::now();
    let mut interval = backoff.initial;
    for _ in 0..backoff.steps {
        if !exists()? {
            return Ok(());
        }
        if started.elapsed() + interval > backoff.cap {
            break;
        }
        thread::sleep(interval);
        interval = backoff.next_interval(interval);
    }
    bail!(
        "object still present after {:?} (cap {:?})",
        started.elapsed(),
        backoff.cap
    )
}
