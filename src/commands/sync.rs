//! Shared synchronization wiring for apply and delete

use anyhow::{Context as AnyhowContext, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::Context;
use crate::ui;
use cluster::{ClusterClient, ClusterConfig, ClusterReconciler};
use manifest::ManifestLoader;
use reconcile::{DesiredState, SyncOptions, Syncer, ordered};

/// Load the manifests, sort them for the desired state, and run the
/// synchronization against the configured control plane.
pub fn run(
    ctx: &Context,
    manifests: &[PathBuf],
    desired: DesiredState,
    timeout: Duration,
    allow_recreate: bool,
) -> Result<()> {
    let loader = ManifestLoader::with_defaults();
    let resources = loader.load_files(manifests)?;
    if resources.is_empty() {
        ui::warn("no resources found in the given manifests");
        return Ok(());
    }

    // Sorted once per run; the loop re-reconciles but never re-sorts.
    let resources = ordered(resources, desired);
    log::debug!("{} resources to reconcile", resources.len());
    if ctx.verbose > 0 {
        for resource in &resources {
            ui::dim(&resource.to_string());
        }
    }

    log::info!("connecting to the control plane API");
    let config = ClusterConfig::from_env()?;
    let client = ClusterClient::new(&config);
    let reconciler = ClusterReconciler::new(client, allow_recreate);

    let options = SyncOptions {
        timeout,
        ..SyncOptions::default()
    };
    let syncer = Syncer::new(reconciler.clone(), reconciler, options);
    syncer
        .run(&resources, desired)
        .context("reconciliation failed")?;

    if !ctx.quiet {
        ui::success(&format!("{} resources reconciled", resources.len()));
    }
    Ok(())
}
