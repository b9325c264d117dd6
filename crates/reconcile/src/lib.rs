//! # Reconcile
//!
//! The core of a declarative resource synchronizer: ordered resource
//! sequences, a desired end-state, and the retrying synchronization loop
//! that drives every resource toward it.
//!
//! ## Core Concepts
//!
//! - **ResourceDescriptor**: an immutable handle to one parsed resource
//! - **DesiredState**: Present or Absent, one per synchronization run
//! - **ordered**: deterministic install/uninstall ordering of a batch
//! - **Syncer**: runs reconcile passes until the batch converges, retrying
//!   around blocked resources and enforcing an overall timeout
//!
//! The per-resource mechanics live behind the [`Reconciler`] and
//! [`DeletionWaiter`] traits so the loop can be exercised against fakes:
//!
//! ```ignore
//! use reconcile::{DesiredState, SyncOptions, Syncer, ordered};
//!
//! let resources = ordered(resources, DesiredState::Present);
//! let syncer = Syncer::new(reconciler, waiter, SyncOptions::default());
//! syncer.run(&resources, DesiredState::Present)?;
//! ```
//!
//! A reconcile attempt either finishes (`Done`), reports that it is waiting
//! on the remote garbage collector (`Blocked`), or fails hard. Blocked
//! outcomes abort the current pass and schedule a retry of the whole
//! sequence after a fixed delay; hard errors abort the run. Every reconcile
//! must be idempotent, which is what makes whole-pass retries safe.

pub mod descriptor;
pub mod order;
pub mod sync;
pub mod traits;
pub mod types;

// Re-export main types at crate root
pub use descriptor::ResourceDescriptor;
pub use order::ordered;
pub use sync::{SyncError, Syncer};
pub use traits::{DeletionWaiter, Reconciler};
pub use types::{BackoffPolicy, DesiredState, ReconcileOutcome, SyncOptions};
