//! # Cluster
//!
//! Control-plane side of the synchronizer: ambient connection
//! configuration, a blocking JSON HTTP client, and the per-resource
//! reconcile mechanics (create/replace/delete, blocked-on-garbage-collection
//! detection, deletion confirmation) behind the `reconcile` crate's
//! collaborator traits.

pub mod client;
pub mod config;
pub mod error;
pub mod reconciler;

// Re-export main types at crate root
pub use client::ClusterClient;
pub use config::{ClusterConfig, ENDPOINT_VAR, TOKEN_VAR};
pub use error::{Error, Result};
pub use reconciler::ClusterReconciler;
