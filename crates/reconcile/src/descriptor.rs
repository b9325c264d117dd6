//! Resource descriptors - opaque handles to parsed manifest objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// One parsed resource: its identity plus the full manifest body.
///
/// Descriptors are immutable once parsed. A synchronization run only changes
/// the state of the remote object a descriptor names, never the descriptor
/// itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    api_version: String,
    kind: String,
    name: String,
    namespace: Option<String>,
    manifest: serde_json::Value,
}

impl ResourceDescriptor {
    pub fn new(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
        namespace: Option<String>,
        manifest: serde_json::Value,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            name: name.into(),
            namespace,
            manifest,
        }
    }

    /// API group and version, e.g. `v1` or `apps/v1`
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Resource kind, e.g. `Namespace` or `Deployment`
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Object name within its namespace (or cluster-wide)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace, if the resource is namespaced
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The full manifest body as parsed
    pub fn manifest(&self) -> &serde_json::Value {
        &self.manifest
    }
}

impl fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{} {}/{}", self.kind, ns, self.name),
            None => write!(f, "{} {}", self.kind, self.name),
        }
    }
}
