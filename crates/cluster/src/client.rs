//! Blocking HTTP client for the control-plane API
//!
//! Object URLs follow the collection convention
//! `{base}/apis/{apiVersion}/namespaces/{namespace}/{plural}/{name}` for
//! namespaced resources and the same without the namespace segments for
//! cluster-scoped ones. The collection segment is the lowercased kind with
//! an `s` appended.

use crate::config::ClusterConfig;
use crate::error::Result;
use reconcile::ResourceDescriptor;
use serde_json::Value;

/// Client for one control-plane endpoint
#[derive(Clone)]
pub struct ClusterClient {
    /// HTTP agent for requests
    agent: ureq::Agent,
    /// Endpoint base URL
    base_url: String,
    /// Optional bearer token
    token: Option<String>,
}

impl ClusterClient {
    /// Create a client for the configured endpoint
    #[must_use]
    pub fn new(config: &ClusterConfig) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    /// Fetch the current remote object, or `None` if it does not exist
    pub fn get(&self, resource: &ResourceDescriptor) -> Result<Option<Value>> {
        let url = self.object_url(resource);
        let mut request = self.agent.get(&url).header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }
        match request.call() {
            Ok(mut response) => Ok(Some(response.body_mut().read_json()?)),
            Err(ureq::Error::StatusCode(404)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Whether the named object currently exists
    pub fn exists(&self, resource: &ResourceDescriptor) -> Result<bool> {
        Ok(self.get(resource)?.is_some())
    }

    /// Create the object from its manifest
    pub fn create(&self, resource: &ResourceDescriptor) -> Result<()> {
        let url = self.collection_url(resource);
        let mut request = self.agent.post(&url).header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }
        request.send_json(resource.manifest())?;
        Ok(())
    }

    /// Replace the remote object with the manifest
    pub fn replace(&self, resource: &ResourceDescriptor) -> Result<()> {
        let url = self.object_url(resource);
        let mut request = self.agent.put(&url).header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }
        request.send_json(resource.manifest())?;
        Ok(())
    }

    /// Request deletion of the object; deleting an already-absent object is
    /// not an error
    pub fn delete(&self, resource: &ResourceDescriptor) -> Result<()> {
        let url = self.object_url(resource);
        let mut request = self
            .agent
            .delete(&url)
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }
        match request.call() {
            Ok(_) | Err(ureq::Error::StatusCode(404)) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// URL of the collection the resource belongs to
    fn collection_url(&self, resource: &ResourceDescriptor) -> String {
        let plural = format!("{}s", resource.kind().to_lowercase());
        match resource.namespace() {
            Some(ns) => format!(
                "{}/apis/{}/namespaces/{}/{}",
                self.base_url,
                resource.api_version(),
                ns,
                plural
            ),
            None => format!("{}/apis/{}/{}", self.base_url, resource.api_version(), plural),
        }
    }

    /// URL of the object itself
    fn object_url(&self, resource: &ResourceDescriptor) -> String {
        format!("{}/{}", self.collection_url(resource), resource.name())
    }
}
