//! Ambient control-plane configuration
//!
//! Connection details come from the process environment, never from flags:
//! the synchronizer is expected to run where credentials are already
//! provisioned (CI jobs, operator shells).

use crate::error::{Error, Result};
use std::env;

/// Environment variable naming the control-plane endpoint
pub const ENDPOINT_VAR: &str = "RESYNC_API_URL";

/// Environment variable holding an optional bearer token
pub const TOKEN_VAR: &str = "RESYNC_API_TOKEN";

/// Connection details for one control plane
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Endpoint base URL, without a trailing slash
    pub base_url: String,
    /// Bearer token, if the endpoint needs one
    pub token: Option<String>,
}

impl ClusterConfig {
    /// Read the connection details from the process environment
    pub fn from_env() -> Result<Self> {
        let base_url = env::var(ENDPOINT_VAR).map_err(|_| Error::MissingConfig(ENDPOINT_VAR))?;
        let token = env::var(TOKEN_VAR).ok().filter(|t| !t.is_empty());
        Self::new(base_url, token)
    }

    /// Build a config from explicit values
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let base_url = base_url.into();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::Endpoint(format!(
                "{base_url}: expected an http(s) URL"
            )));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }
}
