//! Manifest loading - files to resource descriptors

use crate::catalog::TypeCatalog;
use crate::error::{Error, Result};
use reconcile::ResourceDescriptor;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads manifest files and decodes their documents through a type catalog.
///
/// Inputs may hold any number of YAML documents separated by `---`; empty
/// documents are skipped. Every error carries the path of the offending
/// file.
pub struct ManifestLoader {
    catalog: TypeCatalog,
}

impl ManifestLoader {
    pub fn new(catalog: TypeCatalog) -> Self {
        Self { catalog }
    }

    /// Loader with the built-in resource families
    pub fn with_defaults() -> Self {
        Self::new(TypeCatalog::with_defaults())
    }

    /// Read and decode every document from every file, in input order
    pub fn load_files(&self, paths: &[PathBuf]) -> Result<Vec<ResourceDescriptor>> {
        let mut resources = Vec::new();
        for path in paths {
            log::info!("reading manifest {}", path.display());
            let contents = fs::read_to_string(path).map_err(|source| Error::Io {
                path: path.clone(),
                source,
            })?;
            resources.extend(self.parse(&contents, path)?);
        }
        Ok(resources)
    }

    /// Decode every document in one multi-document YAML source.
    ///
    /// `origin` names the source in errors.
    pub fn parse(&self, contents: &str, origin: &Path) -> Result<Vec<ResourceDescriptor>> {
        let mut resources = Vec::new();
        for document in serde_yaml::Deserializer::from_str(contents) {
            let value =
                serde_json::Value::deserialize(document).map_err(|source| Error::Parse {
                    path: origin.to_path_buf(),
                    source,
                })?;
            if value.is_null() {
                // Empty document between separators
                continue;
            }
            let descriptor = self
                .catalog
                .decode(&value)
                .map_err(|source| Error::Document {
                    path: origin.to_path_buf(),
                    source,
                })?;
            resources.push(descriptor);
        }
        Ok(resources)
    }
}
