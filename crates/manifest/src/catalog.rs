//! Resource type catalog
//!
//! Decoding is split across resource families, each a small capability set:
//! whether it recognizes an apiVersion/kind pair, and how to decode a
//! document of that family. The catalog is plain data owned by the caller,
//! not a process-wide registry.

use crate::error::DecodeError;
use reconcile::ResourceDescriptor;
use serde_json::Value;

/// One family of resource kinds the loader can decode
pub trait ResourceFamily: Send + Sync {
    /// Family name for diagnostics
    fn name(&self) -> &'static str;

    /// Whether this family can decode the given apiVersion/kind pair
    fn recognizes(&self, api_version: &str, kind: &str) -> bool;

    /// Decode one manifest document into a descriptor
    fn decode(&self, document: &Value) -> Result<ResourceDescriptor, DecodeError>;
}

/// Un-grouped kinds (`apiVersion: v1` and friends)
pub struct CoreFamily;

impl ResourceFamily for CoreFamily {
    fn name(&self) -> &'static str {
        "core"
    }

    fn recognizes(&self, api_version: &str, _kind: &str) -> bool {
        !api_version.contains('/')
    }

    fn decode(&self, document: &Value) -> Result<ResourceDescriptor, DecodeError> {
        decode_object(document)
    }
}

/// Grouped APIs (`apiVersion: group/version`), which covers extension kinds
/// and every custom resource
pub struct GroupedFamily;

impl ResourceFamily for GroupedFamily {
    fn name(&self) -> &'static str {
        "grouped"
    }

    fn recognizes(&self, api_version: &str, _kind: &str) -> bool {
        api_version.contains('/')
    }

    fn decode(&self, document: &Value) -> Result<ResourceDescriptor, DecodeError> {
        decode_object(document)
    }
}

/// Ordered collection of resource families; first match decodes
pub struct TypeCatalog {
    families: Vec<Box<dyn ResourceFamily>>,
}

impl TypeCatalog {
    /// Catalog with the built-in families registered
    pub fn with_defaults() -> Self {
        Self {
            families: vec![Box::new(CoreFamily), Box::new(GroupedFamily)],
        }
    }

    /// Catalog with no families; decodes nothing until some are registered
    pub fn empty() -> Self {
        Self {
            families: Vec::new(),
        }
    }

    /// Register an additional family; consulted after existing ones
    pub fn register(&mut self, family: Box<dyn ResourceFamily>) {
        self.families.push(family);
    }

    /// Whether any registered family recognizes the pair
    pub fn recognizes(&self, api_version: &str, kind: &str) -> bool {
        self.families
            .iter()
            .any(|f| f.recognizes(api_version, kind))
    }

    /// Decode one document through the first family that recognizes it
    pub fn decode(&self, document: &Value) -> Result<ResourceDescriptor, DecodeError> {
        let api_version = str_field(document, "apiVersion")?;
        let kind = str_field(document, "kind")?;
        match self
            .families
            .iter()
            .find(|f| f.recognizes(api_version, kind))
        {
            Some(family) => {
                log::debug!("decoding {kind} via the {} family", family.name());
                family.decode(document)
            }
            None => Err(DecodeError::Unrecognized {
                api_version: api_version.to_string(),
                kind: kind.to_string(),
            }),
        }
    }
}

/// Shared field extraction: identity comes from apiVersion, kind, and
/// metadata; the descriptor keeps the whole document as its manifest.
fn decode_object(document: &Value) -> Result<ResourceDescriptor, DecodeError> {
    let api_version = str_field(document, "apiVersion")?;
    let kind = str_field(document, "kind")?;
    let metadata = document
        .get("metadata")
        .ok_or(DecodeError::MissingField("metadata"))?;
    let name = metadata
        .get("name")
        .ok_or(DecodeError::MissingField("metadata.name"))?
        .as_str()
        .ok_or(DecodeError::NotAString("metadata.name"))?;
    let namespace = metadata
        .get("namespace")
        .and_then(Value::as_str)
        .map(String::from);

    Ok(ResourceDescriptor::new(
        api_version,
        kind,
        name,
        namespace,
        document.clone(),
    ))
}

fn str_field<'a>(document: &'a Value, field: &'static str) -> Result<&'a str, DecodeError> {
    document
        .get(field)
        .ok_or(DecodeError::MissingField(field))?
        .as_str()
        .ok_or(DecodeError::NotAString(field))
}
