//! # Manifest
//!
//! Loading of declarative resource manifests: reads files holding one or
//! more YAML documents and decodes each document into a
//! [`reconcile::ResourceDescriptor`] through a catalog of resource
//! families.
//!
//! The catalog replaces the usual global type registry with plain data: a
//! [`ResourceFamily`] is a capability set (`recognizes`, `decode`) and the
//! [`TypeCatalog`] is an ordered list of them, constructed by the caller.

pub mod catalog;
pub mod error;
pub mod loader;

// Re-export main types at crate root
pub use catalog::{CoreFamily, GroupedFamily, ResourceFamily, TypeCatalog};
pub use error::{DecodeError, Error, Result};
pub use loader::ManifestLoader;
