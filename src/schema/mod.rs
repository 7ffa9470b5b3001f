//! Seed schemas
//!
//! Built-in descriptors for the two waste-management tables, a registry
//! that can load more from JSON, and inference of a descriptor from sample
//! input.

pub mod descriptor;
pub mod infer;
pub mod registry;

pub use descriptor::{FieldKind, FieldSpec, SchemaDescriptor};
pub use infer::infer_descriptor;
pub use registry::{SchemaId, SchemaRegistry};
