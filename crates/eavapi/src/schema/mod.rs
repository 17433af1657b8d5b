//! # Schema Registry
//!
//! Runtime schema definitions for EAV data. Instead of compile-time structs,
//! each kind of entity is described by a [`Family`]: a backing data class and
//! an ordered set of typed [`Attribute`]s.
//!
//! - **Storage types**: how a value is persisted ([`StorageType`])
//! - **Semantic types**: what a client sees ([`SemanticType`], via [`classify`])
//! - **Families**: named schemas with optional label/identifier attributes
//! - **Registry**: every family, indexed by code and by backing type
//!
//! ## Attribute Kinds
//!
//! | Kind | Flags | Example |
//! |------|-------|---------|
//! | Scalar | none | `price` (decimal) |
//! | Relation | `is_relation` | `brand` pointing at `Brand` |
//! | Embedded | `is_embedded` | `address` stored inline |
//! | Collection | `is_collection` plus one of the above | `tags` |
//!
//! Relation and embedded attributes list their target families in the
//! `allowed_families` option. Dotted filter paths can only traverse an
//! attribute that allows exactly one family.

mod attribute;
mod family;
mod registry;
mod types;

pub use attribute::{Attribute, StorageType, ALLOWED_FAMILIES, SERIALIZER_OPTIONS};
pub use family::{Family, FamilyBuilder};
pub use registry::{normalize_type_name, FamilyRegistry};
pub use types::{classify, SemanticType};
