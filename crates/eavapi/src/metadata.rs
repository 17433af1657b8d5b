//! API documentation metadata derived from the schema.
//!
//! The API layer asks which properties a resource exposes and what each one
//! looks like. Both answers come straight from the family governing the resource.

use crate::error::Result;
use crate::resolve::FamilyResolver;
use crate::schema::{classify, FamilyRegistry, SemanticType, SERIALIZER_OPTIONS};
use serde::Serialize;

/// Serializer option bounding how deep related data is embedded.
pub const MAX_DEPTH_KEY: &str = "max_depth";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyMetadata {
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,
    pub description: Option<String>,
    pub required: bool,
    pub identifier: bool,
    pub subresource: Option<SubresourceMetadata>,
}

/// Related data reachable through a relation or embedded attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubresourceMetadata {
    /// Code of the target family.
    pub family: String,
    pub collection: bool,
    pub max_depth: u64,
}

/// Attribute codes of the family governing `resource`, minus `ignored`.
pub fn property_names(registry: &FamilyRegistry, resource: &str, ignored: &[String]) -> Result<Vec<String>> {
    let family = FamilyResolver::new(registry).resolve(resource)?;
    Ok(family
        .attributes()
        .keys()
        .filter(|code| !ignored.contains(code))
        .cloned()
        .collect())
}

pub fn property_metadata(registry: &FamilyRegistry, resource: &str, property: &str) -> Result<PropertyMetadata> {
    let family = FamilyResolver::new(registry).resolve(resource)?;
    let attribute = family.get_attribute(property)?;

    // A subresource needs an unambiguous target family.
    let subresource = attribute
        .is_reference()
        .then(|| attribute.single_allowed_family())
        .flatten()
        .map(|target| SubresourceMetadata {
            family: target.to_string(),
            collection: attribute.is_collection,
            max_depth: attribute
                .get_option(SERIALIZER_OPTIONS)
                .and_then(|options| options.get(MAX_DEPTH_KEY))
                .and_then(|depth| depth.as_u64())
                .unwrap_or(0),
        });

    let identifier = family
        .identifier_attribute()
        .is_some_and(|identifier| identifier.code == attribute.code);

    Ok(PropertyMetadata {
        semantic_type: classify(attribute),
        description: attribute.description().map(str::to_string),
        required: attribute.required,
        identifier,
        subresource,
    })
}
