//! Semantic value types.
//!
//! Storage types describe how a value is persisted; semantic types describe
//! what a client sends and receives. Filters declare which semantic types
//! they support, and descriptors advertise them.

use super::attribute::{Attribute, StorageType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Int,
    Bool,
    Datetime,
    Float,
    String,
    /// Reference to data of another family.
    Entity,
    /// Catch-all for unrecognized storage types. Descriptive only.
    Mixed,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Int => "int",
            SemanticType::Bool => "bool",
            SemanticType::Datetime => "datetime",
            SemanticType::Float => "float",
            SemanticType::String => "string",
            SemanticType::Entity => "entity",
            SemanticType::Mixed => "mixed",
        }
    }
}

/// Map an attribute's storage type to its semantic type. Never fails.
pub fn classify(attribute: &Attribute) -> SemanticType {
    match attribute.storage_type {
        StorageType::Integer => SemanticType::Int,
        StorageType::Boolean => SemanticType::Bool,
        StorageType::Date | StorageType::Datetime => SemanticType::Datetime,
        StorageType::Decimal => SemanticType::Float,
        StorageType::ShortText | StorageType::LongText => SemanticType::String,
        StorageType::EntityReference => SemanticType::Entity,
        StorageType::Unrecognized(_) => SemanticType::Mixed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_tag(tag: &str) -> SemanticType {
        classify(&Attribute::new("x", StorageType::from(tag)))
    }

    #[test]
    fn storage_types_map_to_semantic_types() {
        assert_eq!(classify_tag("integer"), SemanticType::Int);
        assert_eq!(classify_tag("boolean"), SemanticType::Bool);
        assert_eq!(classify_tag("date"), SemanticType::Datetime);
        assert_eq!(classify_tag("datetime"), SemanticType::Datetime);
        assert_eq!(classify_tag("decimal"), SemanticType::Float);
        assert_eq!(classify_tag("short-text"), SemanticType::String);
        assert_eq!(classify_tag("long-text"), SemanticType::String);
        assert_eq!(classify_tag("entity-reference"), SemanticType::Entity);
    }

    #[test]
    fn unrecognized_storage_is_mixed() {
        assert_eq!(classify_tag("geo-point"), SemanticType::Mixed);
    }

    #[test]
    fn semantic_types_serialize_lowercase() {
        let json = serde_json::to_string(&SemanticType::Datetime).unwrap();
        assert_eq!(json, "\"datetime\"");
        let parsed: SemanticType = serde_json::from_str("\"float\"").unwrap();
        assert_eq!(parsed, SemanticType::Float);
        assert_eq!(SemanticType::Entity.as_str(), "entity");
    }
}
