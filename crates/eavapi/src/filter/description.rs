use super::strategy::SearchStrategy;
use crate::schema::{Attribute, SemanticType};
use indexmap::IndexMap;
use serde::Serialize;

/// One advertised filter parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterDescriptor {
    pub property: String,
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,
    pub required: bool,
    pub strategy: Option<String>,
}

impl FilterDescriptor {
    pub fn new(property: &str, semantic_type: SemanticType, strategy: Option<&str>) -> Self {
        Self {
            property: property.to_string(),
            semantic_type,
            required: false,
            strategy: strategy.map(str::to_string),
        }
    }
}

/// Ordered parameter name to descriptor.
pub type FilterDescription = IndexMap<String, FilterDescriptor>;

/// Entries for a value filter.
///
/// References are always matched by identifier, so they get `property` and
/// `property[]` as exact-match strings. Then `property` is (re)declared with
/// its semantic type, plus `property[]` when the strategy is exact. Later
/// inserts overwrite earlier ones in place.
pub(crate) fn append_value_entries(
    description: &mut FilterDescription,
    attribute: &Attribute,
    property: &str,
    semantic_type: SemanticType,
    strategy: Option<&str>,
) {
    let exact = SearchStrategy::Exact.as_str();
    let list_key = format!("{}[]", property);

    if attribute.is_reference() {
        for key in [property.to_string(), list_key.clone()] {
            description.insert(key, FilterDescriptor::new(property, SemanticType::String, Some(exact)));
        }
    }

    let strategy = strategy.unwrap_or(exact);
    description.insert(
        property.to_string(),
        FilterDescriptor::new(property, semantic_type, Some(strategy)),
    );
    if strategy == exact {
        description.insert(list_key, FilterDescriptor::new(property, semantic_type, Some(strategy)));
    }
}

/// The single `order[property]` entry of an order filter, carrying the
/// configured default direction as its strategy.
pub(crate) fn append_order_entry(
    description: &mut FilterDescription,
    property: &str,
    semantic_type: SemanticType,
    strategy: Option<&str>,
) {
    description.insert(
        format!("order[{}]", property),
        FilterDescriptor::new(property, semantic_type, strategy),
    );
}
