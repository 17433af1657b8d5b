//! # Filters
//!
//! An [`EavFilter`] turns request parameters into conditions on a
//! [`QueryBuilder`]. Every filter runs the same pipeline; its [`FilterKind`]
//! only decides how one raw value becomes a condition.
//!
//! ## Pipeline
//!
//! 1. No request context: nothing happens.
//! 2. Extract parameters. Declared dotted properties that arrived flattened
//!    (`brand_country`) trigger a re-parse of the raw query string.
//! 3. Order filters narrow the parameters to the `order` map.
//! 4. For every parameter the filter handles: resolve the family, resolve the
//!    attribute path, skip attributes whose semantic type is not supported,
//!    then compile the value.
//! 5. AND the resulting handlers and apply them. No handlers applies the
//!    trivially-true condition.
//!
//! Resolution errors abort `apply`. `describe` omits unknown properties instead.
//!
//! ## Kinds
//!
//! | Kind | Raw value becomes |
//! |------|-------------------|
//! | `Boolean` | `equals(bool)`; `true`/`1` and `false`/`0`, else string truthiness |
//! | `Numeric` | `equals(raw)`; coercion is left to the builder |
//! | `Search` | `like(pattern)` with wildcards placed by [`SearchStrategy`] |
//! | `Order` | an ordering clause; no condition |

use crate::error::{EavError, Result};
use crate::query::{AttributeQueryBuilder, FilterValue, OrderDirection, QueryBuilder};
use crate::request::{ParamValue, QueryParameters, RequestContext};
use crate::resolve::{is_nested_property, AttributePathResolver, FamilyResolver};
use crate::schema::{classify, Family, FamilyRegistry, SemanticType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

mod description;
mod strategy;

pub use description::{FilterDescription, FilterDescriptor};
pub use strategy::{strip_wildcards, SearchStrategy};

/// Reserved parameter read by order filters.
pub const ORDER_PARAMETER: &str = "order";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Boolean,
    Numeric,
    Search,
    Order,
}

impl FilterKind {
    /// Semantic types handled when a filter does not declare its own.
    pub fn default_supported_types(&self) -> &'static [SemanticType] {
        match self {
            FilterKind::Boolean => &[SemanticType::Bool],
            FilterKind::Numeric => &[SemanticType::Int, SemanticType::Float],
            FilterKind::Search => &[SemanticType::String],
            FilterKind::Order => &[
                SemanticType::Int,
                SemanticType::Bool,
                SemanticType::Datetime,
                SemanticType::Float,
                SemanticType::String,
            ],
        }
    }
}

/// Which properties a filter handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertySet {
    /// Every attribute of the family, default strategy.
    All,
    /// Only these properties, each with an optional strategy.
    Explicit(IndexMap<String, Option<String>>),
}

impl PropertySet {
    pub fn contains(&self, property: &str) -> bool {
        match self {
            PropertySet::All => true,
            PropertySet::Explicit(properties) => properties.contains_key(property),
        }
    }

    pub fn strategy(&self, property: &str) -> Option<&str> {
        match self {
            PropertySet::All => None,
            PropertySet::Explicit(properties) => properties.get(property)?.as_deref(),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Option<&'static str>)> for PropertySet {
    fn from_iter<I: IntoIterator<Item = (K, Option<&'static str>)>>(iter: I) -> Self {
        PropertySet::Explicit(
            iter.into_iter()
                .map(|(name, strategy)| (name.into(), strategy.map(str::to_string)))
                .collect(),
        )
    }
}

/// Configuration held by one filter instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpecification {
    pub supported_types: Vec<SemanticType>,
    pub properties: PropertySet,
    /// Pin the filter to this family instead of resolving it from the resource type.
    pub family: Option<String>,
}

impl FilterSpecification {
    pub fn new(supported_types: impl IntoIterator<Item = SemanticType>) -> Self {
        Self {
            supported_types: supported_types.into_iter().collect(),
            properties: PropertySet::All,
            family: None,
        }
    }

    /// The kind's default supported types, every property, no pinned family.
    pub fn for_kind(kind: FilterKind) -> Self {
        Self::new(kind.default_supported_types().iter().copied())
    }

    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn supports(&self, semantic_type: SemanticType) -> bool {
        self.supported_types.contains(&semantic_type)
    }
}

/// Coerce a raw boolean parameter. Outside the `true`/`1`/`false`/`0`
/// tokens only the empty string is false.
pub fn coerce_bool(raw: &str) -> bool {
    match raw {
        "true" | "1" => true,
        "false" | "0" => false,
        other => !other.is_empty(),
    }
}

/// A configured filter, shared across requests.
#[derive(Debug, Clone)]
pub struct EavFilter {
    kind: FilterKind,
    spec: FilterSpecification,
    registry: Arc<FamilyRegistry>,
}

impl EavFilter {
    /// Search strategies are validated here so a bad name fails at startup.
    pub fn new(kind: FilterKind, spec: FilterSpecification, registry: Arc<FamilyRegistry>) -> Result<Self> {
        if kind == FilterKind::Search {
            if let PropertySet::Explicit(properties) = &spec.properties {
                for strategy in properties.values() {
                    SearchStrategy::parse(strategy.as_deref())?;
                }
            }
        }
        Ok(Self {
            kind,
            spec,
            registry,
        })
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn specification(&self) -> &FilterSpecification {
        &self.spec
    }

    /// Attach this filter's conditions for the current request to `query`.
    pub fn apply<Q: QueryBuilder>(
        &self,
        request: Option<&RequestContext>,
        query: &mut Q,
        resource: &str,
        operation: Option<&str>,
    ) -> Result<()> {
        let Some(request) = request else {
            log::debug!("{:?} filter on '{}' outside a request, skipped", self.kind, resource);
            return Ok(());
        };

        let mut parameters = self.extract_parameters(request);
        if self.kind == FilterKind::Order {
            parameters = match parameters.shift_remove(ORDER_PARAMETER) {
                Some(ParamValue::Map(order)) => order,
                Some(other) => {
                    log::warn!("ignoring non-map '{}' parameter: {:?}", ORDER_PARAMETER, other);
                    return Ok(());
                }
                None => return Ok(()),
            };
        }

        let resolver = AttributePathResolver::new(&self.registry);
        let mut handlers = Vec::new();
        for (property, value) in &parameters {
            if !self.spec.properties.contains(property) {
                continue;
            }

            let family = self.family(resource)?;
            let path = resolver.resolve_path(family, property)?;
            let semantic_type = classify(path.attribute);
            if semantic_type == SemanticType::Mixed || !self.spec.supports(semantic_type) {
                log::debug!(
                    "{:?} filter skips '{}': type '{}' not supported",
                    self.kind,
                    property,
                    semantic_type.as_str()
                );
                continue;
            }

            let target = query.attribute(&path);
            let strategy = self.spec.properties.strategy(property);
            if let Some(handler) = self.compile_value(query, &target, property, value, strategy)? {
                handlers.push(handler);
            }
        }

        log::debug!(
            "{:?} filter on '{}' ({}) built {} condition(s)",
            self.kind,
            resource,
            operation.unwrap_or("-"),
            handlers.len()
        );
        let combined = query.and(handlers);
        query.apply(combined);
        Ok(())
    }

    /// Advertise the parameters this filter accepts for `resource`.
    pub fn describe(&self, resource: &str) -> Result<FilterDescription> {
        let family = self.family(resource)?;
        let properties: Vec<(String, Option<String>)> = match &self.spec.properties {
            PropertySet::All => family
                .attributes()
                .keys()
                .map(|code| (code.clone(), None))
                .collect(),
            PropertySet::Explicit(properties) => properties
                .iter()
                .map(|(name, strategy)| (name.clone(), strategy.clone()))
                .collect(),
        };

        let resolver = AttributePathResolver::new(&self.registry);
        let mut description = FilterDescription::new();
        for (property, strategy) in properties {
            let attribute = match resolver.resolve(family, &property) {
                Ok(attribute) => attribute,
                Err(EavError::UnknownAttribute { .. }) => {
                    log::debug!("'{}' not in family '{}', omitted", property, family.code());
                    continue;
                }
                Err(e) => return Err(e),
            };
            let semantic_type = classify(attribute);
            if !self.spec.supports(semantic_type) {
                continue;
            }

            match self.kind {
                FilterKind::Order => description::append_order_entry(
                    &mut description,
                    &property,
                    semantic_type,
                    strategy.as_deref(),
                ),
                _ => description::append_value_entries(
                    &mut description,
                    attribute,
                    &property,
                    semantic_type,
                    strategy.as_deref(),
                ),
            }
        }
        Ok(description)
    }

    fn family(&self, resource: &str) -> Result<&Family> {
        FamilyResolver::new(&self.registry).resolve_for(self.spec.family.as_deref(), resource)
    }

    fn extract_parameters(&self, request: &RequestContext) -> QueryParameters {
        let needs_expansion = match &self.spec.properties {
            PropertySet::All => false,
            PropertySet::Explicit(properties) => properties
                .keys()
                .any(|p| is_nested_property(p) && request.has(&p.replace('.', "_"))),
        };
        if needs_expansion {
            request.expanded_query()
        } else {
            request.query().clone()
        }
    }

    fn compile_value<Q: QueryBuilder>(
        &self,
        query: &mut Q,
        target: &Q::Attribute,
        property: &str,
        value: &ParamValue,
        strategy: Option<&str>,
    ) -> Result<Option<Q::Handler>> {
        if let ParamValue::Map(_) = value {
            log::warn!("ignoring map value for '{}'", property);
            return Ok(None);
        }

        let handler = match self.kind {
            FilterKind::Boolean => {
                let flag = match value {
                    ParamValue::Scalar(raw) => coerce_bool(raw),
                    _ => !value.scalars().is_empty(),
                };
                Some(target.equals(FilterValue::Bool(flag)))
            }
            FilterKind::Numeric => Some(target.equals(to_filter_value(value, |raw| raw.to_string()))),
            FilterKind::Search => {
                let strategy = SearchStrategy::parse(strategy)?;
                match value {
                    ParamValue::Scalar(raw) => Some(target.like(&strategy.pattern(raw))),
                    _ if strategy == SearchStrategy::Exact => Some(target.equals(to_filter_value(
                        value,
                        |raw| strip_wildcards(raw).to_string(),
                    ))),
                    _ => {
                        log::warn!("ignoring list value for '{}' under '{}' strategy", property, strategy);
                        None
                    }
                }
            }
            FilterKind::Order => {
                let Some(token) = value.as_str() else {
                    log::warn!("ignoring non-scalar order for '{}'", property);
                    return Ok(None);
                };
                let token = match (token, strategy) {
                    ("" | "0", Some(default)) => default,
                    _ => token,
                };
                match OrderDirection::parse(token) {
                    Some(direction) => query.order_by(target, direction),
                    None => log::warn!("ignoring order direction '{}' for '{}'", token, property),
                }
                None
            }
        };
        Ok(handler)
    }
}

fn to_filter_value(value: &ParamValue, convert: impl Fn(&str) -> String) -> FilterValue {
    match value {
        ParamValue::Scalar(raw) => FilterValue::Text(convert(raw)),
        _ => FilterValue::List(value.scalars().into_iter().map(convert).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::memory::{MemoryAttribute, MemoryQuery, Predicate};
    use crate::store::InMemoryStore;
    use crate::test_utils::{catalog_registry, BRAND_CLASS, PRODUCT_CLASS};

    fn registry() -> Arc<FamilyRegistry> {
        Arc::new(catalog_registry())
    }

    fn filter(kind: FilterKind, properties: PropertySet) -> EavFilter {
        let spec = FilterSpecification::for_kind(kind).with_properties(properties);
        EavFilter::new(kind, spec, registry()).unwrap()
    }

    fn target(hops: &[&str], family: &str, attribute: &str) -> MemoryAttribute {
        MemoryAttribute {
            hops: hops.iter().map(|h| h.to_string()).collect(),
            family: family.to_string(),
            attribute: attribute.to_string(),
        }
    }

    /// Apply `filter` to a fresh query and return the single applied condition plus ordering.
    fn run(
        filter: &EavFilter,
        request: &RequestContext,
    ) -> (Predicate, Vec<(MemoryAttribute, OrderDirection)>) {
        let registry = catalog_registry();
        let store = InMemoryStore::new();
        let mut query = MemoryQuery::new(&store, &registry, "Product");
        filter
            .apply(Some(request), &mut query, PRODUCT_CLASS, Some("get"))
            .unwrap();
        assert_eq!(query.conditions().len(), 1);
        (query.conditions()[0].clone(), query.ordering().to_vec())
    }

    #[test]
    fn apply_without_request_is_inert() {
        let registry = catalog_registry();
        let store = InMemoryStore::new();
        let mut query = MemoryQuery::new(&store, &registry, "Product");
        let filter = filter(FilterKind::Numeric, PropertySet::All);

        filter.apply(None, &mut query, PRODUCT_CLASS, None).unwrap();
        assert!(query.conditions().is_empty());
        assert!(query.ordering().is_empty());
    }

    #[test]
    fn numeric_equality_on_raw_value() {
        let filter = filter(FilterKind::Numeric, [("price", None)].into_iter().collect());
        let request = RequestContext::from_query_string("price=19.99");

        let (condition, _) = run(&filter, &request);
        assert_eq!(
            condition,
            Predicate::And(vec![Predicate::Equals {
                target: target(&[], "Product", "price"),
                value: FilterValue::Text("19.99".into()),
            }])
        );
    }

    #[test]
    fn numeric_list_is_an_in_condition() {
        let filter = filter(FilterKind::Numeric, [("stock", None)].into_iter().collect());
        let request = RequestContext::from_query_string("stock[]=1&stock[]=2");

        let (condition, _) = run(&filter, &request);
        assert_eq!(
            condition,
            Predicate::And(vec![Predicate::Equals {
                target: target(&[], "Product", "stock"),
                value: FilterValue::List(vec!["1".into(), "2".into()]),
            }])
        );
    }

    #[test]
    fn undeclared_parameters_are_ignored() {
        let filter = filter(FilterKind::Numeric, [("price", None)].into_iter().collect());
        let request = RequestContext::from_query_string("page=2&colour=red");

        let (condition, _) = run(&filter, &request);
        assert_eq!(condition, Predicate::True);
    }

    #[test]
    fn unknown_property_under_all_is_an_error() {
        let registry = catalog_registry();
        let store = InMemoryStore::new();
        let mut query = MemoryQuery::new(&store, &registry, "Product");
        let filter = filter(FilterKind::Numeric, PropertySet::All);
        let request = RequestContext::from_query_string("colour=red");

        let err = filter
            .apply(Some(&request), &mut query, PRODUCT_CLASS, None)
            .unwrap_err();
        assert!(matches!(err, EavError::UnknownAttribute { .. }));
        assert_eq!(err.class(), crate::error::ErrorClass::Client);
    }

    #[test]
    fn unsupported_types_are_skipped() {
        let filter = filter(FilterKind::Numeric, PropertySet::All);
        let request = RequestContext::from_query_string("name=shoe&price=10");

        let (condition, _) = run(&filter, &request);
        assert_eq!(
            condition,
            Predicate::And(vec![Predicate::Equals {
                target: target(&[], "Product", "price"),
                value: FilterValue::Text("10".into()),
            }])
        );
    }

    #[test]
    fn flattened_dotted_key_is_recovered() {
        let spec = FilterSpecification::new([SemanticType::String])
            .with_properties([("brand.country", None)].into_iter().collect());
        let filter = EavFilter::new(FilterKind::Numeric, spec, registry()).unwrap();
        let request = RequestContext::from_query_string("brand.country=FR");
        assert!(request.has("brand_country"));

        let (condition, _) = run(&filter, &request);
        assert_eq!(
            condition,
            Predicate::And(vec![Predicate::Equals {
                target: target(&["brand"], "Brand", "country"),
                value: FilterValue::Text("FR".into()),
            }])
        );
    }

    #[test]
    fn boolean_tokens() {
        assert!(coerce_bool("true"));
        assert!(coerce_bool("1"));
        assert!(!coerce_bool("false"));
        assert!(!coerce_bool("0"));
        assert!(!coerce_bool(""));
    }

    #[test]
    fn boolean_truthiness_of_other_strings() {
        assert!(coerce_bool("no"));
        assert!(coerce_bool("TRUE"));
        assert!(coerce_bool("FALSE"));
        assert!(coerce_bool("off"));
    }

    #[test]
    fn boolean_filter_compiles_equality() {
        let filter = filter(FilterKind::Boolean, PropertySet::All);
        for (raw, expected) in [("true", true), ("1", true), ("false", false), ("0", false), ("", false)] {
            let request: RequestContext = [("active", raw)].into_iter().collect();
            let (condition, _) = run(&filter, &request);
            assert_eq!(
                condition,
                Predicate::And(vec![Predicate::Equals {
                    target: target(&[], "Product", "active"),
                    value: FilterValue::Bool(expected),
                }]),
                "raw value {:?}",
                raw
            );
        }
    }

    #[test]
    fn search_strips_wildcards_under_exact() {
        let filter = filter(FilterKind::Search, [("name", None)].into_iter().collect());
        let request = RequestContext::from_query_string("name=%25shoe%25");

        let (condition, _) = run(&filter, &request);
        assert_eq!(
            condition,
            Predicate::And(vec![Predicate::Like {
                target: target(&[], "Product", "name"),
                pattern: "shoe".into(),
            }])
        );
    }

    #[test]
    fn search_partial_does_not_double_wildcards() {
        let filter = filter(FilterKind::Search, [("name", Some("partial"))].into_iter().collect());
        for raw in ["shoe", "%25shoe%25"] {
            let request = RequestContext::from_query_string(&format!("name={}", raw));
            let (condition, _) = run(&filter, &request);
            assert_eq!(
                condition,
                Predicate::And(vec![Predicate::Like {
                    target: target(&[], "Product", "name"),
                    pattern: "%shoe%".into(),
                }])
            );
        }
    }

    #[test]
    fn search_list_under_exact_is_equality() {
        let filter = filter(FilterKind::Search, [("sku", None)].into_iter().collect());
        let request = RequestContext::from_query_string("sku[]=%25A&sku[]=B");

        let (condition, _) = run(&filter, &request);
        assert_eq!(
            condition,
            Predicate::And(vec![Predicate::Equals {
                target: target(&[], "Product", "sku"),
                value: FilterValue::List(vec!["A".into(), "B".into()]),
            }])
        );
    }

    #[test]
    fn search_list_under_partial_is_dropped() {
        let filter = filter(FilterKind::Search, [("sku", Some("partial"))].into_iter().collect());
        let request = RequestContext::from_query_string("sku[]=A");

        let (condition, _) = run(&filter, &request);
        assert_eq!(condition, Predicate::True);
    }

    #[test]
    fn map_values_are_dropped() {
        let filter = filter(FilterKind::Numeric, [("price", None)].into_iter().collect());
        let request = RequestContext::from_query_string("price[gt]=10");

        let (condition, _) = run(&filter, &request);
        assert_eq!(condition, Predicate::True);
    }

    #[test]
    fn invalid_search_strategy_fails_at_construction() {
        let spec = FilterSpecification::for_kind(FilterKind::Search)
            .with_properties([("name", Some("fuzzy"))].into_iter().collect());
        let err = EavFilter::new(FilterKind::Search, spec, registry()).unwrap_err();
        assert!(matches!(err, EavError::InvalidStrategy(_)));
    }

    #[test]
    fn strategy_names_are_not_checked_for_other_kinds() {
        let spec = FilterSpecification::for_kind(FilterKind::Order)
            .with_properties([("price", Some("desc"))].into_iter().collect());
        assert!(EavFilter::new(FilterKind::Order, spec, registry()).is_ok());
    }

    #[test]
    fn order_directions_ignore_case() {
        let filter = filter(FilterKind::Order, PropertySet::All);
        for (token, expected) in [
            ("asc", OrderDirection::Asc),
            ("ASC", OrderDirection::Asc),
            ("desc", OrderDirection::Desc),
            ("DESC", OrderDirection::Desc),
        ] {
            let request = RequestContext::from_query_string(&format!("order[price]={}", token));
            let (condition, ordering) = run(&filter, &request);
            assert_eq!(condition, Predicate::True);
            assert_eq!(ordering, vec![(target(&[], "Product", "price"), expected)]);
        }
    }

    #[test]
    fn order_with_bad_token_is_silently_ignored() {
        let filter = filter(FilterKind::Order, PropertySet::All);
        let request = RequestContext::from_query_string("order[price]=banana");

        let (condition, ordering) = run(&filter, &request);
        assert_eq!(condition, Predicate::True);
        assert!(ordering.is_empty());
    }

    #[test]
    fn order_falls_back_to_configured_direction() {
        let filter = filter(FilterKind::Order, [("price", Some("desc"))].into_iter().collect());
        let request = RequestContext::from_query_string("order[price]");

        let (_, ordering) = run(&filter, &request);
        assert_eq!(ordering, vec![(target(&[], "Product", "price"), OrderDirection::Desc)]);
    }

    #[test]
    fn order_keeps_request_order_and_dotted_keys() {
        let filter = filter(FilterKind::Order, PropertySet::All);
        let request = RequestContext::from_query_string("order[brand.name]=asc&order[price]=desc");

        let (_, ordering) = run(&filter, &request);
        assert_eq!(
            ordering,
            vec![
                (target(&["brand"], "Brand", "name"), OrderDirection::Asc),
                (target(&[], "Product", "price"), OrderDirection::Desc),
            ]
        );
    }

    #[test]
    fn order_without_order_parameter_applies_nothing() {
        let registry = catalog_registry();
        let store = InMemoryStore::new();
        let mut query = MemoryQuery::new(&store, &registry, "Product");
        let filter = filter(FilterKind::Order, PropertySet::All);
        let request = RequestContext::from_query_string("price=10");

        filter
            .apply(Some(&request), &mut query, PRODUCT_CLASS, None)
            .unwrap();
        assert!(query.conditions().is_empty());
    }

    #[test]
    fn pinned_family_must_back_the_resource() {
        let spec = FilterSpecification::for_kind(FilterKind::Numeric).with_family("Product");
        let filter = EavFilter::new(FilterKind::Numeric, spec, registry()).unwrap();

        assert!(filter.describe(PRODUCT_CLASS).is_ok());
        assert!(matches!(
            filter.describe(BRAND_CLASS),
            Err(EavError::FamilyMismatch { .. })
        ));
    }

    #[test]
    fn describe_numeric_over_all_attributes() {
        let filter = filter(FilterKind::Numeric, PropertySet::All);
        let description = filter.describe(PRODUCT_CLASS).unwrap();

        let keys: Vec<_> = description.keys().cloned().collect();
        assert_eq!(keys, vec!["price", "price[]", "stock", "stock[]"]);
        assert_eq!(description["stock"].semantic_type, SemanticType::Int);
    }

    #[test]
    fn describe_never_includes_unsupported_types() {
        let registry = registry();
        for kind in [FilterKind::Boolean, FilterKind::Numeric, FilterKind::Search, FilterKind::Order] {
            let spec = FilterSpecification::for_kind(kind);
            let filter = EavFilter::new(kind, spec.clone(), registry.clone()).unwrap();
            for descriptor in filter.describe(PRODUCT_CLASS).unwrap().values() {
                let attribute = registry
                    .get_family("Product")
                    .and_then(|f| AttributePathResolver::new(&registry).resolve(f, &descriptor.property))
                    .unwrap();
                assert!(spec.supports(classify(attribute)), "{:?}: {}", kind, descriptor.property);
            }
        }
    }

    #[test]
    fn describe_skips_unknown_properties() {
        let filter = filter(
            FilterKind::Search,
            [("colour", None), ("name", Some("partial"))].into_iter().collect(),
        );
        let description = filter.describe(PRODUCT_CLASS).unwrap();

        let keys: Vec<_> = description.keys().cloned().collect();
        assert_eq!(keys, vec!["name"]);
    }

    #[test]
    fn describe_propagates_schema_errors() {
        let spec = FilterSpecification::new([SemanticType::String])
            .with_properties([("seller.name", None)].into_iter().collect());
        let filter = EavFilter::new(FilterKind::Search, spec, registry()).unwrap();

        assert!(matches!(
            filter.describe(PRODUCT_CLASS),
            Err(EavError::UnexpectedSchema { .. })
        ));
    }

    #[test]
    fn describe_relation_entries() {
        let spec = FilterSpecification::new([SemanticType::Entity])
            .with_properties([("brand", None)].into_iter().collect());
        let filter = EavFilter::new(FilterKind::Numeric, spec, registry()).unwrap();
        let description = filter.describe(PRODUCT_CLASS).unwrap();

        let keys: Vec<_> = description.keys().cloned().collect();
        assert_eq!(keys, vec!["brand", "brand[]"]);
        assert_eq!(description["brand"].semantic_type, SemanticType::Entity);
        assert_eq!(description["brand"].strategy.as_deref(), Some("exact"));
    }

    #[test]
    fn describe_order_entries() {
        let filter = filter(
            FilterKind::Order,
            [("price", Some("desc")), ("brand.name", None)].into_iter().collect(),
        );
        let description = filter.describe(PRODUCT_CLASS).unwrap();

        let keys: Vec<_> = description.keys().cloned().collect();
        assert_eq!(keys, vec!["order[price]", "order[brand.name]"]);
        assert_eq!(description["order[price]"].strategy.as_deref(), Some("desc"));
        assert_eq!(description["order[brand.name]"].semantic_type, SemanticType::String);
    }

    #[test]
    fn pinned_family_selects_among_shared_data_class() {
        use crate::schema::{Attribute, StorageType};

        let data_class = "App\\Entity\\Data";
        let shirt = Family::builder("Shirt", data_class)
            .attribute(Attribute::new("sleeves", StorageType::Integer))
            .build()
            .unwrap();
        let shoe = Family::builder("Shoe", data_class)
            .attribute(Attribute::new("size", StorageType::Integer))
            .build()
            .unwrap();
        let registry = Arc::new(FamilyRegistry::new([shirt, shoe]).unwrap());
        let request = RequestContext::from_query_string("size=42");

        let spec = FilterSpecification::for_kind(FilterKind::Numeric).with_family("Shoe");
        let pinned = EavFilter::new(FilterKind::Numeric, spec, registry.clone()).unwrap();
        let store = InMemoryStore::new();
        let mut query = MemoryQuery::new(&store, &registry, "Shoe");
        pinned
            .apply(Some(&request), &mut query, data_class, None)
            .unwrap();
        assert_eq!(
            query.conditions(),
            &[Predicate::And(vec![Predicate::Equals {
                target: target(&[], "Shoe", "size"),
                value: FilterValue::Text("42".into()),
            }])]
        );
        let keys: Vec<_> = pinned.describe(data_class).unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["size", "size[]"]);

        let unpinned = EavFilter::new(
            FilterKind::Numeric,
            FilterSpecification::for_kind(FilterKind::Numeric),
            registry.clone(),
        )
        .unwrap();
        let mut query = MemoryQuery::new(&store, &registry, "Shoe");
        assert!(matches!(
            unpinned.apply(Some(&request), &mut query, data_class, None),
            Err(EavError::AmbiguousFamily { .. })
        ));
    }
}
