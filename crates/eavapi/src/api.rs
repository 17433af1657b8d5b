//! # API Facade
//!
//! [`EavApi`] is the single entry point an API framework talks to. It owns the
//! schema registry and the named filter instances built from configuration,
//! and dispatches to them.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Builds** every configured filter once, at startup (bad search strategies fail here)
//! - **Selects** filters by name for each resource operation
//! - **Merges** filter descriptions for API documentation
//! - **Returns structured types**; it never formats a response
//!
//! ## Filter Selection
//!
//! Resources list the filters that apply to them by name. Filters run in the
//! order given; descriptions merge in that order, later entries overwriting
//! earlier ones with the same key. An unknown name is a wiring error
//! ([`EavError::UnknownFilter`]).
//!
//! ## Reference Backend
//!
//! [`EavApi::query`] and [`EavApi::find_item`] run against the in-memory
//! [`InMemoryStore`] only. They exist for tests, fixtures and small embedded
//! datasets. A database-backed caller implements [`QueryBuilder`] itself and
//! passes it to [`EavApi::apply`]; nothing else in the facade depends on the
//! in-memory store.
//!
//! ## Sharing
//!
//! The registry is immutable after construction and shared with every filter
//! through an [`Arc`], so an `EavApi` can serve concurrent requests by reference.

use crate::config::{EavConfig, FilterConfig};
use crate::error::{EavError, Result};
use crate::filter::{EavFilter, FilterDescription, FilterSpecification};
use crate::metadata::{self, PropertyMetadata};
use crate::query::memory::MemoryQuery;
use crate::query::QueryBuilder;
use crate::request::RequestContext;
use crate::resolve::FamilyResolver;
use crate::schema::FamilyRegistry;
use crate::store::{DataRecord, InMemoryStore};
use indexmap::IndexMap;
use std::sync::Arc;

pub struct EavApi {
    registry: Arc<FamilyRegistry>,
    filters: IndexMap<String, EavFilter>,
    ignored_attributes: Vec<String>,
}

impl EavApi {
    pub fn new(registry: FamilyRegistry, config: &EavConfig) -> Result<Self> {
        let registry = Arc::new(registry);
        let mut filters = IndexMap::new();
        for (name, filter_config) in config.filters() {
            let filter = EavFilter::new(
                filter_config.kind,
                specification(filter_config),
                registry.clone(),
            )?;
            filters.insert(name.clone(), filter);
        }

        log::info!(
            "EAV API ready: {} families, {} filters",
            registry.families().count(),
            filters.len()
        );
        Ok(Self {
            registry,
            filters,
            ignored_attributes: config.ignored_attributes(),
        })
    }

    /// Load the schema file named by the configuration and build the facade.
    pub fn from_config(config: &EavConfig) -> Result<Self> {
        let schema = config
            .schema
            .as_ref()
            .ok_or_else(|| EavError::InvalidSchema("no schema file configured".to_string()))?;
        let registry = FamilyRegistry::load(schema)?;
        Self::new(registry, config)
    }

    pub fn registry(&self) -> &FamilyRegistry {
        &self.registry
    }

    pub fn filter(&self, name: &str) -> Result<&EavFilter> {
        self.filters.get(name).ok_or_else(|| EavError::UnknownFilter {
            name: name.to_string(),
        })
    }

    pub fn filter_names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }

    /// Merged description of the named filters for `resource`.
    pub fn describe(&self, resource: &str, filter_names: &[&str]) -> Result<FilterDescription> {
        let mut description = FilterDescription::new();
        for name in filter_names {
            description.extend(self.filter(name)?.describe(resource)?);
        }
        Ok(description)
    }

    /// Run the named filters against `query`, stopping at the first error.
    pub fn apply<Q: QueryBuilder>(
        &self,
        request: Option<&RequestContext>,
        query: &mut Q,
        resource: &str,
        filter_names: &[&str],
        operation: Option<&str>,
    ) -> Result<()> {
        for name in filter_names {
            self.filter(name)?.apply(request, query, resource, operation)?;
        }
        Ok(())
    }

    /// Property names exposed for `resource`, without the ignored ones.
    pub fn property_names(&self, resource: &str) -> Result<Vec<String>> {
        metadata::property_names(&self.registry, resource, &self.ignored_attributes)
    }

    pub fn property_metadata(&self, resource: &str, property: &str) -> Result<PropertyMetadata> {
        metadata::property_metadata(&self.registry, resource, property)
    }

    /// Start an in-memory query over the records of the family governing `resource`.
    ///
    /// Reference backend only, see the module docs.
    pub fn query<'s>(&'s self, store: &'s InMemoryStore, resource: &str) -> Result<MemoryQuery<'s>> {
        let family = FamilyResolver::new(&self.registry).resolve(resource)?;
        Ok(MemoryQuery::new(store, &self.registry, family.code()))
    }

    /// Look an item up by identifier value, falling back to its id.
    /// Reference backend only.
    pub fn find_item<'s>(
        &self,
        store: &'s InMemoryStore,
        resource: &str,
        id: &str,
    ) -> Result<Option<&'s DataRecord>> {
        let family = FamilyResolver::new(&self.registry).resolve(resource)?;
        Ok(store.find_by_identifier(family, id))
    }
}

fn specification(config: &FilterConfig) -> FilterSpecification {
    let mut spec = FilterSpecification::new(config.supported_types()).with_properties(config.property_set());
    spec.family = config.family.clone();
    spec
}
