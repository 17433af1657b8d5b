//! The schema registry.
//!
//! Holds every [`Family`] known to the process. It is built once at startup
//! (from code or from a schema file) and only read afterwards, so it can be
//! shared behind an `Arc` by any number of filters without locking.

use super::attribute::Attribute;
use super::family::Family;
use crate::config::SchemaConfig;
use crate::error::{EavError, Result};
use indexmap::IndexMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct FamilyRegistry {
    families: IndexMap<String, Family>,
}

/// Normalize a type name for comparison: leading `\` or `::` separators are ignored.
pub fn normalize_type_name(name: &str) -> &str {
    name.trim_start_matches(['\\', ':'])
}

impl FamilyRegistry {
    /// Build a registry, rejecting duplicate family codes.
    ///
    /// Several families may back the same concrete type; resolving such a
    /// type without naming the family is then ambiguous.
    pub fn new(families: impl IntoIterator<Item = Family>) -> Result<Self> {
        let mut registry = IndexMap::new();
        for family in families {
            if registry.contains_key(family.code()) {
                return Err(EavError::InvalidSchema(format!(
                    "duplicate family '{}'",
                    family.code()
                )));
            }
            registry.insert(family.code().to_string(), family);
        }

        let registry = Self { families: registry };
        registry.warn_unknown_targets();
        log::info!("schema registry loaded with {} families", registry.families.len());
        Ok(registry)
    }

    pub fn from_config(config: SchemaConfig) -> Result<Self> {
        let mut families = Vec::with_capacity(config.families.len());
        for (code, family_config) in config.families {
            let mut builder = Family::builder(code, family_config.data_class);
            for (attribute_code, attr) in family_config.attributes {
                let mut attribute = Attribute::new(attribute_code, attr.storage_type);
                attribute.is_relation = attr.relation;
                attribute.is_embedded = attr.embedded;
                attribute.is_collection = attr.collection;
                attribute.required = attr.required;
                attribute.options = attr.options;
                builder = builder.attribute(attribute);
            }
            if let Some(label) = family_config.label {
                builder = builder.label(label);
            }
            if let Some(identifier) = family_config.identifier {
                builder = builder.identifier(identifier);
            }
            families.push(builder.build()?);
        }
        Self::new(families)
    }

    /// Load a registry from a TOML schema file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SchemaConfig = toml::from_str(&content)?;
        log::debug!("loading schema from {}", path.as_ref().display());
        Self::from_config(config)
    }

    pub fn get_family(&self, code: &str) -> Result<&Family> {
        self.families
            .get(code)
            .ok_or_else(|| EavError::UnknownFamily {
                code: code.to_string(),
            })
    }

    pub fn has_family(&self, code: &str) -> bool {
        self.families.contains_key(code)
    }

    /// Find the family backing the given concrete type. Fails when no family
    /// or more than one family backs it.
    pub fn get_family_by_data_class(&self, data_class: &str) -> Result<&Family> {
        let mut matching = self.families_by_data_class(data_class);
        let Some(family) = matching.next() else {
            return Err(EavError::UnresolvedFamily {
                resource: data_class.to_string(),
            });
        };
        let others: Vec<&Family> = matching.collect();
        if others.is_empty() {
            return Ok(family);
        }
        Err(EavError::AmbiguousFamily {
            resource: data_class.to_string(),
            families: std::iter::once(family)
                .chain(others)
                .map(|f| f.code().to_string())
                .collect(),
        })
    }

    /// Every family backing the given concrete type, in declaration order.
    pub fn families_by_data_class<'a, 'd>(&'a self, data_class: &'d str) -> impl Iterator<Item = &'a Family> + 'd
    where
        'a: 'd,
    {
        let wanted = normalize_type_name(data_class);
        self.families
            .values()
            .filter(move |f| normalize_type_name(f.data_class()) == wanted)
    }

    pub fn families(&self) -> impl Iterator<Item = &Family> {
        self.families.values()
    }

    fn warn_unknown_targets(&self) {
        for family in self.families.values() {
            for attribute in family.attributes().values() {
                for target in attribute.allowed_families() {
                    if !self.families.contains_key(target) {
                        log::warn!(
                            "attribute '{}.{}' allows unknown family '{}'",
                            family.code(),
                            attribute.code,
                            target
                        );
                    }
                }
            }
        }
    }
}
