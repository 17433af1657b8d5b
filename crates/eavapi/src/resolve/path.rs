use crate::error::{EavError, Result};
use crate::schema::{Attribute, Family, FamilyRegistry};

const PATH_SEPARATOR: char = '.';

/// A property resolved to an attribute, with the relation hops taken to reach it.
///
/// For `brand.country` on `Product`, `hops` holds `Product.brand` and
/// `attribute` is `Brand.country`. Direct and synonym matches have no hops.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributePath<'r> {
    pub property: String,
    /// The family the path starts from.
    pub root: &'r Family,
    pub hops: Vec<&'r Attribute>,
    pub attribute: &'r Attribute,
}

impl AttributePath<'_> {
    pub fn is_nested(&self) -> bool {
        !self.hops.is_empty()
    }
}

/// Whether a property name denotes a dotted path.
pub fn is_nested_property(property: &str) -> bool {
    property.contains(PATH_SEPARATOR)
}

/// Resolves a (possibly dotted) property name to the attribute to filter or sort on.
#[derive(Debug, Clone, Copy)]
pub struct AttributePathResolver<'r> {
    registry: &'r FamilyRegistry,
}

impl<'r> AttributePathResolver<'r> {
    pub fn new(registry: &'r FamilyRegistry) -> Self {
        Self { registry }
    }

    pub fn resolve(&self, family: &'r Family, property: &str) -> Result<&'r Attribute> {
        self.resolve_path(family, property).map(|path| path.attribute)
    }

    /// Resolution order: exact attribute code, the `label` and `identifier`
    /// synonyms, then dotted traversal across single-family relations.
    pub fn resolve_path(&self, family: &'r Family, property: &str) -> Result<AttributePath<'r>> {
        let direct = |attribute: &'r Attribute| AttributePath {
            property: property.to_string(),
            root: family,
            hops: Vec::new(),
            attribute,
        };

        if let Ok(attribute) = family.get_attribute(property) {
            return Ok(direct(attribute));
        }
        match property {
            "label" => {
                return family
                    .label_attribute()
                    .map(direct)
                    .ok_or_else(|| EavError::unknown_attribute(family.code(), property));
            }
            "identifier" => {
                return family
                    .identifier_attribute()
                    .map(direct)
                    .ok_or_else(|| EavError::unknown_attribute(family.code(), property));
            }
            _ => {}
        }
        if !is_nested_property(property) {
            return Err(EavError::unknown_attribute(family.code(), property));
        }

        let mut current = family;
        let mut hops = Vec::new();
        let mut previous: Option<&'r Attribute> = None;
        for segment in property.split(PATH_SEPARATOR) {
            if let Some(parent) = previous {
                current = self.target_family(parent)?;
                hops.push(parent);
            }
            previous = Some(current.get_attribute(segment)?);
        }
        let attribute = previous.ok_or_else(|| EavError::unknown_attribute(family.code(), property))?;

        log::debug!(
            "resolved '{}' on '{}' to '{}.{}' through {} hop(s)",
            property,
            family.code(),
            attribute.family,
            attribute.code,
            hops.len()
        );
        Ok(AttributePath {
            property: property.to_string(),
            root: family,
            hops,
            attribute,
        })
    }

    fn target_family(&self, attribute: &Attribute) -> Result<&'r Family> {
        let code = attribute
            .is_reference()
            .then(|| attribute.single_allowed_family())
            .flatten()
            .ok_or_else(|| EavError::UnexpectedSchema {
                attribute: attribute.code.clone(),
            })?;
        self.registry.get_family(code)
    }
}
