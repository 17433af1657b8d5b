//! Family definitions.
//!
//! A family is a named, runtime-defined schema: a backing data class plus an
//! ordered set of attributes, one of which may act as the label and one as
//! the identifier.

use super::attribute::Attribute;
use crate::error::{EavError, Result};
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Family {
    code: String,
    data_class: String,
    attributes: IndexMap<String, Attribute>,
    label: Option<String>,
    identifier: Option<String>,
}

impl Family {
    pub fn builder(code: impl Into<String>, data_class: impl Into<String>) -> FamilyBuilder {
        FamilyBuilder {
            code: code.into(),
            data_class: data_class.into(),
            attributes: Vec::new(),
            label: None,
            identifier: None,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// The concrete data-bearing type this family backs.
    pub fn data_class(&self) -> &str {
        &self.data_class
    }

    pub fn has_attribute(&self, code: &str) -> bool {
        self.attributes.contains_key(code)
    }

    pub fn get_attribute(&self, code: &str) -> Result<&Attribute> {
        self.attributes
            .get(code)
            .ok_or_else(|| EavError::unknown_attribute(&self.code, code))
    }

    /// All attributes in declaration order.
    pub fn attributes(&self) -> &IndexMap<String, Attribute> {
        &self.attributes
    }

    pub fn label_attribute(&self) -> Option<&Attribute> {
        self.label.as_deref().and_then(|code| self.attributes.get(code))
    }

    pub fn identifier_attribute(&self) -> Option<&Attribute> {
        self.identifier
            .as_deref()
            .and_then(|code| self.attributes.get(code))
    }
}

/// Fluent builder for [`Family`].
///
/// `build()` enforces the family invariants: attribute codes are unique and
/// the label/identifier designations name declared attributes.
#[derive(Debug, Clone)]
pub struct FamilyBuilder {
    code: String,
    data_class: String,
    attributes: Vec<Attribute>,
    label: Option<String>,
    identifier: Option<String>,
}

impl FamilyBuilder {
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn label(mut self, code: impl Into<String>) -> Self {
        self.label = Some(code.into());
        self
    }

    pub fn identifier(mut self, code: impl Into<String>) -> Self {
        self.identifier = Some(code.into());
        self
    }

    pub fn build(self) -> Result<Family> {
        let mut attributes = IndexMap::with_capacity(self.attributes.len());
        for mut attribute in self.attributes {
            if attributes.contains_key(&attribute.code) {
                return Err(EavError::InvalidSchema(format!(
                    "duplicate attribute '{}' in family '{}'",
                    attribute.code, self.code
                )));
            }
            attribute.family = self.code.clone();
            attributes.insert(attribute.code.clone(), attribute);
        }

        for (role, designated) in [("label", &self.label), ("identifier", &self.identifier)] {
            if let Some(code) = designated {
                if !attributes.contains_key(code) {
                    return Err(EavError::InvalidSchema(format!(
                        "{} attribute '{}' is not declared by family '{}'",
                        role, code, self.code
                    )));
                }
            }
        }

        Ok(Family {
            code: self.code,
            data_class: self.data_class,
            attributes,
            label: self.label,
            identifier: self.identifier,
        })
    }
}
