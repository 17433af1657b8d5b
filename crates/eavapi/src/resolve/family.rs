use crate::error::{EavError, Result};
use crate::schema::{normalize_type_name, Family, FamilyRegistry};

/// Maps a concrete resource type to the family that governs it.
#[derive(Debug, Clone, Copy)]
pub struct FamilyResolver<'r> {
    registry: &'r FamilyRegistry,
}

impl<'r> FamilyResolver<'r> {
    pub fn new(registry: &'r FamilyRegistry) -> Self {
        Self { registry }
    }

    /// Resolve through the registry's backing-type index. A type backed by
    /// several families is ambiguous here; pin the family instead.
    pub fn resolve(&self, resource: &str) -> Result<&'r Family> {
        self.registry.get_family_by_data_class(resource)
    }

    /// Resolve for a filter that may be pinned to an explicit family.
    ///
    /// A pinned family must back `resource`; otherwise the filter is wired to
    /// the wrong resource and `FamilyMismatch` is returned.
    pub fn resolve_for(&self, family_code: Option<&str>, resource: &str) -> Result<&'r Family> {
        let Some(code) = family_code else {
            return self.resolve(resource);
        };

        let family = self.registry.get_family(code)?;
        if normalize_type_name(family.data_class()) != normalize_type_name(resource) {
            return Err(EavError::FamilyMismatch {
                resource: resource.to_string(),
                family: family.code().to_string(),
                data_class: family.data_class().to_string(),
            });
        }
        Ok(family)
    }
}
