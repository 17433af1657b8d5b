//! # Configuration
//!
//! Configuration is managed by [`confique`], which layers environment
//! variables over a TOML file over compiled defaults.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `schema` | `EAVAPI_SCHEMA` | none | Path to the schema TOML file |
//! | `ignored_attributes` | | `["values"]` | Property names hidden from property-name collections |
//! | `filters` | | none | Named filter instances |
//!
//! ## Example
//!
//! ```toml
//! schema = "schema.toml"
//!
//! [filters.product_search]
//! kind = "search"
//! family = "Product"
//! supported_types = ["string"]
//! properties = { name = "partial", "brand.country" = "" }
//!
//! [filters.product_order]
//! kind = "order"
//! properties = { price = "desc", name = "" }
//! ```
//!
//! The schema file itself is plain serde ([`SchemaConfig`]):
//!
//! ```toml
//! [families.Product]
//! data_class = "App\\Entity\\Product"
//! label = "name"
//! identifier = "sku"
//!
//! [families.Product.attributes.brand]
//! type = "entity-reference"
//! relation = true
//! options = { allowed_families = ["Brand"] }
//! ```

use crate::error::Result;
use crate::filter::{FilterKind, PropertySet};
use crate::schema::{SemanticType, StorageType};
use confique::Config;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_ignored_attributes() -> Vec<String> {
    vec!["values".to_string()]
}

/// Top-level configuration, stored in `eavapi.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EavConfig {
    /// Path to the schema file. Relative paths are resolved against the
    /// directory of the configuration file.
    #[config(env = "EAVAPI_SCHEMA")]
    pub schema: Option<PathBuf>,

    /// Property names hidden from property-name collections.
    /// When absent, defaults to ["values"].
    pub ignored_attributes: Option<Vec<String>>,

    /// Named filter instances.
    pub filters: Option<IndexMap<String, FilterConfig>>,
}

impl Default for EavConfig {
    fn default() -> Self {
        Self {
            schema: None,
            ignored_attributes: None,
            filters: None,
        }
    }
}

impl EavConfig {
    /// Load configuration from a TOML file, with environment overrides.
    /// A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::builder().env().file(path).load()?;
        if let (Some(schema), Some(dir)) = (config.schema.as_ref(), path.parent()) {
            if schema.is_relative() {
                config.schema = Some(dir.join(schema));
            }
        }
        Ok(config)
    }

    pub fn ignored_attributes(&self) -> Vec<String> {
        self.ignored_attributes
            .clone()
            .unwrap_or_else(default_ignored_attributes)
    }

    pub fn filters(&self) -> impl Iterator<Item = (&String, &FilterConfig)> {
        self.filters.iter().flat_map(|filters| filters.iter())
    }
}

/// One configured filter instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterConfig {
    pub kind: FilterKind,

    /// Explicit family code. When absent the family is resolved from the resource type.
    #[serde(default)]
    pub family: Option<String>,

    /// Semantic types this filter handles. When absent, the kind's defaults apply.
    #[serde(default)]
    pub supported_types: Option<Vec<SemanticType>>,

    /// Properties to filter on. When absent, every attribute of the family.
    #[serde(default)]
    pub properties: Option<PropertiesConfig>,
}

/// Either a plain list of property names or a table of name to strategy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PropertiesConfig {
    Names(Vec<String>),
    Strategies(IndexMap<String, String>),
}

impl FilterConfig {
    pub fn supported_types(&self) -> Vec<SemanticType> {
        self.supported_types
            .clone()
            .unwrap_or_else(|| self.kind.default_supported_types().to_vec())
    }

    /// Empty strategy strings mean "no strategy".
    pub fn property_set(&self) -> PropertySet {
        match &self.properties {
            None => PropertySet::All,
            Some(PropertiesConfig::Names(names)) => {
                PropertySet::Explicit(names.iter().map(|n| (n.clone(), None)).collect())
            }
            Some(PropertiesConfig::Strategies(map)) => PropertySet::Explicit(
                map.iter()
                    .map(|(name, strategy)| {
                        let strategy = (!strategy.is_empty()).then(|| strategy.clone());
                        (name.clone(), strategy)
                    })
                    .collect(),
            ),
        }
    }
}

/// Schema file layout: every family keyed by code.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SchemaConfig {
    #[serde(default)]
    pub families: IndexMap<String, FamilyConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FamilyConfig {
    pub data_class: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub attributes: IndexMap<String, AttributeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeConfig {
    #[serde(rename = "type")]
    pub storage_type: StorageType,
    #[serde(default)]
    pub relation: bool,
    #[serde(default)]
    pub embedded: bool,
    #[serde(default)]
    pub collection: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: IndexMap<String, serde_json::Value>,
}
