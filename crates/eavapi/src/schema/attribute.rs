//! Attribute definitions.
//!
//! An attribute is a single named, typed field declared by a family. Its
//! storage type is a closed set of tags; anything else read from a schema
//! file is kept as [`StorageType::Unrecognized`] so descriptive metadata can
//! still mention it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Option listing the families a relation or embedded attribute may point to.
pub const ALLOWED_FAMILIES: &str = "allowed_families";

/// Option holding serializer hints such as `max_depth`.
pub const SERIALIZER_OPTIONS: &str = "serializer";

/// The storage type of an attribute value.
///
/// | Tag | Variant |
/// |-----|---------|
/// | `integer` | `Integer` |
/// | `boolean` | `Boolean` |
/// | `date` | `Date` |
/// | `datetime` | `Datetime` |
/// | `decimal` | `Decimal` |
/// | `short-text` | `ShortText` |
/// | `long-text` | `LongText` |
/// | `entity-reference` | `EntityReference` |
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StorageType {
    Integer,
    Boolean,
    Date,
    Datetime,
    Decimal,
    ShortText,
    LongText,
    EntityReference,
    /// A tag this crate does not know about.
    Unrecognized(String),
}

impl StorageType {
    pub fn as_str(&self) -> &str {
        match self {
            StorageType::Integer => "integer",
            StorageType::Boolean => "boolean",
            StorageType::Date => "date",
            StorageType::Datetime => "datetime",
            StorageType::Decimal => "decimal",
            StorageType::ShortText => "short-text",
            StorageType::LongText => "long-text",
            StorageType::EntityReference => "entity-reference",
            StorageType::Unrecognized(tag) => tag,
        }
    }
}

impl From<&str> for StorageType {
    fn from(tag: &str) -> Self {
        match tag {
            "integer" => StorageType::Integer,
            "boolean" => StorageType::Boolean,
            "date" => StorageType::Date,
            "datetime" => StorageType::Datetime,
            "decimal" => StorageType::Decimal,
            "short-text" => StorageType::ShortText,
            "long-text" => StorageType::LongText,
            "entity-reference" => StorageType::EntityReference,
            other => StorageType::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for StorageType {
    fn from(tag: String) -> Self {
        StorageType::from(tag.as_str())
    }
}

impl From<StorageType> for String {
    fn from(storage_type: StorageType) -> Self {
        storage_type.as_str().to_string()
    }
}

/// A single attribute declared by a family.
///
/// Attributes are read-only once their family is built. The `family` field is
/// a back-reference by code; the attribute never owns its family.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Attribute code, unique within its family.
    pub code: String,

    /// Code of the owning family. Filled in when the attribute is added to a family.
    pub family: String,

    pub storage_type: StorageType,

    /// Whether values reference data of another family.
    pub is_relation: bool,

    /// Whether values are data of another family stored inline.
    pub is_embedded: bool,

    pub is_collection: bool,

    pub required: bool,

    /// Free-form options (`allowed_families`, serializer hints, description, ...).
    pub options: IndexMap<String, Value>,
}

impl Attribute {
    /// Create a scalar attribute with all flags off.
    pub fn new(code: impl Into<String>, storage_type: StorageType) -> Self {
        Self {
            code: code.into(),
            family: String::new(),
            storage_type,
            is_relation: false,
            is_embedded: false,
            is_collection: false,
            required: false,
            options: IndexMap::new(),
        }
    }

    /// Mark as a relation to the given families.
    pub fn relation<I, S>(mut self, families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.is_relation = true;
        self.with_allowed_families(families)
    }

    /// Mark as embedding data of the given families.
    pub fn embedded<I, S>(mut self, families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.is_embedded = true;
        self.with_allowed_families(families)
    }

    pub fn collection(mut self) -> Self {
        self.is_collection = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    fn with_allowed_families<I, S>(self, families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let families = families
            .into_iter()
            .map(|f| Value::String(f.into()))
            .collect();
        self.option(ALLOWED_FAMILIES, Value::Array(families))
    }

    pub fn get_option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Whether values point at data of another family (relation or embedded).
    pub fn is_reference(&self) -> bool {
        self.is_relation || self.is_embedded
    }

    /// Family codes listed in the `allowed_families` option.
    ///
    /// A bare string is accepted as a single-entry list. Non-string entries are ignored.
    pub fn allowed_families(&self) -> Vec<&str> {
        match self.options.get(ALLOWED_FAMILIES) {
            Some(Value::Array(values)) => values.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(code)) => vec![code.as_str()],
            _ => Vec::new(),
        }
    }

    /// The single family a dotted path may traverse into, if exactly one is allowed.
    pub fn single_allowed_family(&self) -> Option<&str> {
        match self.allowed_families().as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.options.get("description").and_then(Value::as_str)
    }
}
