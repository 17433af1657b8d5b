//! # Data Store
//!
//! EAV data records: an id, the code of the family they belong to, and typed
//! values keyed by attribute code. Persisting records is the job of an
//! external layer; [`InMemoryStore`] is the reference implementation used by
//! [`MemoryQuery`](crate::query::memory::MemoryQuery) and in tests.
//!
//! ## Value Types
//!
//! | Variant | Storage type |
//! |---------|--------------|
//! | `Int` | `integer` |
//! | `Bool` | `boolean` |
//! | `Decimal` | `decimal` |
//! | `Text` | `short-text`, `long-text` |
//! | `Date` | `date` |
//! | `Datetime` | `datetime` |
//! | `Ref` / `Refs` | relation or embedded attributes (single / collection) |

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Cow;
use std::cmp::Ordering;
use uuid::Uuid;

mod memory;

pub use memory::InMemoryStore;

/// Runtime representation of a stored attribute value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordValue {
    Int(i64),
    Bool(bool),
    Decimal(f64),
    Text(String),
    Date(NaiveDate),
    Datetime(DateTime<Utc>),
    /// Reference to another record.
    Ref(Uuid),
    /// References to other records (collection attributes).
    Refs(Vec<Uuid>),
}

impl RecordValue {
    pub fn text(value: impl Into<String>) -> Self {
        RecordValue::Text(value.into())
    }

    /// Ids of the records this value points at. Empty for scalars.
    pub fn references(&self) -> Vec<Uuid> {
        match self {
            RecordValue::Ref(id) => vec![*id],
            RecordValue::Refs(ids) => ids.clone(),
            _ => Vec::new(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RecordValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RecordValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Compare against a boolean condition. Integers follow C truthiness.
    pub fn equals_bool(&self, expected: bool) -> bool {
        match self {
            RecordValue::Bool(v) => *v == expected,
            RecordValue::Int(v) => (*v != 0) == expected,
            _ => false,
        }
    }

    /// Compare against raw request text, coercing the text to this value's type.
    /// Text that does not parse as the stored type never matches.
    pub fn matches_raw(&self, raw: &str) -> bool {
        let raw = raw.trim();
        match self {
            RecordValue::Int(v) => match raw.parse::<i64>() {
                Ok(parsed) => parsed == *v,
                Err(_) => raw.parse::<f64>().is_ok_and(|parsed| parsed == *v as f64),
            },
            RecordValue::Decimal(v) => raw.parse::<f64>().is_ok_and(|parsed| parsed == *v),
            RecordValue::Bool(v) => match raw {
                "1" | "true" => *v,
                "" | "0" | "false" => !*v,
                _ => false,
            },
            RecordValue::Text(s) => s == raw,
            RecordValue::Date(d) => parse_date(raw).is_some_and(|parsed| parsed == *d),
            RecordValue::Datetime(dt) => parse_datetime(raw).is_some_and(|parsed| parsed == *dt),
            RecordValue::Ref(id) => Uuid::parse_str(raw).is_ok_and(|parsed| parsed == *id),
            RecordValue::Refs(ids) => Uuid::parse_str(raw).is_ok_and(|parsed| ids.contains(&parsed)),
        }
    }

    /// Text form used for pattern matching. Collections have none.
    pub fn like_subject(&self) -> Option<Cow<'_, str>> {
        match self {
            RecordValue::Text(s) => Some(Cow::Borrowed(s)),
            RecordValue::Int(v) => Some(Cow::Owned(v.to_string())),
            RecordValue::Decimal(v) => Some(Cow::Owned(v.to_string())),
            RecordValue::Bool(v) => Some(Cow::Borrowed(if *v { "1" } else { "0" })),
            RecordValue::Date(d) => Some(Cow::Owned(d.format("%Y-%m-%d").to_string())),
            RecordValue::Datetime(dt) => Some(Cow::Owned(dt.to_rfc3339())),
            RecordValue::Ref(id) => Some(Cow::Owned(id.to_string())),
            RecordValue::Refs(_) => None,
        }
    }

    /// Ordering between values of compatible types; `None` when incomparable.
    pub fn compare(&self, other: &RecordValue) -> Option<Ordering> {
        match (self, other) {
            (RecordValue::Int(a), RecordValue::Int(b)) => Some(a.cmp(b)),
            (RecordValue::Decimal(a), RecordValue::Decimal(b)) => a.partial_cmp(b),
            (RecordValue::Int(a), RecordValue::Decimal(b)) => (*a as f64).partial_cmp(b),
            (RecordValue::Decimal(a), RecordValue::Int(b)) => a.partial_cmp(&(*b as f64)),
            (RecordValue::Bool(a), RecordValue::Bool(b)) => Some(a.cmp(b)),
            (RecordValue::Text(a), RecordValue::Text(b)) => Some(a.cmp(b)),
            (RecordValue::Date(a), RecordValue::Date(b)) => Some(a.cmp(b)),
            (RecordValue::Datetime(a), RecordValue::Datetime(b)) => Some(a.cmp(b)),
            (RecordValue::Ref(a), RecordValue::Ref(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(raw).map(|dt| dt.date_naive()))
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// One stored EAV record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataRecord {
    pub id: Uuid,
    /// Code of the family this record belongs to.
    pub family: String,
    pub values: IndexMap<String, RecordValue>,
}

impl DataRecord {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            family: family.into(),
            values: IndexMap::new(),
        }
    }

    pub fn with(mut self, attribute: impl Into<String>, value: RecordValue) -> Self {
        self.values.insert(attribute.into(), value);
        self
    }

    pub fn get(&self, attribute: &str) -> Option<&RecordValue> {
        self.values.get(attribute)
    }
}
