//! # Query Builder Contract
//!
//! Filters never talk to a database. They hand attribute-scoped conditions
//! to a [`QueryBuilder`], which owns the in-progress query:
//!
//! ```text
//! QueryBuilder::attribute(path) ──▶ AttributeQueryBuilder
//!                                     ├── equals(value) ──▶ Handler
//!                                     └── like(pattern) ──▶ Handler
//! QueryBuilder::order_by(attribute, direction)            (side effect)
//! QueryBuilder::and(handlers) ──▶ Handler
//! QueryBuilder::apply(handler)                             (side effect)
//! ```
//!
//! Handlers are opaque to filters and only combine under AND. An empty AND is
//! the trivially-true condition.
//!
//! ## Implementations
//!
//! - [`memory::MemoryQuery`]: evaluates predicates against an
//!   [`InMemoryStore`](crate::store::InMemoryStore). Used as the reference
//!   backend and in tests.

use crate::resolve::AttributePath;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod memory;

/// A value handed to an equality condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    /// Raw request text; the builder decides how to compare it.
    Text(String),
    /// Any of the given values.
    List(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    /// Parse a direction token, ignoring case. Anything but `asc`/`desc` is `None`.
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "ASC" => Some(OrderDirection::Asc),
            "DESC" => Some(OrderDirection::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds conditions on a single attribute.
pub trait AttributeQueryBuilder {
    type Handler;

    fn equals(&self, value: FilterValue) -> Self::Handler;

    /// Pattern match; `%` matches any run of characters.
    fn like(&self, pattern: &str) -> Self::Handler;
}

/// The query being built for one request.
pub trait QueryBuilder {
    type Handler;
    type Attribute: AttributeQueryBuilder<Handler = Self::Handler>;

    /// Scope a sub-builder to the attribute reached by `path`.
    fn attribute(&mut self, path: &AttributePath<'_>) -> Self::Attribute;

    fn order_by(&mut self, attribute: &Self::Attribute, direction: OrderDirection);

    fn and(&mut self, handlers: Vec<Self::Handler>) -> Self::Handler;

    /// Attach a condition to the query.
    fn apply(&mut self, handler: Self::Handler);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_tokens_ignore_case() {
        assert_eq!(OrderDirection::parse("asc"), Some(OrderDirection::Asc));
        assert_eq!(OrderDirection::parse("ASC"), Some(OrderDirection::Asc));
        assert_eq!(OrderDirection::parse("desc"), Some(OrderDirection::Desc));
        assert_eq!(OrderDirection::parse("DeSc"), Some(OrderDirection::Desc));
    }

    #[test]
    fn other_direction_tokens_are_rejected() {
        assert_eq!(OrderDirection::parse("banana"), None);
        assert_eq!(OrderDirection::parse(""), None);
        assert_eq!(OrderDirection::parse(" asc"), None);
    }

    #[test]
    fn direction_displays_uppercase() {
        assert_eq!(OrderDirection::Desc.to_string(), "DESC");
    }
}
