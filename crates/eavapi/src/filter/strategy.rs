use crate::error::{EavError, Result};
use std::fmt;

const WILDCARD: char = '%';

/// Wildcard placement for search filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStrategy {
    Exact,
    Partial,
    Start,
    End,
    /// Approximated by a substring match; no word-boundary detection.
    WordStart,
}

impl SearchStrategy {
    /// Parse a configured strategy name. No strategy means exact.
    pub fn parse(name: Option<&str>) -> Result<Self> {
        match name {
            None | Some("exact") => Ok(SearchStrategy::Exact),
            Some("partial") => Ok(SearchStrategy::Partial),
            Some("start") => Ok(SearchStrategy::Start),
            Some("end") => Ok(SearchStrategy::End),
            Some("word_start") => Ok(SearchStrategy::WordStart),
            Some(other) => Err(EavError::InvalidStrategy(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStrategy::Exact => "exact",
            SearchStrategy::Partial => "partial",
            SearchStrategy::Start => "start",
            SearchStrategy::End => "end",
            SearchStrategy::WordStart => "word_start",
        }
    }

    /// Build the pattern for `value`. Wildcards the caller already put at
    /// either end are stripped first, so patterns never double up.
    pub fn pattern(&self, value: &str) -> String {
        let bare = strip_wildcards(value);
        match self {
            SearchStrategy::Exact => bare.to_string(),
            SearchStrategy::Partial | SearchStrategy::WordStart => format!("%{}%", bare),
            SearchStrategy::Start => format!("{}%", bare),
            SearchStrategy::End => format!("%{}", bare),
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn strip_wildcards(value: &str) -> &str {
    value.trim_matches(WILDCARD)
}
