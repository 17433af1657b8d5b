//! # Request Parameters
//!
//! Filters read their input from the query parameters of the current request.
//! Keys use bracket syntax for structure:
//!
//! | Query string | Parameters |
//! |--------------|------------|
//! | `price=10` | `price → "10"` |
//! | `sku[]=a&sku[]=b` | `sku → ["a", "b"]` |
//! | `order[price]=desc` | `order → { price → "desc" }` |
//!
//! Keys nested deeper than [`MAX_NESTING`] levels are dropped.
//!
//! ## Flattened keys
//!
//! The request transport cannot carry dots in top-level key names: `brand.country=FR`
//! arrives as `brand_country`. [`KeyMode::Flattened`] reproduces that, and
//! [`RequestContext::expanded_query`] re-parses the raw query string with
//! [`KeyMode::Preserved`] so filters declaring dotted properties can recover them.

use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Cow;

/// Deepest bracket nesting accepted in a parameter key.
pub const MAX_NESTING: usize = 64;

/// Ordered mapping of parameter name to value.
pub type QueryParameters = IndexMap<String, ParamValue>;

/// A decoded query parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Scalar(String),
    List(Vec<ParamValue>),
    Map(QueryParameters),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&QueryParameters> {
        match self {
            ParamValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Scalar entries of a list; nested containers are skipped.
    pub fn scalars(&self) -> Vec<&str> {
        match self {
            ParamValue::Scalar(s) => vec![s.as_str()],
            ParamValue::List(items) => items.iter().filter_map(ParamValue::as_str).collect(),
            ParamValue::Map(_) => Vec::new(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Scalar(value)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// How top-level key names are treated while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    /// Dots and spaces in the top-level name become `_`.
    Flattened,
    /// Key names are kept as sent.
    Preserved,
}

/// Parse an `application/x-www-form-urlencoded` query string.
pub fn parse_query_string(raw: &str, mode: KeyMode) -> QueryParameters {
    let mut params = QueryParameters::new();
    for pair in raw.trim_start_matches('?').split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode(key);
        let value = decode(value);

        let Some((base, segments)) = split_key(&key) else {
            log::debug!("dropping query parameter nested deeper than {} levels", MAX_NESTING);
            continue;
        };
        if base.is_empty() {
            continue;
        }
        let base = match mode {
            KeyMode::Flattened => base.replace(['.', ' '], "_"),
            KeyMode::Preserved => base.to_string(),
        };

        let slot = params
            .entry(base)
            .or_insert_with(|| ParamValue::Scalar(String::new()));
        assign(slot, &segments, value);
    }
    params
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .unwrap_or(Cow::Borrowed(spaced.as_str()))
        .into_owned()
}

/// Split `a[b][]` into `("a", [Some("b"), None])`. A malformed bracket
/// sequence leaves the whole key as the base name. Keys nested deeper than
/// [`MAX_NESTING`] yield `None` and the parameter is dropped.
fn split_key(key: &str) -> Option<(&str, Vec<Option<String>>)> {
    let Some(open) = key.find('[') else {
        return Some((key, Vec::new()));
    };

    let mut segments = Vec::new();
    let mut rest = &key[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            return Some((key, Vec::new()));
        };
        if segments.len() == MAX_NESTING {
            return None;
        }
        let segment = &inner[..close];
        segments.push((!segment.is_empty()).then(|| segment.to_string()));
        rest = &inner[close + 1..];
    }
    Some((&key[..open], segments))
}

fn assign(slot: &mut ParamValue, segments: &[Option<String>], value: String) {
    let Some((head, rest)) = segments.split_first() else {
        *slot = ParamValue::Scalar(value);
        return;
    };

    match head {
        None => {
            if !matches!(slot, ParamValue::List(_)) {
                *slot = ParamValue::List(Vec::new());
            }
            if let ParamValue::List(items) = slot {
                items.push(ParamValue::Scalar(String::new()));
                if let Some(last) = items.last_mut() {
                    assign(last, rest, value);
                }
            }
        }
        Some(key) => {
            if !matches!(slot, ParamValue::Map(_)) {
                *slot = ParamValue::Map(QueryParameters::new());
            }
            if let ParamValue::Map(map) = slot {
                let child = map
                    .entry(key.clone())
                    .or_insert_with(|| ParamValue::Scalar(String::new()));
                assign(child, rest, value);
            }
        }
    }
}

/// The query side of an inbound request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    query: QueryParameters,
    raw_query: Option<String>,
}

impl RequestContext {
    /// Wrap already-decoded parameters. There is no raw query string to re-parse.
    pub fn new(query: QueryParameters) -> Self {
        Self {
            query,
            raw_query: None,
        }
    }

    /// Build a context the way the transport does: flattened keys, raw string kept.
    pub fn from_query_string(raw: &str) -> Self {
        Self {
            query: parse_query_string(raw, KeyMode::Flattened),
            raw_query: Some(raw.to_string()),
        }
    }

    pub fn query(&self) -> &QueryParameters {
        &self.query
    }

    pub fn raw_query(&self) -> Option<&str> {
        self.raw_query.as_deref()
    }

    pub fn has(&self, key: &str) -> bool {
        self.query.contains_key(key)
    }

    /// Parameters re-parsed from the raw query string with dotted keys preserved.
    pub fn expanded_query(&self) -> QueryParameters {
        match &self.raw_query {
            Some(raw) => parse_query_string(raw, KeyMode::Preserved),
            None => self.query.clone(),
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for RequestContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
