use super::{AttributeQueryBuilder, FilterValue, OrderDirection, QueryBuilder};
use crate::resolve::AttributePath;
use crate::schema::FamilyRegistry;
use crate::store::{DataRecord, InMemoryStore, RecordValue};
use regex::Regex;
use std::cmp::Ordering;

/// An attribute reached from the root family, possibly across relations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryAttribute {
    /// Relation attribute codes followed from the root record.
    pub hops: Vec<String>,
    /// Family owning the final attribute.
    pub family: String,
    pub attribute: String,
}

impl AttributeQueryBuilder for MemoryAttribute {
    type Handler = Predicate;

    fn equals(&self, value: FilterValue) -> Predicate {
        Predicate::Equals {
            target: self.clone(),
            value,
        }
    }

    fn like(&self, pattern: &str) -> Predicate {
        Predicate::Like {
            target: self.clone(),
            pattern: pattern.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    True,
    Equals {
        target: MemoryAttribute,
        value: FilterValue,
    },
    Like {
        target: MemoryAttribute,
        pattern: String,
    },
    And(Vec<Predicate>),
}

/// A query over the records of one family in an [`InMemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryQuery<'s> {
    store: &'s InMemoryStore,
    registry: &'s FamilyRegistry,
    family: String,
    conditions: Vec<Predicate>,
    ordering: Vec<(MemoryAttribute, OrderDirection)>,
}

impl<'s> MemoryQuery<'s> {
    pub fn new(store: &'s InMemoryStore, registry: &'s FamilyRegistry, family: &str) -> Self {
        Self {
            store,
            registry,
            family: family.to_string(),
            conditions: Vec::new(),
            ordering: Vec::new(),
        }
    }

    /// Conditions attached so far, in the order they were applied.
    pub fn conditions(&self) -> &[Predicate] {
        &self.conditions
    }

    pub fn ordering(&self) -> &[(MemoryAttribute, OrderDirection)] {
        &self.ordering
    }

    /// Records of the root family matching every condition, sorted by the
    /// order clauses. Records missing a sort value come last.
    pub fn execute(&self) -> Vec<&'s DataRecord> {
        let mut records: Vec<&'s DataRecord> = self
            .store
            .of_family(&self.family)
            .filter(|record| self.conditions.iter().all(|p| self.matches(p, record)))
            .collect();

        if !self.ordering.is_empty() {
            records.sort_by(|a, b| {
                self.ordering
                    .iter()
                    .map(|(target, direction)| {
                        let left = self.values_at(a, target).into_iter().next();
                        let right = self.values_at(b, target).into_iter().next();
                        compare_sort_keys(left, right, *direction)
                    })
                    .find(|ordering| *ordering != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }
        log::debug!(
            "memory query on '{}' matched {} record(s)",
            self.family,
            records.len()
        );
        records
    }

    fn matches(&self, predicate: &Predicate, record: &DataRecord) -> bool {
        match predicate {
            Predicate::True => true,
            Predicate::And(inner) => inner.iter().all(|p| self.matches(p, record)),
            Predicate::Equals { target, value } => self
                .values_at(record, target)
                .into_iter()
                .any(|stored| self.value_equals(stored, value)),
            Predicate::Like { target, pattern } => {
                self.values_at(record, target).into_iter().any(|stored| {
                    stored
                        .like_subject()
                        .is_some_and(|subject| like_matches(pattern, &subject))
                })
            }
        }
    }

    /// Values of the target attribute on every record reachable through the hops.
    fn values_at<'a>(&'a self, record: &'a DataRecord, target: &MemoryAttribute) -> Vec<&'a RecordValue> {
        let mut frontier = vec![record];
        for hop in &target.hops {
            frontier = frontier
                .into_iter()
                .filter_map(|r| r.get(hop))
                .flat_map(RecordValue::references)
                .filter_map(|id| self.store.get(&id))
                .collect();
        }
        frontier
            .into_iter()
            .filter_map(|r| r.get(&target.attribute))
            .collect()
    }

    fn value_equals(&self, stored: &RecordValue, value: &FilterValue) -> bool {
        match value {
            FilterValue::Bool(expected) => stored.equals_bool(*expected),
            FilterValue::Text(raw) => self.raw_equals(stored, raw),
            FilterValue::List(raws) => raws.iter().any(|raw| self.raw_equals(stored, raw)),
        }
    }

    /// References match either the referenced id or the referenced record's identifier.
    fn raw_equals(&self, stored: &RecordValue, raw: &str) -> bool {
        if stored.matches_raw(raw) {
            return true;
        }
        stored.references().iter().any(|id| {
            let Some(referenced) = self.store.get(id) else {
                return false;
            };
            self.registry
                .get_family(&referenced.family)
                .ok()
                .and_then(|family| family.identifier_attribute())
                .and_then(|identifier| referenced.get(&identifier.code))
                .is_some_and(|value| value.matches_raw(raw))
        })
    }
}

impl QueryBuilder for MemoryQuery<'_> {
    type Handler = Predicate;
    type Attribute = MemoryAttribute;

    fn attribute(&mut self, path: &AttributePath<'_>) -> MemoryAttribute {
        MemoryAttribute {
            hops: path.hops.iter().map(|hop| hop.code.clone()).collect(),
            family: path.attribute.family.clone(),
            attribute: path.attribute.code.clone(),
        }
    }

    fn order_by(&mut self, attribute: &MemoryAttribute, direction: OrderDirection) {
        self.ordering.push((attribute.clone(), direction));
    }

    fn and(&mut self, handlers: Vec<Predicate>) -> Predicate {
        if handlers.is_empty() {
            Predicate::True
        } else {
            Predicate::And(handlers)
        }
    }

    fn apply(&mut self, handler: Predicate) {
        self.conditions.push(handler);
    }
}

fn compare_sort_keys(
    left: Option<&RecordValue>,
    right: Option<&RecordValue>,
    direction: OrderDirection,
) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = a.compare(b).unwrap_or(Ordering::Equal);
            match direction {
                OrderDirection::Asc => ordering,
                OrderDirection::Desc => ordering.reverse(),
            }
        }
    }
}

/// SQL `LIKE`: `%` matches any run of characters, `_` exactly one. Case-sensitive.
pub fn like_matches(pattern: &str, subject: &str) -> bool {
    match like_regex(pattern) {
        Ok(regex) => regex.is_match(subject),
        Err(err) => {
            log::warn!("LIKE pattern '{}' did not compile: {}", pattern, err);
            false
        }
    }
}

/// Translate a `LIKE` pattern into an anchored regex; other characters match literally.
pub fn like_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut translated = String::from("(?s)^");
    let mut buf = [0u8; 4];
    for c in pattern.chars() {
        match c {
            '%' => translated.push_str(".*"),
            '_' => translated.push('.'),
            c => translated.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
    translated.push('$');
    Regex::new(&translated)
}
