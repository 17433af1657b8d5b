use super::DataRecord;
use crate::schema::Family;
use indexmap::IndexMap;
use uuid::Uuid;

/// In-memory record store.
///
/// Records keep insertion order, so unordered queries return them in the
/// order they were added.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: IndexMap<Uuid, DataRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record, returning its id.
    pub fn insert(&mut self, record: DataRecord) -> Uuid {
        let id = record.id;
        self.records.insert(id, record);
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<&DataRecord> {
        self.records.get(id)
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<DataRecord> {
        self.records.shift_remove(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records belonging to the given family, in insertion order.
    pub fn of_family<'a, 'f>(&'a self, family: &'f str) -> impl Iterator<Item = &'a DataRecord> + 'f
    where
        'a: 'f,
    {
        self.records.values().filter(move |r| r.family == family)
    }

    /// Find a record by the value of its family's identifier attribute,
    /// falling back to the record id.
    pub fn find_by_identifier(&self, family: &Family, id: &str) -> Option<&DataRecord> {
        let by_identifier = family.identifier_attribute().and_then(|identifier| {
            self.of_family(family.code()).find(|record| {
                record
                    .get(&identifier.code)
                    .is_some_and(|value| value.matches_raw(id))
            })
        });

        by_identifier.or_else(|| {
            let uuid = Uuid::parse_str(id).ok()?;
            self.get(&uuid).filter(|record| record.family == family.code())
        })
    }
}
