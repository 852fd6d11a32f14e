//! In-memory data source.

use super::{GroupCounter, Predicate, RawGroupKey, Record, RecordFilter};
use crate::group::raw_key_of;
use crate::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};

/// A fixed schema plus a vector of records, filtered by linear scan.
///
/// Records keep insertion order in filter results.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    fields: BTreeSet<String>,
    records: Vec<Record>,
}

impl MemorySource {
    /// Creates an empty source whose schema is `fields`.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            records: Vec::new(),
        }
    }

    /// Builds a single-field source, one record per value, ids from 1.
    pub fn from_values<'a, I>(field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut source = Self::new([field]);
        for (id, value) in (1u64..).zip(values) {
            source.push(Record::new(id).with(field, value));
        }
        source
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    fn check_field(&self, field: &str) -> Result<()> {
        if self.fields.contains(field) {
            Ok(())
        } else {
            Err(Error::InvalidField(field.to_string()))
        }
    }
}

impl GroupCounter for MemorySource {
    fn has_field(&self, field: &str) -> Result<bool> {
        Ok(self.fields.contains(field))
    }

    fn count_by_first_char(&self, field: &str) -> Result<Vec<(RawGroupKey, u64)>> {
        self.check_field(field)?;

        let mut counts: BTreeMap<RawGroupKey, u64> = BTreeMap::new();
        for record in &self.records {
            *counts.entry(raw_key_of(record.value(field))).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }
}

impl RecordFilter for MemorySource {
    type Records = Vec<Record>;

    fn filter(&self, predicate: &Predicate) -> Result<Vec<Record>> {
        let Some(field) = predicate.field() else {
            return Ok(self.records.clone());
        };
        self.check_field(field)?;

        Ok(self
            .records
            .iter()
            .filter(|record| predicate.matches(record.value(field)))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::Letter;

    fn fruit() -> MemorySource {
        MemorySource::from_values(
            "name",
            [Some("apple"), Some("Banana"), Some(""), Some("banana"), None],
        )
    }

    #[test]
    fn counts_group_by_lowered_initial() {
        let counts = fruit().count_by_first_char("name").unwrap();
        assert_eq!(
            counts,
            vec![
                (None, 1),
                (Some(String::new()), 1),
                (Some("a".to_string()), 1),
                (Some("b".to_string()), 2),
            ]
        );
    }

    #[test]
    fn unknown_field_is_rejected() {
        let source = fruit();
        assert!(!source.has_field("color").unwrap());
        assert!(matches!(
            source.count_by_first_char("color"),
            Err(Error::InvalidField(field)) if field == "color"
        ));
    }

    #[test]
    fn filters_keep_insertion_order() {
        let source = fruit();
        let bananas = source
            .filter(&Predicate::StartsWith {
                field: "name".to_string(),
                letter: Letter::new('B').unwrap(),
            })
            .unwrap();
        let ids: Vec<u64> = bananas.iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![2, 4]);

        let blanks = source
            .filter(&Predicate::BlankOrNull {
                field: "name".to_string(),
            })
            .unwrap();
        let ids: Vec<u64> = blanks.iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![3, 5]);

        assert_eq!(source.filter(&Predicate::MatchAll).unwrap().len(), 5);
    }
}
