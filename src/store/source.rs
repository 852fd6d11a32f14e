//! Read view over a [`RecordStore`].

use super::{RecordStore, BLANK_KEY};
use crate::bitmap::{IdBitmap, IdBitmapReadOnlyTable};
use crate::source::{GroupCounter, Predicate, RawGroupKey, Record, RecordFilter};
use crate::{Error, Result};
use redb::{ReadOnlyTable, ReadTransaction, ReadableTable, TableDefinition, TableError};
use roaring::RoaringTreemap;

/// Ids of the records matching a predicate, in id order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    ids: RoaringTreemap,
}

impl RecordSet {
    pub fn new(ids: RoaringTreemap) -> Self {
        Self { ids }
    }

    pub fn len(&self) -> u64 {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.ids.iter()
    }

    pub fn ids(&self) -> &RoaringTreemap {
        &self.ids
    }
}

/// Paginator source reading one consistent snapshot of a store.
pub struct RedbSource<'a> {
    store: &'a RecordStore,
    txn: &'a ReadTransaction,
}

impl<'a> RedbSource<'a> {
    pub fn new(store: &'a RecordStore, txn: &'a ReadTransaction) -> Self {
        Self { store, txn }
    }

    /// Opens a table, treating a table that was never created as absent.
    fn open<K, V>(
        &self,
        definition: TableDefinition<'_, K, V>,
    ) -> Result<Option<ReadOnlyTable<K, V>>>
    where
        K: redb::Key + 'static,
        V: redb::Value + 'static,
    {
        match self.txn.open_table(definition) {
            Ok(table) => Ok(Some(table)),
            Err(TableError::TableDoesNotExist(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn open_index(&self, field: &str) -> Result<Option<ReadOnlyTable<&'static str, IdBitmap>>> {
        let name = self.store.index_table_name(field);
        self.open(RecordStore::index_table(&name))
    }

    /// Defined field names in key order.
    pub fn fields(&self) -> Result<Vec<String>> {
        let Some(fields) = self.open(self.store.fields_table())? else {
            return Ok(Vec::new());
        };

        let mut names = Vec::new();
        for entry in fields.iter()? {
            let (name, _) = entry?;
            names.push(name.value().to_string());
        }
        Ok(names)
    }

    /// Ids of every stored record.
    pub fn all_ids(&self) -> Result<RoaringTreemap> {
        let Some(records) = self.open(self.store.records_table())? else {
            return Ok(RoaringTreemap::new());
        };

        let mut ids = RoaringTreemap::new();
        for entry in records.iter()? {
            let (id, _) = entry?;
            ids.insert(id.value());
        }
        Ok(ids)
    }

    /// Materializes the records of a set with all their defined fields.
    pub fn load(&self, set: &RecordSet) -> Result<Vec<Record>> {
        let fields = self.fields()?;
        let Some(values) = self.open(self.store.values_table())? else {
            return Ok(set.iter().map(Record::new).collect());
        };

        let mut records = Vec::with_capacity(set.len() as usize);
        for id in set.iter() {
            let mut record = Record::new(id);
            for field in &fields {
                let value = values
                    .get((id, field.as_str()))?
                    .and_then(|guard| guard.value().map(str::to_string));
                record.values.insert(field.clone(), value);
            }
            records.push(record);
        }
        Ok(records)
    }

    fn ids_under(&self, field: &str, key: &str) -> Result<RoaringTreemap> {
        match self.open_index(field)? {
            Some(index) => index.get_ids(key),
            None => Ok(RoaringTreemap::new()),
        }
    }
}

impl GroupCounter for RedbSource<'_> {
    fn has_field(&self, field: &str) -> Result<bool> {
        match self.open(self.store.fields_table())? {
            Some(fields) => Ok(fields.get(field)?.is_some()),
            None => Ok(false),
        }
    }

    fn count_by_first_char(&self, field: &str) -> Result<Vec<(RawGroupKey, u64)>> {
        if !self.has_field(field)? {
            return Err(Error::InvalidField(field.to_string()));
        }

        let counts = match self.open_index(field)? {
            Some(index) => index.member_counts()?,
            None => Vec::new(),
        };
        Ok(counts.into_iter().map(|(key, count)| (Some(key), count)).collect())
    }
}

impl RecordFilter for RedbSource<'_> {
    type Records = RecordSet;

    fn filter(&self, predicate: &Predicate) -> Result<RecordSet> {
        let ids = match predicate {
            Predicate::MatchAll => self.all_ids()?,
            Predicate::StartsWith { field, letter } => {
                self.ids_under(field, &letter.raw_key())?
            }
            Predicate::BlankOrNull { field } => self.ids_under(field, BLANK_KEY)?,
        };
        Ok(RecordSet::new(ids))
    }
}
