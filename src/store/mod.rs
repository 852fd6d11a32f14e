//! redb-backed record store with a first-letter index.
//!
//! Records live under a table prefix. Every defined field gets its own
//! index table mapping the raw group key of a value (its lower-cased first
//! character, or `""` for empty and null values) to the roaring bitmap of
//! record ids carrying it. Counting a field is then a scan over at most a
//! few dozen index entries and filtering is a single bitmap lookup.
//!
//! Tables, for prefix `p`:
//! - `p_fields`: defined field names
//! - `p_records`: record ids
//! - `p_values`: `(id, field)` to the nullable value
//! - `p_idx_<field>`: raw group key to [`IdBitmap`]

use crate::bitmap::{IdBitmap, IdBitmapTable};
use crate::group::raw_key_of;
use crate::source::Record;
use crate::{Error, Result};
use redb::{ReadTransaction, ReadableTable, TableDefinition, WriteTransaction};

pub mod source;

pub use source::{RecordSet, RedbSource};

/// Index key shared by empty and null values.
pub const BLANK_KEY: &str = "";

type FieldsTable<'a> = TableDefinition<'a, &'static str, ()>;
type RecordsTable<'a> = TableDefinition<'a, u64, ()>;
type ValuesTable<'a> = TableDefinition<'a, (u64, &'static str), Option<&'static str>>;
type IndexTable<'a> = TableDefinition<'a, &'static str, IdBitmap>;

/// Index key of a field value.
pub fn index_key(value: Option<&str>) -> String {
    raw_key_of(value).unwrap_or_default()
}

/// Record store rooted at a table prefix.
#[derive(Debug, Clone)]
pub struct RecordStore {
    prefix: String,
    fields_name: String,
    records_name: String,
    values_name: String,
}

impl RecordStore {
    /// Creates a store handle for the tables under `prefix`.
    ///
    /// Nothing is written until a field is defined or a record inserted.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            fields_name: format!("{}_fields", prefix),
            records_name: format!("{}_records", prefix),
            values_name: format!("{}_values", prefix),
            prefix,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Name of the index table for `field`.
    pub fn index_table_name(&self, field: &str) -> String {
        format!("{}_idx_{}", self.prefix, field)
    }

    fn fields_table(&self) -> FieldsTable<'_> {
        TableDefinition::new(&self.fields_name)
    }

    fn records_table(&self) -> RecordsTable<'_> {
        TableDefinition::new(&self.records_name)
    }

    fn values_table(&self) -> ValuesTable<'_> {
        TableDefinition::new(&self.values_name)
    }

    fn index_table(name: &str) -> IndexTable<'_> {
        TableDefinition::new(name)
    }

    /// Opens a read view implementing the paginator's source capabilities.
    pub fn source<'a>(&'a self, txn: &'a ReadTransaction) -> RedbSource<'a> {
        RedbSource::new(self, txn)
    }

    /// Registers a bucketable field. Existing records read as null in it.
    ///
    /// # Returns
    /// `false` when the field was already defined
    pub fn define_field(&self, txn: &WriteTransaction, field: &str) -> Result<bool> {
        let mut fields = txn.open_table(self.fields_table())?;
        if fields.get(field)?.is_some() {
            return Ok(false);
        }
        fields.insert(field, ())?;

        let index_name = self.index_table_name(field);
        let mut index = txn.open_table(Self::index_table(&index_name))?;
        let mut values = txn.open_table(self.values_table())?;
        let records = txn.open_table(self.records_table())?;

        let mut backfilled = 0u64;
        for entry in records.iter()? {
            let (id, _) = entry?;
            let id = id.value();
            values.insert((id, field), None::<&str>)?;
            index.insert_member(BLANK_KEY, id)?;
            backfilled += 1;
        }

        tracing::trace!(prefix = %self.prefix, field, backfilled, "defined field");
        Ok(true)
    }

    /// Defined field names in key order.
    pub fn fields(&self, txn: &WriteTransaction) -> Result<Vec<String>> {
        let fields = txn.open_table(self.fields_table())?;
        let mut names = Vec::new();
        for entry in fields.iter()? {
            let (name, _) = entry?;
            names.push(name.value().to_string());
        }
        Ok(names)
    }

    /// Inserts or replaces a record, keeping every field index current.
    ///
    /// Defined fields missing from `record` are stored as null.
    ///
    /// # Errors
    /// `Error::InvalidField` when `record` carries an undefined field; the
    /// check runs before anything is written.
    pub fn insert(&self, txn: &WriteTransaction, record: &Record) -> Result<()> {
        let fields = self.fields(txn)?;
        if let Some(unknown) = record.values.keys().find(|name| !fields.contains(*name)) {
            return Err(Error::InvalidField(unknown.clone()));
        }

        txn.open_table(self.records_table())?.insert(record.id, ())?;

        let mut values = txn.open_table(self.values_table())?;
        for field in &fields {
            let value = record.value(field);
            let new_key = index_key(value);
            let old_key = values
                .insert((record.id, field.as_str()), value)?
                .map(|previous| index_key(previous.value()));

            if old_key.as_deref() == Some(new_key.as_str()) {
                continue;
            }

            let index_name = self.index_table_name(field);
            let mut index = txn.open_table(Self::index_table(&index_name))?;
            if let Some(old_key) = old_key {
                index.remove_member(&old_key, record.id)?;
            }
            index.insert_member(&new_key, record.id)?;
        }

        tracing::trace!(prefix = %self.prefix, id = record.id, "stored record");
        Ok(())
    }

    /// Removes a record and its index entries.
    ///
    /// # Returns
    /// `false` when no record with `id` exists
    pub fn remove(&self, txn: &WriteTransaction, id: u64) -> Result<bool> {
        let existed = txn
            .open_table(self.records_table())?
            .remove(id)?
            .is_some();
        if !existed {
            return Ok(false);
        }

        let fields = self.fields(txn)?;
        let mut values = txn.open_table(self.values_table())?;
        for field in &fields {
            let old_key = values
                .remove((id, field.as_str()))?
                .map(|previous| index_key(previous.value()));

            if let Some(old_key) = old_key {
                let index_name = self.index_table_name(field);
                let mut index = txn.open_table(Self::index_table(&index_name))?;
                index.remove_member(&old_key, id)?;
            }
        }

        tracing::trace!(prefix = %self.prefix, id, "removed record");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::IdBitmapReadOnlyTable;
    use redb::{Database, ReadableDatabase};
    use tempfile::NamedTempFile;

    fn index_counts(
        db: &Database,
        store: &RecordStore,
        field: &str,
    ) -> std::result::Result<Vec<(String, u64)>, Box<dyn std::error::Error>> {
        let read_txn = db.begin_read()?;
        let name = store.index_table_name(field);
        let table = read_txn.open_table(RecordStore::index_table(&name))?;
        Ok(table.member_counts()?)
    }

    #[test]
    fn insert_replace_and_remove_keep_index_current(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let temp_file = NamedTempFile::new()?;
        let db = Database::create(temp_file.path())?;
        let store = RecordStore::new("people");

        let write_txn = db.begin_write()?;
        assert!(store.define_field(&write_txn, "last_name")?);
        assert!(!store.define_field(&write_txn, "last_name")?);
        store.insert(&write_txn, &Record::new(1).with("last_name", Some("Lovelace")))?;
        store.insert(&write_txn, &Record::new(2).with("last_name", Some("lamport")))?;
        store.insert(&write_txn, &Record::new(3))?;
        write_txn.commit()?;

        assert_eq!(
            index_counts(&db, &store, "last_name")?,
            vec![(String::new(), 1), ("l".to_string(), 2)]
        );

        let write_txn = db.begin_write()?;
        store.insert(&write_txn, &Record::new(2).with("last_name", Some("Knuth")))?;
        assert!(store.remove(&write_txn, 3)?);
        assert!(!store.remove(&write_txn, 3)?);
        write_txn.commit()?;

        assert_eq!(
            index_counts(&db, &store, "last_name")?,
            vec![("k".to_string(), 1), ("l".to_string(), 1)]
        );

        Ok(())
    }

    #[test]
    fn late_fields_backfill_as_blank() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let temp_file = NamedTempFile::new()?;
        let db = Database::create(temp_file.path())?;
        let store = RecordStore::new("people");

        let write_txn = db.begin_write()?;
        store.define_field(&write_txn, "last_name")?;
        store.insert(&write_txn, &Record::new(1).with("last_name", Some("Hopper")))?;
        store.insert(&write_txn, &Record::new(2).with("last_name", Some("Hamming")))?;
        store.define_field(&write_txn, "city")?;
        write_txn.commit()?;

        assert_eq!(
            index_counts(&db, &store, "city")?,
            vec![(String::new(), 2)]
        );

        Ok(())
    }

    #[test]
    fn undefined_fields_are_rejected_before_writing(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let temp_file = NamedTempFile::new()?;
        let db = Database::create(temp_file.path())?;
        let store = RecordStore::new("people");

        let write_txn = db.begin_write()?;
        store.define_field(&write_txn, "last_name")?;
        let err = store
            .insert(&write_txn, &Record::new(9).with("nickname", Some("Grace")))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidField(ref field) if field == "nickname"));
        assert!(!store.remove(&write_txn, 9)?);
        write_txn.commit()?;

        Ok(())
    }

    #[test]
    fn index_keys_lower_the_initial() {
        assert_eq!(index_key(Some("Zed")), "z");
        assert_eq!(index_key(Some("")), BLANK_KEY);
        assert_eq!(index_key(None), BLANK_KEY);
    }
}
