//! Membership operations on `&str -> IdBitmap` tables.

use super::IdBitmap;
use crate::Result;
use redb::ReadableTable;
use roaring::RoaringTreemap;

/// Read operations on an id bitmap table.
pub trait IdBitmapReadOnlyTable {
    /// Ids stored under `key`, empty when the key is absent.
    fn get_ids(&self, key: &str) -> Result<RoaringTreemap>;

    /// Every `(key, member count)` pair in key order.
    fn member_counts(&self) -> Result<Vec<(String, u64)>>;
}

/// Write operations on an id bitmap table. Empty sets are never stored.
pub trait IdBitmapTable: IdBitmapReadOnlyTable {
    fn insert_member(&mut self, key: &str, id: u64) -> Result<()>;

    fn remove_member(&mut self, key: &str, id: u64) -> Result<()>;
}

fn read_ids<T>(table: &T, key: &str) -> Result<RoaringTreemap>
where
    T: ReadableTable<&'static str, IdBitmap>,
{
    Ok(table
        .get(key)?
        .map(|guard| guard.value().into_ids())
        .unwrap_or_default())
}

fn read_member_counts<T>(table: &T) -> Result<Vec<(String, u64)>>
where
    T: ReadableTable<&'static str, IdBitmap>,
{
    let mut counts = Vec::new();
    for entry in table.iter()? {
        let (key, value) = entry?;
        counts.push((key.value().to_string(), value.value().len()));
    }
    Ok(counts)
}

impl IdBitmapReadOnlyTable for redb::ReadOnlyTable<&'static str, IdBitmap> {
    fn get_ids(&self, key: &str) -> Result<RoaringTreemap> {
        read_ids(self, key)
    }

    fn member_counts(&self) -> Result<Vec<(String, u64)>> {
        read_member_counts(self)
    }
}

impl IdBitmapReadOnlyTable for redb::Table<'_, &'static str, IdBitmap> {
    fn get_ids(&self, key: &str) -> Result<RoaringTreemap> {
        read_ids(self, key)
    }

    fn member_counts(&self) -> Result<Vec<(String, u64)>> {
        read_member_counts(self)
    }
}

impl IdBitmapTable for redb::Table<'_, &'static str, IdBitmap> {
    fn insert_member(&mut self, key: &str, id: u64) -> Result<()> {
        let mut ids = self.get_ids(key)?;
        if ids.insert(id) {
            self.insert(key, IdBitmap::from(ids))?;
        }
        Ok(())
    }

    fn remove_member(&mut self, key: &str, id: u64) -> Result<()> {
        let mut ids = self.get_ids(key)?;
        if !ids.remove(id) {
            return Ok(());
        }

        if ids.is_empty() {
            self.remove(key)?;
        } else {
            self.insert(key, IdBitmap::from(ids))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redb::{Database, ReadableDatabase, TableDefinition};
    use tempfile::NamedTempFile;

    const INDEX: TableDefinition<&str, IdBitmap> = TableDefinition::new("test_index");

    #[test]
    fn members_are_added_and_dropped() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let temp_file = NamedTempFile::new()?;
        let db = Database::create(temp_file.path())?;

        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(INDEX)?;
            table.insert_member("a", 1)?;
            table.insert_member("a", 2)?;
            table.insert_member("a", 2)?;
            table.insert_member("b", 3)?;
            table.remove_member("b", 3)?;
            table.remove_member("z", 9)?;

            assert_eq!(table.get_ids("a")?.len(), 2);
            assert!(table.get_ids("b")?.is_empty());
        }
        write_txn.commit()?;

        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(INDEX)?;
        assert_eq!(table.member_counts()?, vec![("a".to_string(), 2)]);

        Ok(())
    }
}
