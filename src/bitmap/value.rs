//! Record id bitmap stored as a redb value.

use super::BitmapError;
use crate::Result;
use redb::Value as RedbValue;
use roaring::RoaringTreemap;

const FORMAT_VERSION: u8 = 1;

/// Set of record ids sharing one raw group key.
///
/// Stored as a version byte followed by the portable roaring encoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdBitmap {
    ids: RoaringTreemap,
}

impl IdBitmap {
    pub fn new(ids: RoaringTreemap) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &RoaringTreemap {
        &self.ids
    }

    pub fn into_ids(self) -> RoaringTreemap {
        self.ids
    }

    /// Number of records in the set.
    pub fn len(&self) -> u64 {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Encodes the set into storage format.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(1 + self.ids.serialized_size());
        buf.push(FORMAT_VERSION);
        self.ids
            .serialize_into(&mut buf)
            .map_err(|e| BitmapError::SerializationFailed(e.to_string()))?;
        Ok(buf)
    }

    /// Decodes storage bytes, rejecting unknown format versions.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (version, body) = data
            .split_first()
            .ok_or_else(|| BitmapError::InvalidBitmap("empty data".to_string()))?;

        if *version != FORMAT_VERSION {
            return Err(
                BitmapError::InvalidBitmap(format!("unsupported version {}", version)).into(),
            );
        }

        let ids = RoaringTreemap::deserialize_from(body)
            .map_err(|e| BitmapError::SerializationFailed(e.to_string()))?;
        Ok(Self { ids })
    }
}

impl From<RoaringTreemap> for IdBitmap {
    fn from(ids: RoaringTreemap) -> Self {
        Self { ids }
    }
}

impl FromIterator<u64> for IdBitmap {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl RedbValue for IdBitmap {
    type SelfType<'a>
        = IdBitmap
    where
        Self: 'a;
    type AsBytes<'a>
        = Vec<u8>
    where
        Self: 'a;

    fn fixed_width() -> Option<usize> {
        None
    }

    fn from_bytes<'a>(data: &'a [u8]) -> Self::SelfType<'a>
    where
        Self: 'a,
    {
        // Only bytes written by `as_bytes` ever reach redb, so a decode
        // failure means a foreign table; it reads as an empty set.
        IdBitmap::decode(data).unwrap_or_default()
    }

    fn as_bytes<'a, 'b: 'a>(value: &'a Self::SelfType<'b>) -> Self::AsBytes<'a>
    where
        Self: 'b,
    {
        value.encode().unwrap_or_default()
    }

    fn type_name() -> redb::TypeName {
        redb::TypeName::new("redb_alphabar::IdBitmap")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn encode_decode_roundtrip() {
        let value: IdBitmap = [3u64, 17, 1 << 40].into_iter().collect();

        let encoded = value.encode().unwrap();
        assert_eq!(encoded[0], FORMAT_VERSION);

        let decoded = IdBitmap::decode(&encoded).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(decoded.len(), 3);
    }

    #[test]
    fn empty_data_is_rejected() {
        assert!(matches!(
            IdBitmap::decode(&[]),
            Err(Error::Bitmap(BitmapError::InvalidBitmap(_)))
        ));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut data = vec![99u8];
        data.extend_from_slice(b"garbage");
        assert!(matches!(
            IdBitmap::decode(&data),
            Err(Error::Bitmap(BitmapError::InvalidBitmap(_)))
        ));
    }

    #[test]
    fn corrupt_bytes_read_as_empty_through_redb() {
        let value = <IdBitmap as RedbValue>::from_bytes(&[7u8, 1, 2]);
        assert!(value.is_empty());
    }
}
