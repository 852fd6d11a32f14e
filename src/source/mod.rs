//! Data-source capabilities consumed by the paginator.
//!
//! A source must answer two questions: how many records fall under each
//! first character of a field, and which records match a group predicate.
//! Implementations live in [`memory`] (plain vectors) and
//! [`crate::store`] (redb with a roaring first-letter index).

use crate::group::Letter;
use crate::Result;
use std::collections::BTreeMap;

pub mod memory;

pub use memory::MemorySource;

/// Lower-cased first character of a field value as reported by a source.
///
/// `None` stands for null and `Some("")` for an empty value; both belong to
/// the `Blank` group.
pub type RawGroupKey = Option<String>;

/// Filter handed to [`RecordFilter::filter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Every record matches.
    MatchAll,

    /// The field value starts with `letter`, ignoring case.
    StartsWith { field: String, letter: Letter },

    /// The field value is empty or null.
    BlankOrNull { field: String },
}

impl Predicate {
    /// Tests a single field value against the predicate.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Predicate::MatchAll => true,
            Predicate::StartsWith { letter, .. } => {
                value.map_or(false, |value| letter.is_initial_of(value))
            }
            Predicate::BlankOrNull { .. } => value.map_or(true, str::is_empty),
        }
    }

    /// Field the predicate reads, `None` for [`Predicate::MatchAll`].
    pub fn field(&self) -> Option<&str> {
        match self {
            Predicate::MatchAll => None,
            Predicate::StartsWith { field, .. } | Predicate::BlankOrNull { field } => {
                Some(field.as_str())
            }
        }
    }
}

/// Counts records by the first character of a field.
pub trait GroupCounter {
    /// Whether `field` names a queryable text field of this source.
    fn has_field(&self, field: &str) -> Result<bool>;

    /// Record counts grouped by the lower-cased first character of `field`.
    fn count_by_first_char(&self, field: &str) -> Result<Vec<(RawGroupKey, u64)>>;
}

/// Fetches the records matching a predicate.
pub trait RecordFilter {
    /// The record view returned to callers.
    type Records;

    fn filter(&self, predicate: &Predicate) -> Result<Self::Records>;
}

/// A source offering both capabilities.
pub trait RecordSource: GroupCounter + RecordFilter {}

impl<T: GroupCounter + RecordFilter + ?Sized> RecordSource for T {}

/// A record with an id and named, nullable text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub id: u64,
    pub values: BTreeMap<String, Option<String>>,
}

impl Record {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            values: BTreeMap::new(),
        }
    }

    /// Builder-style setter; `None` stores a null.
    pub fn with(mut self, field: impl Into<String>, value: Option<&str>) -> Self {
        self.values.insert(field.into(), value.map(str::to_string));
        self
    }

    /// Value of a field. Missing fields read as null.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).and_then(|value| value.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_ignores_case() {
        let predicate = Predicate::StartsWith {
            field: "name".to_string(),
            letter: Letter::new('b').unwrap(),
        };
        assert!(predicate.matches(Some("banana")));
        assert!(predicate.matches(Some("Banana")));
        assert!(!predicate.matches(Some("apple")));
        assert!(!predicate.matches(Some("")));
        assert!(!predicate.matches(None));
        assert_eq!(predicate.field(), Some("name"));
    }

    #[test]
    fn blank_or_null_matches_both() {
        let predicate = Predicate::BlankOrNull {
            field: "name".to_string(),
        };
        assert!(predicate.matches(Some("")));
        assert!(predicate.matches(None));
        assert!(!predicate.matches(Some(" ")));
    }

    #[test]
    fn missing_record_field_reads_null() {
        let record = Record::new(1).with("name", Some("Ada"));
        assert_eq!(record.value("name"), Some("Ada"));
        assert_eq!(record.value("email"), None);
    }
}
