//! Alphabetical bucket paginator.
//!
//! Instead of splitting a result set into pages of a fixed size, the
//! paginator splits it by the first letter of a field and returns one
//! letter at a time:
//!
//! ```ignore
//! let mut paginator = BucketPaginator::with_config(&config);
//! paginator.set_field("last_name");
//! paginator.set_group(params.get("ltr").map(String::as_str));
//! let users = paginator.resolve(&source)?;
//! ```
//!
//! A paginator is built per request. Configuration is set first, then
//! [`BucketPaginator::resolve`] populates the counts, the total and the
//! effective group, which stay readable through [`PaginatorView`].

use crate::config::AlphabarConfig;
use crate::group::{Group, GroupCounts, Letter};
use crate::source::{Predicate, RecordSource};
use crate::{Error, Result};


/// Group selected when no group has any record.
pub const FALLBACK_GROUP: Group = Group::Letter(Letter::A);

/// Read-only state of a resolved paginator, as consumed by navigation.
pub trait PaginatorView {
    /// Records in `group`; zero when absent or before resolution.
    fn count_of(&self, group: Group) -> u64;

    /// Groups holding records (plus `All` when offered), in scan order.
    fn populated_groups(&self) -> Vec<Group>;

    /// Records across all groups, `All` excluded.
    fn total_count(&self) -> u64;

    /// The group the last resolution selected.
    fn effective_group(&self) -> Option<Group>;

    /// Threshold below which bucketing is skipped.
    fn min_records(&self) -> Option<u64>;
}

/// Paginator splitting records by the initial of a field.
#[derive(Debug, Clone, Default)]
pub struct BucketPaginator {
    field: Option<String>,
    group: Option<Group>,
    all_option: bool,
    min_records: Option<u64>,
    counts: GroupCounts,
    effective: Option<Group>,
    predicate: Option<Predicate>,
}

impl BucketPaginator {
    /// Creates a paginator with no threshold and no `All` bucket.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a paginator using the threshold and `All` option of `config`.
    pub fn with_config(config: &AlphabarConfig) -> Self {
        Self {
            all_option: config.all_option,
            min_records: config.min_records,
            ..Self::default()
        }
    }

    pub fn set_field(&mut self, field: impl Into<String>) -> &mut Self {
        self.field = Some(field.into());
        self
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Sets the requested group from raw caller input.
    ///
    /// Input that is not a group key is dropped here, the same way
    /// resolution drops a group without records.
    pub fn set_group(&mut self, group: Option<&str>) -> &mut Self {
        self.group = group.and_then(|raw| match raw.parse::<Group>() {
            Ok(group) => Some(group),
            Err(err) => {
                tracing::debug!(%err, "discarding requested group");
                None
            }
        });
        self
    }

    pub fn set_group_key(&mut self, group: Option<Group>) -> &mut Self {
        self.group = group;
        self
    }

    /// The requested group. After resolution it equals the effective group.
    pub fn group(&self) -> Option<Group> {
        self.group
    }

    pub fn set_all_option(&mut self, all_option: bool) -> &mut Self {
        self.all_option = all_option;
        self
    }

    pub fn all_option(&self) -> bool {
        self.all_option
    }

    pub fn set_min_records(&mut self, min_records: Option<u64>) -> &mut Self {
        self.min_records = min_records;
        self
    }

    /// Counts of the last resolution.
    pub fn counts(&self) -> &GroupCounts {
        &self.counts
    }

    /// Predicate handed to the source by the last resolution.
    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    /// Whether the last resolution returned every record.
    pub fn is_bypassed(&self) -> bool {
        matches!(self.predicate, Some(Predicate::MatchAll))
    }

    /// Counts the source by initial, picks the effective group and returns
    /// the records in it.
    ///
    /// Every record is returned when the total is below the configured
    /// minimum or the effective group is `All`. A requested group without
    /// records is replaced by the first populated group in A..Z, Blank, All
    /// order, or by `A` when nothing is populated.
    ///
    /// # Errors
    /// `Error::InvalidField` when the field is unset or unknown to the
    /// source, checked before any query. Source errors pass through. On
    /// error the previous resolution state is left untouched.
    pub fn resolve<S>(&mut self, source: &S) -> Result<S::Records>
    where
        S: RecordSource + ?Sized,
    {
        let field = match self.field.as_deref() {
            Some(field) if source.has_field(field)? => field.to_string(),
            field => return Err(Error::InvalidField(field.unwrap_or_default().to_string())),
        };

        let mut counts = GroupCounts::from_raw(source.count_by_first_char(&field)?);
        if self.all_option {
            counts = counts.with_all();
        }

        let requested = self.group.filter(|group| counts.contains(*group));
        if let (Some(group), None) = (self.group, requested) {
            tracing::debug!(%group, field = %field, "requested group has no records");
        }

        let effective = requested
            .or_else(|| Group::scan_order(self.all_option).find(|group| counts.contains(*group)))
            .unwrap_or(FALLBACK_GROUP);

        let total = counts.total();
        let predicate = bucket_predicate(&field, effective, total, self.min_records);
        let records = source.filter(&predicate)?;

        tracing::debug!(
            field = %field,
            total,
            group = %effective,
            bypassed = matches!(predicate, Predicate::MatchAll),
            "resolved alphabar"
        );

        self.counts = counts;
        self.group = Some(effective);
        self.effective = Some(effective);
        self.predicate = Some(predicate);

        Ok(records)
    }
}

impl PaginatorView for BucketPaginator {
    fn count_of(&self, group: Group) -> u64 {
        self.counts.get(group)
    }

    fn populated_groups(&self) -> Vec<Group> {
        self.counts.groups()
    }

    fn total_count(&self) -> u64 {
        self.counts.total()
    }

    fn effective_group(&self) -> Option<Group> {
        self.effective
    }

    fn min_records(&self) -> Option<u64> {
        self.min_records
    }
}

fn bucket_predicate(
    field: &str,
    group: Group,
    total: u64,
    min_records: Option<u64>,
) -> Predicate {
    let below_minimum = min_records.map_or(false, |min| total < min);

    match group {
        _ if below_minimum => Predicate::MatchAll,
        Group::All => Predicate::MatchAll,
        Group::Blank => Predicate::BlankOrNull {
            field: field.to_string(),
        },
        Group::Letter(letter) => Predicate::StartsWith {
            field: field.to_string(),
            letter,
        },
    }
}
