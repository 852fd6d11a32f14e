//! Per-resolution group count table.

use super::Group;
use std::cell::OnceCell;
use std::collections::BTreeMap;

/// Record counts per group for one resolution.
///
/// Only groups with at least one record are stored, except `All`, which
/// is stored (possibly as zero) whenever the paginator offers it. Initials
/// outside A–Z have no bucket; they are tallied separately so the total
/// still reflects every record.
#[derive(Debug, Clone, Default)]
pub struct GroupCounts {
    counts: BTreeMap<Group, u64>,
    unbucketed: u64,
    total: OnceCell<u64>,
}

impl GroupCounts {
    /// Creates an empty table. Every lookup reports zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from the raw `(first char, count)` pairs a data
    /// source reports. Raw keys collapsing onto the same group are summed.
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = (Option<S>, u64)>,
        S: AsRef<str>,
    {
        let mut table = Self::new();

        for (key, count) in raw {
            if count == 0 {
                continue;
            }

            match Group::from_raw_key(key.as_ref().map(|key| key.as_ref())) {
                Some(group) => *table.counts.entry(group).or_insert(0) += count,
                None => table.unbucketed += count,
            }
        }

        table
    }

    /// Adds the `All` bucket, mapped to the total of every other bucket.
    pub fn with_all(mut self) -> Self {
        let total = self.total();
        self.counts.insert(Group::All, total);
        self
    }

    /// Count for a group, zero when absent.
    pub fn get(&self, group: Group) -> u64 {
        self.counts.get(&group).copied().unwrap_or(0)
    }

    pub fn contains(&self, group: Group) -> bool {
        self.counts.contains_key(&group)
    }

    /// Groups present in the table, in scan order.
    pub fn groups(&self) -> Vec<Group> {
        self.counts.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Records whose initial has no bucket.
    pub fn unbucketed(&self) -> u64 {
        self.unbucketed
    }

    /// Sum of every bucket except `All`, plus the unbucketed tally.
    ///
    /// Computed on first access and memoized.
    pub fn total(&self) -> u64 {
        *self.total.get_or_init(|| {
            self.counts
                .iter()
                .filter(|(group, _)| !group.is_all())
                .map(|(_, count)| *count)
                .sum::<u64>()
                + self.unbucketed
        })
    }

    /// Iterates `(group, count)` pairs in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (Group, u64)> + '_ {
        self.counts.iter().map(|(group, count)| (*group, *count))
    }
}

impl PartialEq for GroupCounts {
    fn eq(&self, other: &Self) -> bool {
        self.counts == other.counts && self.unbucketed == other.unbucketed
    }
}

impl Eq for GroupCounts {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::Letter;

    fn letter(c: char) -> Group {
        Group::Letter(Letter::new(c).unwrap())
    }

    #[test]
    fn empty_table_reports_zero() {
        let counts = GroupCounts::new();
        assert_eq!(counts.get(letter('A')), 0);
        assert_eq!(counts.get(Group::All), 0);
        assert_eq!(counts.total(), 0);
        assert!(counts.groups().is_empty());
    }

    #[test]
    fn null_and_empty_merge_into_blank() {
        let counts = GroupCounts::from_raw(vec![
            (Some("a"), 1),
            (Some("b"), 2),
            (Some(""), 1),
            (None, 1),
        ]);

        assert_eq!(counts.get(Group::Blank), 2);
        assert_eq!(counts.get(letter('A')), 1);
        assert_eq!(counts.get(letter('B')), 2);
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn case_variants_are_summed() {
        let counts = GroupCounts::from_raw(vec![(Some("c"), 3), (Some("C"), 4)]);
        assert_eq!(counts.get(letter('C')), 7);
        assert_eq!(counts.groups(), vec![letter('C')]);
    }

    #[test]
    fn all_is_not_counted_twice() {
        let counts = GroupCounts::from_raw(vec![(Some("a"), 1), (Some("b"), 2), (None, 2)])
            .with_all();

        assert_eq!(counts.get(Group::All), 5);
        assert_eq!(counts.total(), 5);
        assert_eq!(
            counts.groups(),
            vec![letter('A'), letter('B'), Group::Blank, Group::All]
        );
    }

    #[test]
    fn unbucketed_initials_count_toward_total_only() {
        let counts = GroupCounts::from_raw(vec![(Some("1"), 4), (Some("z"), 1)]);
        assert_eq!(counts.unbucketed(), 4);
        assert_eq!(counts.total(), 5);
        assert_eq!(counts.groups(), vec![letter('Z')]);
    }

    #[test]
    fn zero_counts_do_not_populate() {
        let counts = GroupCounts::from_raw(vec![(Some("d"), 0)]);
        assert!(!counts.contains(letter('D')));
        assert!(counts.is_empty());
    }

    #[test]
    fn empty_table_with_all_keeps_zero_all() {
        let counts = GroupCounts::from_raw(Vec::<(Option<&str>, u64)>::new()).with_all();
        assert!(counts.contains(Group::All));
        assert_eq!(counts.get(Group::All), 0);
    }
}
