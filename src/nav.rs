//! Navigation bar model built from a resolved paginator.
//!
//! The model says which slots to show, which of them link somewhere and
//! which one is current; turning it into markup is left to the caller.

use crate::config::{AlphabarConfig, DEFAULT_GROUP_PARAM};
use crate::group::{Group, Letter};
use crate::paginator::PaginatorView;

/// Options for building a navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavOptions {
    /// Query parameter that carries the selected group.
    pub group_param: String,
}

impl Default for NavOptions {
    fn default() -> Self {
        Self {
            group_param: DEFAULT_GROUP_PARAM.to_string(),
        }
    }
}

impl From<&AlphabarConfig> for NavOptions {
    fn from(config: &AlphabarConfig) -> Self {
        Self {
            group_param: config.group_param.clone(),
        }
    }
}

/// One slot of the bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavSlot {
    pub group: Group,
    pub count: u64,
    /// The slot of the effective group.
    pub current: bool,
}

impl NavSlot {
    /// Slots without records are shown as plain labels.
    pub fn is_linked(&self) -> bool {
        self.count > 0
    }

    pub fn label(&self) -> String {
        self.group.to_string()
    }
}

/// A navigation bar ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub group_param: String,
    pub slots: Vec<NavSlot>,
}

impl Navigation {
    /// Query pair selecting the slot's group, `None` for unlinked slots.
    pub fn query_for(&self, slot: &NavSlot) -> Option<(String, String)> {
        slot.is_linked().then(|| (self.group_param.clone(), slot.label()))
    }

    /// The slot marked current, if it is shown.
    pub fn current(&self) -> Option<&NavSlot> {
        self.slots.iter().find(|slot| slot.current)
    }
}

/// Builds the navigation bar for a resolved paginator.
///
/// Every letter A–Z gets a slot; `Blank` and `All` get one only when they
/// hold records. Returns `None` when the bar would be pointless: the total
/// is below the paginator's minimum, or at most one group is populated.
pub fn navigation<V>(view: &V, options: &NavOptions) -> Option<Navigation>
where
    V: PaginatorView + ?Sized,
{
    if view
        .min_records()
        .map_or(false, |min| view.total_count() < min)
    {
        return None;
    }
    if view.populated_groups().len() <= 1 {
        return None;
    }

    let current = view.effective_group();
    let slots = Letter::all()
        .map(Group::Letter)
        .chain([Group::Blank, Group::All])
        .filter(|group| matches!(group, Group::Letter(_)) || view.count_of(*group) > 0)
        .map(|group| NavSlot {
            group,
            count: view.count_of(group),
            current: current == Some(group),
        })
        .collect();

    Some(Navigation {
        group_param: options.group_param.clone(),
        slots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paginator::BucketPaginator;
    use crate::source::MemorySource;

    fn resolved(
        values: &[Option<&str>],
        configure: impl FnOnce(&mut BucketPaginator),
    ) -> BucketPaginator {
        let source = MemorySource::from_values("name", values.iter().copied());
        let mut paginator = BucketPaginator::new();
        paginator.set_field("name");
        configure(&mut paginator);
        paginator.resolve(&source).unwrap();
        paginator
    }

    fn letter(c: char) -> Group {
        Group::Letter(Letter::new(c).unwrap())
    }

    #[test]
    fn marks_current_and_links_populated_letters() {
        let paginator = resolved(&[Some("apple"), Some("cherry"), None], |p| {
            p.set_group(Some("C"));
        });

        let nav = navigation(&paginator, &NavOptions::default()).unwrap();

        assert_eq!(nav.slots.len(), 27);
        assert_eq!(nav.slots[26].group, Group::Blank);
        assert_eq!(nav.current().map(|slot| slot.group), Some(letter('C')));

        let b = &nav.slots[1];
        assert!(!b.is_linked());
        assert_eq!(nav.query_for(b), None);

        let c = &nav.slots[2];
        assert_eq!(nav.query_for(c), Some(("ltr".to_string(), "C".to_string())));
    }

    #[test]
    fn all_slot_follows_its_count() {
        let paginator = resolved(&[Some("apple"), Some("banana")], |p| {
            p.set_all_option(true).set_group(Some("All"));
        });

        let options = NavOptions::from(&AlphabarConfig::new().with_group_param("letter"));
        let nav = navigation(&paginator, &options).unwrap();

        let last = nav.slots.last().unwrap();
        assert_eq!(last.group, Group::All);
        assert_eq!(last.count, 2);
        assert!(last.current);
        assert_eq!(
            nav.query_for(last),
            Some(("letter".to_string(), "All".to_string()))
        );
        assert!(nav.slots.iter().all(|slot| slot.group != Group::Blank));
    }

    #[test]
    fn hidden_below_minimum() {
        let paginator = resolved(&[Some("apple"), Some("banana")], |p| {
            p.set_min_records(Some(3));
        });
        assert_eq!(navigation(&paginator, &NavOptions::default()), None);
    }

    #[test]
    fn hidden_with_single_group() {
        let paginator = resolved(&[Some("apple"), Some("avocado")], |_| {});
        assert_eq!(navigation(&paginator, &NavOptions::default()), None);

        let empty = resolved(&[], |_| {});
        assert_eq!(navigation(&empty, &NavOptions::default()), None);
    }

    #[test]
    fn single_letter_with_all_still_renders() {
        let paginator = resolved(&[Some("apple")], |p| {
            p.set_all_option(true);
        });
        let nav = navigation(&paginator, &NavOptions::default()).unwrap();
        assert_eq!(nav.slots.len(), 27);
        assert_eq!(nav.current().map(|slot| slot.group), Some(letter('A')));
    }
}
