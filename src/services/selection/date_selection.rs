//! Date cells as drag-selectable items.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::drag::{DragCommit, SelectionSource};
use crate::utils::date::date_key;

/// Whether a batch of dates is being added to or removed from the poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchAction {
    Select,
    Deselect,
}

impl BatchAction {
    /// A drag that starts on an unselected date selects; otherwise it deselects.
    pub fn for_commit(commit: &DragCommit<NaiveDate>) -> Self {
        if commit.anchor_was_selected {
            Self::Deselect
        } else {
            Self::Select
        }
    }
}

/// View of the selected dates used by the date-cell drag controller.
#[derive(Debug, Clone, Copy)]
pub struct DateSelectionSource<'a> {
    selected: &'a BTreeSet<NaiveDate>,
    today: NaiveDate,
}

impl<'a> DateSelectionSource<'a> {
    pub fn new(selected: &'a BTreeSet<NaiveDate>, today: NaiveDate) -> Self {
        Self { selected, today }
    }

    /// Past dates cannot be picked.
    pub fn is_disabled(&self, date: NaiveDate) -> bool {
        date < self.today
    }
}

impl SelectionSource for DateSelectionSource<'_> {
    type Item = NaiveDate;

    fn identify(&self, item: &NaiveDate) -> String {
        date_key(*item)
    }

    /// Every enabled date from the earlier to the later of the two, across
    /// month boundaries.
    fn range_between(&self, anchor: &NaiveDate, current: &NaiveDate) -> Vec<NaiveDate> {
        let (from, to) = if anchor <= current {
            (*anchor, *current)
        } else {
            (*current, *anchor)
        };
        from.iter_days()
            .take_while(|date| *date <= to)
            .filter(|date| !self.is_disabled(*date))
            .collect()
    }

    fn is_selected(&self, item: &NaiveDate) -> bool {
        self.selected.contains(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_range_is_order_independent_and_inclusive() {
        let selected = BTreeSet::new();
        let source = DateSelectionSource::new(&selected, ymd(2024, 1, 1));

        let forward = source.range_between(&ymd(2024, 1, 30), &ymd(2024, 2, 2));
        let backward = source.range_between(&ymd(2024, 2, 2), &ymd(2024, 1, 30));

        assert_eq!(forward, backward);
        assert_eq!(
            forward,
            vec![ymd(2024, 1, 30), ymd(2024, 1, 31), ymd(2024, 2, 1), ymd(2024, 2, 2)]
        );
    }

    #[test]
    fn test_range_skips_past_dates() {
        let selected = BTreeSet::new();
        let source = DateSelectionSource::new(&selected, ymd(2024, 1, 10));

        let range = source.range_between(&ymd(2024, 1, 8), &ymd(2024, 1, 11));
        assert_eq!(range, vec![ymd(2024, 1, 10), ymd(2024, 1, 11)]);
    }

    #[test]
    fn test_identify_uses_date_key() {
        let selected = BTreeSet::from([ymd(2024, 1, 15)]);
        let source = DateSelectionSource::new(&selected, ymd(2024, 1, 1));

        assert_eq!(source.identify(&ymd(2024, 1, 5)), "2024-01-05");
        assert!(source.is_selected(&ymd(2024, 1, 15)));
        assert!(!source.is_selected(&ymd(2024, 1, 16)));
    }

    #[test]
    fn test_batch_action_follows_anchor() {
        let commit = DragCommit {
            anchor: ymd(2024, 1, 15),
            selection: vec![ymd(2024, 1, 15)],
            anchor_was_selected: true,
        };
        assert_eq!(BatchAction::for_commit(&commit), BatchAction::Deselect);
    }
}
