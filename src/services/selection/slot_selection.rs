//! Time-slot cells as drag-selectable items.

use chrono::NaiveDate;

use super::drag::SelectionSource;
use crate::models::time_slot::{Granularity, SlotsByDate};
use crate::utils::date::{date_key, format_minutes};

/// One rendered tick of one date's time column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotCell {
    pub date: NaiveDate,
    /// Minutes since midnight
    pub minutes: u32,
}

impl SlotCell {
    pub fn new(date: NaiveDate, hour: u8, minute: u8) -> Self {
        Self {
            date,
            minutes: hour as u32 * 60 + minute as u32,
        }
    }

    pub fn hour(&self) -> u8 {
        (self.minutes / 60) as u8
    }

    pub fn minute(&self) -> u8 {
        (self.minutes % 60) as u8
    }
}

/// View of the slot map used by the time-slot drag controller.
#[derive(Debug, Clone, Copy)]
pub struct SlotSelectionSource<'a> {
    slots: &'a SlotsByDate,
    granularity: Granularity,
}

impl<'a> SlotSelectionSource<'a> {
    pub fn new(slots: &'a SlotsByDate, granularity: Granularity) -> Self {
        Self { slots, granularity }
    }
}

impl SelectionSource for SlotSelectionSource<'_> {
    type Item = SlotCell;

    fn identify(&self, item: &SlotCell) -> String {
        format!("{}@{}", date_key(item.date), format_minutes(item.minutes))
    }

    /// Ticks between the two cells on the same date, both ends included.
    /// Ranges never span dates: a drag onto another date selects only the anchor.
    fn range_between(&self, anchor: &SlotCell, current: &SlotCell) -> Vec<SlotCell> {
        if anchor.date != current.date {
            return vec![*anchor];
        }
        let from = anchor.minutes.min(current.minutes);
        let to = anchor.minutes.max(current.minutes);
        (from..=to)
            .step_by(self.granularity.minutes() as usize)
            .map(|minutes| SlotCell {
                date: anchor.date,
                minutes,
            })
            .collect()
    }

    fn is_selected(&self, item: &SlotCell) -> bool {
        self.slots.is_enabled_at(item.date, item.minutes)
    }
}
