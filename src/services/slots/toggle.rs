//! Single-slot toggling.

use chrono::NaiveDate;

use crate::models::time_slot::{Granularity, SlotsByDate, TimeSlot};

/// What a click on an empty tick means relative to its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleIntent {
    /// An enabled slot sits one step before or after the clicked tick
    Extend,
    /// No enabled neighbour
    Isolated,
}

/// Classify a click on an empty tick by looking one granularity step to
/// either side for an enabled slot on the same date.
pub fn slot_toggle_intent(
    slots: &SlotsByDate,
    date: NaiveDate,
    minutes: u32,
    granularity: Granularity,
) -> ToggleIntent {
    let step = granularity.minutes();
    let adjacent_before = minutes
        .checked_sub(step)
        .is_some_and(|before| slots.is_enabled_at(date, before));
    let adjacent_after = slots.is_enabled_at(date, minutes + step);

    if adjacent_before || adjacent_after {
        ToggleIntent::Extend
    } else {
        ToggleIntent::Isolated
    }
}

/// Toggle the slot at `(hour, minute)` on `date`, returning the new state.
///
/// An existing slot has its `enabled` flag flipped. A missing slot is created
/// enabled with `duration = granularity`; extending a neighbour and creating
/// an isolated slot currently produce the same record.
pub fn toggle_slot(
    slots: &SlotsByDate,
    date: NaiveDate,
    hour: u8,
    minute: u8,
    granularity: Granularity,
) -> SlotsByDate {
    let mut next = slots.clone();

    if let Some(existing) = next.find_mut(date, hour, minute) {
        existing.enabled = !existing.enabled;
        log::debug!(
            "Toggled {} {:02}:{:02} -> {}",
            date,
            hour,
            minute,
            if existing.enabled { "enabled" } else { "disabled" }
        );
        return next;
    }

    let clicked_minutes = hour as u32 * 60 + minute as u32;
    let intent = slot_toggle_intent(slots, date, clicked_minutes, granularity);
    log::debug!(
        "Creating slot {} {:02}:{:02} ({:?})",
        date,
        hour,
        minute,
        intent
    );

    let slot = match intent {
        ToggleIntent::Extend | ToggleIntent::Isolated => {
            TimeSlot::new(hour, minute).with_duration(granularity.minutes())
        }
    };
    next.upsert(date, slot);
    next
}
