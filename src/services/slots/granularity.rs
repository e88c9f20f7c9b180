//! Granularity compatibility, single-level undo and optimal-granularity inference.

use thiserror::Error;

use crate::models::external_slot::ExternalSlot;
use crate::models::time_slot::{Granularity, SlotsByDate, TimeSlot};

/// Smallest granularity the resolver will report.
pub const MIN_RESOLVED_GRANULARITY: u32 = 15;
/// Largest granularity the resolver will report, and the seed of its GCD fold.
pub const MAX_RESOLVED_GRANULARITY: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GranularityError {
    #[error("{minutes} minutes is not a supported granularity")]
    Unsupported { minutes: u32 },
    #[error("{granularity} cannot represent {conflicts} existing slot(s) without loss")]
    Incompatible {
        granularity: Granularity,
        conflicts: usize,
    },
}

/// Whether every slot starts on a multiple of `granularity` minutes.
/// A zero granularity is never compatible.
pub fn is_compatible<'a>(granularity: u32, slots: impl IntoIterator<Item = &'a TimeSlot>) -> bool {
    granularity != 0
        && slots
            .into_iter()
            .all(|slot| slot.minute as u32 % granularity == 0)
}

/// Whether `granularity` can represent every slot of every date.
pub fn is_compatible_with_all(granularity: u32, slots: &SlotsByDate) -> bool {
    is_compatible(granularity, slots.all_slots())
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Infer the coarsest granularity that fits imported slots.
///
/// Folds `gcd` over 60 and every slot's minute and clamps the result into
/// `[15, 60]`. No slots, or only on-the-hour slots, yields 60. Minutes whose
/// GCD with 60 is below 15 clamp to 15, which cannot represent them.
pub fn calculate_optimal_granularity(slots: &SlotsByDate) -> u32 {
    slots
        .all_slots()
        .fold(MAX_RESOLVED_GRANULARITY, |acc, slot| gcd(acc, slot.minute as u32))
        .clamp(MIN_RESOLVED_GRANULARITY, MAX_RESOLVED_GRANULARITY)
}

/// Infer the lattice suggested ranges should be expanded on.
///
/// Same fold and clamp as [`calculate_optimal_granularity`], taken over the
/// minute part of every range's start and end. Malformed ranges are ignored.
pub fn calculate_range_granularity(ranges: &[ExternalSlot]) -> u32 {
    ranges
        .iter()
        .filter_map(ExternalSlot::minute_range)
        .flat_map(|(start, end)| [start % 60, end % 60])
        .fold(MAX_RESOLVED_GRANULARITY, gcd)
        .clamp(MIN_RESOLVED_GRANULARITY, MAX_RESOLVED_GRANULARITY)
}

/// A granularity choice and whether picking it would lose slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GranularityOption {
    pub granularity: Granularity,
    pub selectable: bool,
}

/// Active granularity plus the one value it can be rolled back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GranularityState {
    current: Granularity,
    previous: Option<Granularity>,
}

impl GranularityState {
    pub fn new(current: Granularity) -> Self {
        Self {
            current,
            previous: None,
        }
    }

    pub fn current(&self) -> Granularity {
        self.current
    }

    /// The value `undo` would restore, if any.
    pub fn previous(&self) -> Option<Granularity> {
        self.previous
    }

    /// Every supported granularity with its compatibility against `slots`.
    pub fn options(&self, slots: &SlotsByDate) -> Vec<GranularityOption> {
        Granularity::ALL
            .iter()
            .map(|&granularity| GranularityOption {
                granularity,
                selectable: is_compatible_with_all(granularity.minutes(), slots),
            })
            .collect()
    }

    /// Switch to `granularity` if it can represent every existing slot.
    ///
    /// The replaced value becomes the undo target. Choosing the current value
    /// changes nothing.
    pub fn change_to(
        &mut self,
        granularity: Granularity,
        slots: &SlotsByDate,
    ) -> Result<(), GranularityError> {
        if granularity == self.current {
            return Ok(());
        }

        let conflicts = slots
            .all_slots()
            .filter(|slot| slot.minute as u32 % granularity.minutes() != 0)
            .count();
        if conflicts > 0 {
            return Err(GranularityError::Incompatible {
                granularity,
                conflicts,
            });
        }

        log::debug!("Granularity {} -> {}", self.current, granularity);
        self.previous = Some(self.current);
        self.current = granularity;
        Ok(())
    }

    /// Like [`change_to`](Self::change_to) for a raw minute count.
    pub fn change_to_minutes(
        &mut self,
        minutes: u32,
        slots: &SlotsByDate,
    ) -> Result<(), GranularityError> {
        let granularity =
            Granularity::from_minutes(minutes).ok_or(GranularityError::Unsupported { minutes })?;
        self.change_to(granularity, slots)
    }

    /// Replace the granularity without recording an undo step.
    pub fn reset(&mut self, granularity: Granularity) {
        self.current = granularity;
        self.previous = None;
    }

    /// Restore the previous granularity. Works once per change.
    pub fn undo(&mut self) -> Option<Granularity> {
        let previous = self.previous.take()?;
        log::debug!("Undo granularity {} -> {}", self.current, previous);
        self.current = previous;
        Some(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use test_case::test_case;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn slots_with_minutes(minutes: &[u8]) -> SlotsByDate {
        let mut slots = SlotsByDate::new();
        for (hour, &minute) in minutes.iter().enumerate() {
            slots.upsert(date(15), TimeSlot::new(hour as u8, minute));
        }
        slots
    }

    #[test_case(&[], 60; "no slots")]
    #[test_case(&[0, 0, 0], 60; "on the hour")]
    #[test_case(&[0, 30], 30; "half hours")]
    #[test_case(&[0, 15, 30, 45], 15; "quarter hours")]
    #[test_case(&[0, 45], 15; "three quarters")]
    #[test_case(&[20, 40], 20; "twenty minute lattice")]
    #[test_case(&[10], 15; "finer than supported clamps")]
    fn test_optimal_granularity(minutes: &[u8], expected: u32) {
        assert_eq!(calculate_optimal_granularity(&slots_with_minutes(minutes)), expected);
    }

    #[test_case(&[], 60; "no ranges")]
    #[test_case(&[("09:00", "12:00")], 60; "whole hours")]
    #[test_case(&[("09:00", "10:30")], 30; "half hour end")]
    #[test_case(&[("09:00", "10:00"), ("13:45", "14:00")], 15; "quarter hour start")]
    #[test_case(&[("09:10", "10:00")], 15; "finer than supported clamps")]
    #[test_case(&[("9am", "10:15")], 60; "malformed range ignored")]
    fn test_range_granularity(ranges: &[(&str, &str)], expected: u32) {
        let ranges: Vec<ExternalSlot> = ranges
            .iter()
            .map(|(start, end)| ExternalSlot::new(*start, *end))
            .collect();
        assert_eq!(calculate_range_granularity(&ranges), expected);
    }

    #[test]
    fn test_optimal_spans_dates() {
        let mut slots = slots_with_minutes(&[0]);
        slots.upsert(date(16), TimeSlot::new(9, 30));
        assert_eq!(calculate_optimal_granularity(&slots), 30);
    }

    #[test]
    fn test_is_compatible() {
        let slots = slots_with_minutes(&[0, 30]);
        assert!(is_compatible_with_all(30, &slots));
        assert!(is_compatible_with_all(15, &slots));
        assert!(!is_compatible_with_all(60, &slots));
        assert!(!is_compatible_with_all(0, &slots));
        assert!(is_compatible_with_all(60, &SlotsByDate::new()));
    }

    #[test]
    fn test_options_flag_lossy_choices() {
        let state = GranularityState::new(Granularity::ThirtyMinutes);
        let options = state.options(&slots_with_minutes(&[0, 30]));

        let selectable: Vec<u32> = options
            .iter()
            .filter(|option| option.selectable)
            .map(|option| option.granularity.minutes())
            .collect();
        assert_eq!(selectable, vec![15, 30]);
        assert_eq!(options.len(), 5);
    }

    #[test]
    fn test_change_rejects_incompatible() {
        let mut state = GranularityState::new(Granularity::FifteenMinutes);
        let err = state
            .change_to(Granularity::OneHour, &slots_with_minutes(&[0, 15, 45]))
            .unwrap_err();

        assert_eq!(
            err,
            GranularityError::Incompatible {
                granularity: Granularity::OneHour,
                conflicts: 2,
            }
        );
        assert_eq!(state.current(), Granularity::FifteenMinutes);
        assert!(state.previous().is_none());
    }

    #[test]
    fn test_change_to_unsupported_minutes() {
        let mut state = GranularityState::new(Granularity::OneHour);
        assert_eq!(
            state.change_to_minutes(45, &SlotsByDate::new()),
            Err(GranularityError::Unsupported { minutes: 45 })
        );
        assert_eq!(state.current(), Granularity::OneHour);
    }

    #[test]
    fn test_undo_is_single_level() {
        let slots = SlotsByDate::new();
        let mut state = GranularityState::new(Granularity::ThirtyMinutes);
        state.change_to(Granularity::OneHour, &slots).unwrap();
        state.change_to(Granularity::TwoHours, &slots).unwrap();

        assert_eq!(state.undo(), Some(Granularity::OneHour));
        assert_eq!(state.current(), Granularity::OneHour);
        assert_eq!(state.undo(), None);
        assert_eq!(state.current(), Granularity::OneHour);
    }

    #[test]
    fn test_same_value_keeps_undo_target() {
        let slots = SlotsByDate::new();
        let mut state = GranularityState::new(Granularity::ThirtyMinutes);
        state.change_to(Granularity::OneHour, &slots).unwrap();
        state.change_to(Granularity::OneHour, &slots).unwrap();

        assert_eq!(state.previous(), Some(Granularity::ThirtyMinutes));
    }
}
