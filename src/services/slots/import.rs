//! Expansion of externally suggested time ranges into the slot lattice.

use chrono::NaiveDate;

use crate::models::external_slot::ExternalSlot;
use crate::models::time_slot::{Granularity, SlotsByDate, TimeSlot};
use crate::utils::date::parse_date_key;

/// Expand `external` into a fresh slot map. See [`import_into`].
pub fn import_external_slots(
    external: &[ExternalSlot],
    default_dates: &[NaiveDate],
    granularity: Granularity,
) -> SlotsByDate {
    let mut slots = SlotsByDate::new();
    import_into(&mut slots, external, default_dates, granularity);
    slots
}

/// Expand suggested ranges into `slots`, one enabled tick per step of the
/// half-open range `[start, end)`.
///
/// A trailing tick that does not fill a whole step keeps a shortened
/// duration. No tick is emitted at `end`. Ranges without dates apply to
/// `default_dates`. Existing slots on a date are kept; a tick at the same
/// time replaces the existing slot. Malformed dates are dropped and
/// malformed times skip their range. Returns the number of ticks written.
pub fn import_into(
    slots: &mut SlotsByDate,
    external: &[ExternalSlot],
    default_dates: &[NaiveDate],
    granularity: Granularity,
) -> usize {
    let step = granularity.minutes();
    let mut written = 0;

    for range in external {
        let Some((start, end)) = range.minute_range() else {
            log::warn!(
                "Skipping suggested range with malformed times: {} - {}",
                range.start,
                range.end
            );
            continue;
        };

        let dates: Vec<NaiveDate> = match range.dates {
            Some(ref keys) => keys
                .iter()
                .filter_map(|key| {
                    let parsed = parse_date_key(key);
                    if parsed.is_none() {
                        log::debug!("Dropping unparseable suggested date {:?}", key);
                    }
                    parsed
                })
                .collect(),
            None => default_dates.to_vec(),
        };

        for date in dates {
            for tick in (start..end).step_by(step as usize) {
                let duration = step.min(end - tick);
                slots.upsert(date, TimeSlot::at_minutes(tick, Some(duration)));
                written += 1;
            }
        }
    }

    log::debug!(
        "Imported {} tick(s) from {} suggested range(s) at {}",
        written,
        external.len(),
        granularity
    );
    written
}
