//! Display blocks: maximal runs of enabled slots on one date.
//!
//! Blocks are recomputed on every render and never stored.

use crate::models::settings::MergeStrategy;
use crate::models::time_slot::{Block, Granularity, TimeSlot};

/// Merge a date's slots into display blocks.
///
/// `slots` must be sorted by minute-of-day, as [`SlotsByDate`] keeps them.
/// A disabled slot closes the running block. With
/// [`MergeStrategy::SequenceOrder`] two enabled slots merge whenever no
/// disabled slot lies between them, even across a gap wider than one
/// granularity step. [`MergeStrategy::GapChecked`] also closes the block on
/// such a gap.
///
/// [`SlotsByDate`]: crate::models::time_slot::SlotsByDate
pub fn merge_blocks(
    slots: &[TimeSlot],
    granularity: Granularity,
    strategy: MergeStrategy,
) -> Vec<Block> {
    let step = granularity.minutes();
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;

    for slot in slots {
        if !slot.enabled {
            blocks.extend(current.take());
            continue;
        }

        let extends = current.as_ref().is_some_and(|block| match strategy {
            MergeStrategy::SequenceOrder => true,
            MergeStrategy::GapChecked => slot.minutes_of_day() == block.end_minutes() + step,
        });

        match current.as_mut() {
            Some(block) if extends => block.end = (*slot).into(),
            _ => blocks.extend(current.replace(Block::single(*slot))),
        }
    }

    blocks.extend(current);
    blocks
}

/// Minute at which `block` stops covering time: its last slot's start plus
/// that slot's duration, or one granularity step when it has none.
pub fn block_covered_until(block: &Block, slots: &[TimeSlot], granularity: Granularity) -> u32 {
    let end = block.end_minutes();
    let duration = slots
        .iter()
        .find(|slot| slot.minutes_of_day() == end)
        .and_then(|slot| slot.duration)
        .unwrap_or_else(|| granularity.minutes());
    end + duration
}

/// Where a rendered tick sits inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickRole {
    pub is_start: bool,
    pub is_end: bool,
    pub is_middle: bool,
}

impl TickRole {
    pub fn is_inside(&self) -> bool {
        self.is_start || self.is_end || self.is_middle
    }
}

/// Classify `tick` (minutes since midnight) against `block`.
///
/// The start matches exactly. The end matches exactly, or at the last tick
/// strictly before it when the block end does not fall on a rendered tick.
pub fn block_tick_role(block: &Block, tick: u32, granularity: Granularity) -> TickRole {
    let start = block.start_minutes();
    let end = block.end_minutes();
    let step = granularity.minutes();

    let is_start = tick == start;
    let is_end = tick >= start && (tick == end || (tick < end && tick + step > end));
    let is_middle = tick > start && tick < end && !is_end;

    TickRole {
        is_start,
        is_end,
        is_middle,
    }
}

/// The block containing `tick`, if any, with the tick's role in it.
pub fn block_at_tick(
    blocks: &[Block],
    tick: u32,
    granularity: Granularity,
) -> Option<(&Block, TickRole)> {
    blocks.iter().find_map(|block| {
        let role = block_tick_role(block, tick, granularity);
        role.is_inside().then_some((block, role))
    })
}
