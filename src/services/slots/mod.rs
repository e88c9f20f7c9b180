// Slot services
// Toggling, block merging, granularity handling and suggestion import

pub mod blocks;
pub mod granularity;
pub mod import;
pub mod toggle;

pub use blocks::{block_at_tick, block_covered_until, block_tick_role, merge_blocks, TickRole};
pub use granularity::{
    calculate_optimal_granularity, calculate_range_granularity, is_compatible,
    is_compatible_with_all, GranularityError, GranularityOption, GranularityState,
};
pub use import::{import_external_slots, import_into};
pub use toggle::{slot_toggle_intent, toggle_slot, ToggleIntent};
