//! Time slot model.
//!
//! A poll date carries a set of time slots laid out on a lattice whose step
//! is the active [`Granularity`]. Each date's slots are kept sorted by
//! minute-of-day and never contain two slots at the same `(hour, minute)`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Minutes in a day; the exclusive upper bound of any tick.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Minute step of the slot lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Granularity {
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    TwoHours,
    FourHours,
}

impl Granularity {
    /// Every supported granularity, finest first.
    pub const ALL: [Granularity; 5] = [
        Granularity::FifteenMinutes,
        Granularity::ThirtyMinutes,
        Granularity::OneHour,
        Granularity::TwoHours,
        Granularity::FourHours,
    ];

    /// Lift a raw minute count. Anything outside {15, 30, 60, 120, 240} is `None`.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        match minutes {
            15 => Some(Self::FifteenMinutes),
            30 => Some(Self::ThirtyMinutes),
            60 => Some(Self::OneHour),
            120 => Some(Self::TwoHours),
            240 => Some(Self::FourHours),
            _ => None,
        }
    }

    pub fn minutes(self) -> u32 {
        match self {
            Self::FifteenMinutes => 15,
            Self::ThirtyMinutes => 30,
            Self::OneHour => 60,
            Self::TwoHours => 120,
            Self::FourHours => 240,
        }
    }

    /// Tick offsets (minutes since midnight) of one full day.
    pub fn ticks(self) -> impl Iterator<Item = u32> {
        (0..MINUTES_PER_DAY).step_by(self.minutes() as usize)
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Self::ThirtyMinutes
    }
}

impl TryFrom<u32> for Granularity {
    type Error = String;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        Self::from_minutes(minutes)
            .ok_or_else(|| format!("Unsupported granularity: {} minutes", minutes))
    }
}

impl From<Granularity> for u32 {
    fn from(granularity: Granularity) -> Self {
        granularity.minutes()
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FifteenMinutes => write!(f, "15 min"),
            Self::ThirtyMinutes => write!(f, "30 min"),
            Self::OneHour => write!(f, "1 hour"),
            Self::TwoHours => write!(f, "2 hours"),
            Self::FourHours => write!(f, "4 hours"),
        }
    }
}

/// One selectable tick of a poll date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub hour: u8,
    pub minute: u8,
    pub enabled: bool,
    /// Length in minutes; imported trailing ticks may be shorter than the lattice step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl TimeSlot {
    /// An enabled slot with no explicit duration.
    pub fn new(hour: u8, minute: u8) -> Self {
        Self {
            hour,
            minute,
            enabled: true,
            duration: None,
        }
    }

    /// An enabled slot starting `minutes` after midnight.
    pub fn at_minutes(minutes: u32, duration: Option<u32>) -> Self {
        Self {
            hour: (minutes / 60) as u8,
            minute: (minutes % 60) as u8,
            enabled: true,
            duration,
        }
    }

    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Offset of the slot start from midnight.
    pub fn minutes_of_day(&self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }
}

/// Per-date slot sets for one editing session.
///
/// Serializes as a JSON object keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<NaiveDate, Vec<TimeSlot>>",
    into = "BTreeMap<NaiveDate, Vec<TimeSlot>>"
)]
pub struct SlotsByDate {
    dates: BTreeMap<NaiveDate, Vec<TimeSlot>>,
}

impl SlotsByDate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slots of one date, sorted by minute-of-day.
    pub fn slots_for(&self, date: NaiveDate) -> &[TimeSlot] {
        self.dates.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find(&self, date: NaiveDate, hour: u8, minute: u8) -> Option<&TimeSlot> {
        self.find_at_minutes(date, hour as u32 * 60 + minute as u32)
    }

    pub fn find_at_minutes(&self, date: NaiveDate, minutes: u32) -> Option<&TimeSlot> {
        let slots = self.dates.get(&date)?;
        slots
            .binary_search_by_key(&minutes, TimeSlot::minutes_of_day)
            .ok()
            .map(|index| &slots[index])
    }

    pub fn find_mut(&mut self, date: NaiveDate, hour: u8, minute: u8) -> Option<&mut TimeSlot> {
        let minutes = hour as u32 * 60 + minute as u32;
        let slots = self.dates.get_mut(&date)?;
        let index = slots
            .binary_search_by_key(&minutes, TimeSlot::minutes_of_day)
            .ok()?;
        slots.get_mut(index)
    }

    /// Whether an enabled slot starts at `minutes` on `date`.
    pub fn is_enabled_at(&self, date: NaiveDate, minutes: u32) -> bool {
        self.find_at_minutes(date, minutes)
            .map(|slot| slot.enabled)
            .unwrap_or(false)
    }

    /// Insert a slot, replacing any slot already at the same `(hour, minute)`.
    pub fn upsert(&mut self, date: NaiveDate, slot: TimeSlot) {
        let slots = self.dates.entry(date).or_default();
        match slots.binary_search_by_key(&slot.minutes_of_day(), TimeSlot::minutes_of_day) {
            Ok(index) => slots[index] = slot,
            Err(index) => slots.insert(index, slot),
        }
    }

    /// Keep only the dates for which `keep` returns true.
    pub fn retain_dates(&mut self, mut keep: impl FnMut(NaiveDate) -> bool) {
        self.dates.retain(|date, _| keep(*date));
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[TimeSlot])> + '_ {
        self.dates
            .iter()
            .map(|(date, slots)| (*date, slots.as_slice()))
    }

    /// Every slot of every date.
    pub fn all_slots(&self) -> impl Iterator<Item = &TimeSlot> + '_ {
        self.dates.values().flatten()
    }

    pub fn slot_count(&self) -> usize {
        self.dates.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.values().all(Vec::is_empty)
    }
}

impl From<BTreeMap<NaiveDate, Vec<TimeSlot>>> for SlotsByDate {
    fn from(raw: BTreeMap<NaiveDate, Vec<TimeSlot>>) -> Self {
        let mut slots = SlotsByDate::new();
        for (date, date_slots) in raw {
            slots.dates.entry(date).or_default();
            for slot in date_slots {
                slots.upsert(date, slot);
            }
        }
        slots
    }
}

impl From<SlotsByDate> for BTreeMap<NaiveDate, Vec<TimeSlot>> {
    fn from(slots: SlotsByDate) -> Self {
        slots.dates
    }
}

/// End of a rendered block: the last enabled slot of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEnd {
    pub hour: u8,
    pub minute: u8,
    pub enabled: bool,
}

impl BlockEnd {
    pub fn minutes_of_day(&self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }
}

impl From<TimeSlot> for BlockEnd {
    fn from(slot: TimeSlot) -> Self {
        Self {
            hour: slot.hour,
            minute: slot.minute,
            enabled: slot.enabled,
        }
    }
}

/// A maximal run of enabled slots on one date, used for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub start: TimeSlot,
    pub end: BlockEnd,
}

impl Block {
    /// A block covering a single slot.
    pub fn single(slot: TimeSlot) -> Self {
        Self {
            start: slot,
            end: slot.into(),
        }
    }

    pub fn start_minutes(&self) -> u32 {
        self.start.minutes_of_day()
    }

    pub fn end_minutes(&self) -> u32 {
        self.end.minutes_of_day()
    }
}
