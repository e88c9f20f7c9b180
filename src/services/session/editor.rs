//! One poll-creation editing session.
//!
//! Owns the selected dates, the per-date slots, the active granularity and
//! the visible month window. Every mutation goes through the pure services
//! and raises the matching [`CalendarEvents`] callback.

use std::collections::BTreeSet;
use std::time::Instant;

use anyhow::Result;
use chrono::NaiveDate;

use super::events::CalendarEvents;
use crate::models::calendar_day::{CalendarDay, DateCellState};
use crate::models::draft::PollDraft;
use crate::models::external_slot::{ExternalSlot, Suggestions};
use crate::models::settings::EditorSettings;
use crate::models::time_slot::{Block, Granularity, SlotsByDate};
use crate::services::calendar::{
    date_cell_state, CalendarNavigator, MonthDirection, MonthGridCache, ScrollMetrics,
};
use crate::services::persistence::{AutosaveScheduler, PollStore};
use crate::services::selection::{
    BatchAction, DateSelectionSource, DragCommit, SlotCell, SlotSelectionSource,
};
use crate::services::slots::{
    block_at_tick, calculate_optimal_granularity, calculate_range_granularity, import_into,
    is_compatible_with_all, merge_blocks, toggle_slot, GranularityError, GranularityOption,
    GranularityState, TickRole,
};
use crate::utils::clock::Clock;
use crate::utils::date::parse_date_key;

/// Render data for one tick of a date's time column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickView {
    pub cell: SlotCell,
    pub enabled: bool,
    pub role: TickRole,
}

pub struct PollEditor<C: Clock, E: CalendarEvents = ()> {
    settings: EditorSettings,
    clock: C,
    events: E,
    selected_dates: BTreeSet<NaiveDate>,
    slots: SlotsByDate,
    granularity: GranularityState,
    navigator: CalendarNavigator,
    grids: MonthGridCache,
    dirty: bool,
}

impl<C: Clock, E: CalendarEvents> PollEditor<C, E> {
    /// Start an empty session showing the current month in the creation-flow
    /// navigator.
    pub fn new(settings: EditorSettings, clock: C, events: E) -> Self {
        let navigator = CalendarNavigator::creation_flow(clock.today(), 1, &settings);
        Self {
            granularity: GranularityState::new(settings.default_granularity()),
            settings,
            clock,
            events,
            selected_dates: BTreeSet::new(),
            slots: SlotsByDate::new(),
            navigator,
            grids: MonthGridCache::new(),
            dirty: false,
        }
    }

    /// Replace the month navigator, e.g. with an infinite-scroll one.
    pub fn with_navigator(mut self, navigator: CalendarNavigator) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    pub fn selected_dates(&self) -> &BTreeSet<NaiveDate> {
        &self.selected_dates
    }

    pub fn slots(&self) -> &SlotsByDate {
        &self.slots
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity.current()
    }

    pub fn navigator(&self) -> &CalendarNavigator {
        &self.navigator
    }

    pub fn visible_months(&self) -> &[NaiveDate] {
        self.navigator.months()
    }

    /// Whether anything changed since the last save or autosave queue.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // --- Dates -----------------------------------------------------------

    pub fn month_grid(&mut self, month: NaiveDate) -> &[CalendarDay] {
        self.grids.get(month)
    }

    pub fn date_cell(&self, date: NaiveDate) -> DateCellState {
        date_cell_state(date, self.today(), self.selected_dates.contains(&date))
    }

    /// Click on a date cell. Past dates are disabled and ignored.
    pub fn toggle_date(&mut self, date: NaiveDate) -> bool {
        if self.date_cell(date).disabled {
            log::debug!("Ignoring click on past date {}", date);
            return false;
        }

        if !self.selected_dates.remove(&date) {
            self.selected_dates.insert(date);
        }
        self.dirty = true;
        self.events.on_date_toggle(date);
        true
    }

    /// Select or deselect many dates at once; past dates are skipped.
    /// Returns the number of dates passed on to the callback.
    pub fn batch_toggle_dates(&mut self, dates: &[NaiveDate], action: BatchAction) -> usize {
        let today = self.today();
        let applied: Vec<NaiveDate> = dates.iter().copied().filter(|date| *date >= today).collect();
        if applied.is_empty() {
            return 0;
        }

        for date in &applied {
            match action {
                BatchAction::Select => {
                    self.selected_dates.insert(*date);
                }
                BatchAction::Deselect => {
                    self.selected_dates.remove(date);
                }
            }
        }
        self.dirty = true;
        self.events.on_batch_date_toggle(&applied, action);
        applied.len()
    }

    pub fn date_drag_source(&self) -> DateSelectionSource<'_> {
        DateSelectionSource::new(&self.selected_dates, self.today())
    }

    /// Apply a finished date drag using the anchor's pre-drag state.
    pub fn commit_date_drag(&mut self, commit: &DragCommit<NaiveDate>) -> usize {
        let items = commit.items_to_toggle(&self.date_drag_source());
        self.batch_toggle_dates(&items, BatchAction::for_commit(commit))
    }

    // --- Months ----------------------------------------------------------

    pub fn shift_month(&mut self, direction: MonthDirection) -> bool {
        if !self.navigator.shift(direction, &self.clock) {
            return false;
        }
        self.events.on_month_change(direction);
        self.events.on_months_change(self.navigator.months());
        true
    }

    pub fn extend_on_scroll(&mut self, metrics: ScrollMetrics) -> usize {
        let appended = self.navigator.extend_on_scroll(metrics, &self.clock);
        if appended > 0 {
            self.events.on_months_change(self.navigator.months());
        }
        appended
    }

    // --- Slots -----------------------------------------------------------

    pub fn toggle_slot(&mut self, date: NaiveDate, hour: u8, minute: u8) {
        self.slots = toggle_slot(&self.slots, date, hour, minute, self.granularity());
        self.dirty = true;
    }

    pub fn slot_drag_source(&self) -> SlotSelectionSource<'_> {
        SlotSelectionSource::new(&self.slots, self.granularity())
    }

    /// Apply a finished slot drag using the anchor's pre-drag state.
    pub fn commit_slot_drag(&mut self, commit: &DragCommit<SlotCell>) -> usize {
        let items = commit.items_to_toggle(&self.slot_drag_source());
        for cell in &items {
            self.toggle_slot(cell.date, cell.hour(), cell.minute());
        }
        items.len()
    }

    pub fn blocks_for(&self, date: NaiveDate) -> Vec<Block> {
        merge_blocks(
            self.slots.slots_for(date),
            self.granularity(),
            self.settings.merge_strategy,
        )
    }

    /// Every tick of `date` at the active granularity with its block role.
    pub fn ticks_for(&self, date: NaiveDate) -> Vec<TickView> {
        let granularity = self.granularity();
        let blocks = self.blocks_for(date);
        granularity
            .ticks()
            .map(|minutes| TickView {
                cell: SlotCell { date, minutes },
                enabled: self.slots.is_enabled_at(date, minutes),
                role: block_at_tick(&blocks, minutes, granularity)
                    .map(|(_, role)| role)
                    .unwrap_or_default(),
            })
            .collect()
    }

    // --- Granularity -----------------------------------------------------

    pub fn granularity_options(&self) -> Vec<GranularityOption> {
        self.granularity.options(&self.slots)
    }

    /// Switch granularity by minute count. Unsupported or lossy values leave
    /// the session unchanged.
    pub fn change_granularity(&mut self, minutes: u32) -> Result<(), GranularityError> {
        let before = self.granularity();
        if let Err(err) = self.granularity.change_to_minutes(minutes, &self.slots) {
            log::debug!("Granularity change rejected: {}", err);
            return Err(err);
        }
        if self.granularity() != before {
            self.dirty = true;
        }
        Ok(())
    }

    pub fn undo_granularity(&mut self) -> Option<Granularity> {
        let restored = self.granularity.undo()?;
        self.dirty = true;
        Some(restored)
    }

    // --- Suggestions -----------------------------------------------------

    /// Seed the session from the assistant's suggestions.
    ///
    /// Suggested dates (past ones dropped) join the selection and serve as
    /// the default dates for ranges without their own; past dates listed on
    /// a range are dropped too. Ranges are expanded on the lattice resolved
    /// from their boundaries, falling back to the import granularity when
    /// that value is unsupported. The session then adopts the optimal
    /// granularity of the slot map when it is a supported, lossless choice.
    /// When nothing lands on a future date the granularity is left alone.
    pub fn apply_suggestions(&mut self, suggestions: &Suggestions) -> Granularity {
        let today = self.today();
        let mut default_dates: Vec<NaiveDate> = suggestions
            .dates
            .iter()
            .filter_map(|key| parse_date_key(key))
            .filter(|date| *date >= today)
            .collect();
        if default_dates.is_empty() {
            default_dates = self.selected_dates.iter().copied().collect();
        }

        let ranges: Vec<ExternalSlot> = suggestions
            .slots
            .iter()
            .map(|range| ExternalSlot {
                dates: range.dates.as_ref().map(|keys| {
                    keys.iter()
                        .filter(|key| parse_date_key(key).is_some_and(|date| date >= today))
                        .cloned()
                        .collect()
                }),
                ..range.clone()
            })
            .filter(|range| match range.dates {
                Some(ref keys) => !keys.is_empty(),
                None => !default_dates.is_empty(),
            })
            .collect();
        if ranges.len() < suggestions.slots.len() {
            log::debug!(
                "Dropped {} suggested range(s) without future dates",
                suggestions.slots.len() - ranges.len()
            );
        }

        let resolved = calculate_range_granularity(&ranges);
        let import_granularity =
            Granularity::from_minutes(resolved).unwrap_or(self.settings.import_granularity());
        let written = import_into(&mut self.slots, &ranges, &default_dates, import_granularity);

        self.selected_dates.extend(default_dates);
        let with_slots: Vec<NaiveDate> = self
            .slots
            .iter()
            .filter(|(date, slots)| !slots.is_empty() && *date >= today)
            .map(|(date, _)| date)
            .collect();
        self.selected_dates.extend(with_slots);
        self.dirty = true;

        if written == 0 {
            log::info!("No suggested ticks to apply; keeping granularity");
            return self.granularity();
        }

        let optimal = calculate_optimal_granularity(&self.slots);
        let adopted = Granularity::from_minutes(optimal)
            .filter(|granularity| is_compatible_with_all(granularity.minutes(), &self.slots))
            .unwrap_or(import_granularity);
        self.granularity.reset(adopted);

        log::info!(
            "Applied {} suggested tick(s) at {}; granularity {} (optimal {} min)",
            written,
            import_granularity,
            adopted,
            optimal
        );
        adopted
    }

    // --- Persistence -----------------------------------------------------

    /// Draft of the session; only slots of selected dates are included.
    pub fn draft(&self) -> PollDraft {
        let mut slots = self.slots.clone();
        slots.retain_dates(|date| self.selected_dates.contains(&date));
        PollDraft {
            selected_dates: self.selected_dates.clone(),
            time_slots_by_date: slots,
            time_granularity: self.granularity(),
        }
    }

    /// Explicit save. A failure is returned for UI feedback; edits stay applied.
    pub fn save(&mut self, store: &dyn PollStore) -> Result<()> {
        match store.save(&self.draft()) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                log::warn!("Saving poll draft failed: {:#}", err);
                Err(err)
            }
        }
    }

    /// Hand the current draft to the autosave debounce if anything changed.
    pub fn queue_autosave(&mut self, scheduler: &mut AutosaveScheduler, now: Instant) -> bool {
        if !self.dirty {
            return false;
        }
        scheduler.queue(self.draft(), now);
        self.dirty = false;
        true
    }
}
