//! Month grid generation.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::models::calendar_day::{CalendarDay, DateCellState};
use crate::utils::date::{days_in_month, first_of_month, monday_first_index};

/// Build the day cells of the month containing `date`.
///
/// The grid starts with one blank per weekday before day 1 (Monday first)
/// and ends on the last day of the month, without trailing padding.
pub fn month_grid(date: NaiveDate) -> Vec<CalendarDay> {
    let first = first_of_month(date);
    let leading_blanks = monday_first_index(first) as usize;
    let day_count = days_in_month(first.year(), first.month());

    let mut cells = Vec::with_capacity(leading_blanks + day_count as usize);
    cells.extend(std::iter::repeat(CalendarDay::blank()).take(leading_blanks));
    cells.extend(
        first
            .iter_days()
            .take(day_count as usize)
            .map(CalendarDay::day),
    );
    cells
}

/// Number of blank cells before day 1 of the month containing `date`.
pub fn leading_blanks(date: NaiveDate) -> usize {
    monday_first_index(first_of_month(date)) as usize
}

/// How a date cell renders in the picker. Days before `today` are disabled.
pub fn date_cell_state(day: NaiveDate, today: NaiveDate, selected: bool) -> DateCellState {
    DateCellState {
        disabled: day < today,
        selected,
        is_today: day == today,
    }
}

/// Memoized month grids keyed by `(year, month)`.
#[derive(Debug, Default)]
pub struct MonthGridCache {
    grids: HashMap<(i32, u32), Vec<CalendarDay>>,
}

impl MonthGridCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, date: NaiveDate) -> &[CalendarDay] {
        self.grids
            .entry((date.year(), date.month()))
            .or_insert_with(|| month_grid(date))
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}
