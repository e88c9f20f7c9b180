//! Calendar day cell model.
//!
//! One cell of a month grid. Leading cells that pad the first week up to the
//! first day of the month carry no date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single cell of a generated month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    /// Date of the cell, `None` for leading blanks
    pub date: Option<NaiveDate>,
    /// Whether the cell belongs to the generated month
    pub is_current_month: bool,
    /// Whether the cell is a leading blank
    pub is_empty: bool,
}

impl CalendarDay {
    /// A padding cell before day 1 of the month.
    pub fn blank() -> Self {
        Self {
            date: None,
            is_current_month: false,
            is_empty: true,
        }
    }

    /// A cell for a day of the generated month.
    pub fn day(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            is_current_month: true,
            is_empty: false,
        }
    }
}

/// Render state of a date cell in the date picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateCellState {
    /// Past dates cannot be picked
    pub disabled: bool,
    pub selected: bool,
    pub is_today: bool,
}
