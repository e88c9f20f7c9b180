// Calendar services
// Month grid generation and visible-month navigation

pub mod grid;
pub mod navigator;

pub use grid::{date_cell_state, leading_blanks, month_grid, MonthGridCache};
pub use navigator::{CalendarNavigator, MonthDirection, NavigatorKind, ScrollMetrics};
