// Test fixtures - reusable test data
// Provides consistent dates, suggestions and editors across test files
#![allow(dead_code)]

use chrono::NaiveDate;
use rust_poll_calendar::models::external_slot::{ExternalSlot, Suggestions};
use rust_poll_calendar::models::settings::EditorSettings;
use rust_poll_calendar::services::session::{EventLog, PollEditor};
use rust_poll_calendar::utils::clock::FixedClock;

/// Sample dates for testing
pub mod dates {
    use super::*;

    pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Wednesday Jan 10, 2024, used as "today" across tests
    pub fn today() -> NaiveDate {
        ymd(2024, 1, 10)
    }

    /// Feb 29, 2024 (leap year)
    pub fn leap_day_2024() -> NaiveDate {
        ymd(2024, 2, 29)
    }
}

/// Sample assistant suggestions
pub mod suggestions {
    use super::*;

    /// Morning hour on the default dates plus an afternoon on the 20th
    pub fn mixed() -> Suggestions {
        Suggestions {
            slots: vec![
                ExternalSlot::new("09:00", "10:00"),
                ExternalSlot::new("14:00", "16:00").on_dates(["2024-01-20"]),
            ],
            dates: vec!["2024-01-15".to_string(), "2024-01-16".to_string()],
        }
    }

    /// Whole-hour ranges only
    pub fn hourly() -> Suggestions {
        Suggestions {
            slots: vec![ExternalSlot::new("08:00", "11:00")],
            dates: vec!["2024-01-18".to_string()],
        }
    }

    pub fn from_json(raw: &str) -> Suggestions {
        serde_json::from_str(raw).unwrap()
    }
}

pub fn settings() -> EditorSettings {
    EditorSettings::default()
}

/// Editor over a clock frozen at [`dates::today`], recording its callbacks.
pub fn editor(clock: &FixedClock) -> PollEditor<&FixedClock, EventLog> {
    PollEditor::new(settings(), clock, EventLog::default())
}
