use chrono::NaiveDate;

use crate::services::calendar::MonthDirection;
use crate::services::selection::BatchAction;

/// Notifications the editor raises toward the UI layer.
///
/// Every method defaults to doing nothing, so a host only implements the
/// callbacks it cares about.
pub trait CalendarEvents {
    fn on_date_toggle(&mut self, _date: NaiveDate) {}

    fn on_batch_date_toggle(&mut self, _dates: &[NaiveDate], _action: BatchAction) {}

    fn on_month_change(&mut self, _direction: MonthDirection) {}

    fn on_months_change(&mut self, _months: &[NaiveDate]) {}
}

/// No callbacks.
impl CalendarEvents for () {}

/// One recorded callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarEvent {
    DateToggle(NaiveDate),
    BatchDateToggle(Vec<NaiveDate>, BatchAction),
    MonthChange(MonthDirection),
    MonthsChange(Vec<NaiveDate>),
}

/// Collects callbacks in order; handy for hosts that drain events per frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    pub events: Vec<CalendarEvent>,
}

impl EventLog {
    pub fn drain(&mut self) -> Vec<CalendarEvent> {
        std::mem::take(&mut self.events)
    }
}

impl CalendarEvents for EventLog {
    fn on_date_toggle(&mut self, date: NaiveDate) {
        self.events.push(CalendarEvent::DateToggle(date));
    }

    fn on_batch_date_toggle(&mut self, dates: &[NaiveDate], action: BatchAction) {
        self.events
            .push(CalendarEvent::BatchDateToggle(dates.to_vec(), action));
    }

    fn on_month_change(&mut self, direction: MonthDirection) {
        self.events.push(CalendarEvent::MonthChange(direction));
    }

    fn on_months_change(&mut self, months: &[NaiveDate]) {
        self.events.push(CalendarEvent::MonthsChange(months.to_vec()));
    }
}
