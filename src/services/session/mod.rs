// Editing session
// Ties the calendar, slot and selection services to one poll draft

mod editor;
mod events;

pub use editor::{PollEditor, TickView};
pub use events::{CalendarEvent, CalendarEvents, EventLog};
