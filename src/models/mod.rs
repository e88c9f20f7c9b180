// Module exports for models

pub mod calendar_day;
pub mod draft;
pub mod external_slot;
pub mod settings;
pub mod time_slot;
