// Service module exports

pub mod calendar;
pub mod persistence;
pub mod selection;
pub mod session;
pub mod settings;
pub mod slots;
