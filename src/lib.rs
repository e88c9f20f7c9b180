// Rust Poll Calendar Library
// Date and time-slot selection engine for poll creation

pub mod models;
pub mod services;
pub mod utils;
