// Settings service
// Loads and saves editor settings as TOML

mod service;

pub use service::{clock_for, SettingsService, CONFIG_PATH_ENV};
