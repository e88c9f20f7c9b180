use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::EditorSettings;
use crate::utils::clock::{Clock, LocalClock, ZonedClock};

/// Environment variable that overrides the settings file location.
pub const CONFIG_PATH_ENV: &str = "POLL_CALENDAR_CONFIG";

const SETTINGS_FILE: &str = "settings.toml";

pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Settings file from `POLL_CALENDAR_CONFIG`, else the platform config dir.
    pub fn from_env() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(Self::new(path));
        }
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "Ken24T", "RustPollCalendar")
            .context("Failed to resolve the configuration directory")?;
        Ok(dirs.config_dir().join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to defaults when the file does not exist.
    pub fn load(&self) -> Result<EditorSettings> {
        if !self.path.exists() {
            log::info!(
                "No settings file at {}; using defaults",
                self.path.display()
            );
            return Ok(EditorSettings::default());
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let settings: EditorSettings = toml::from_str(&data)
            .with_context(|| format!("Failed to parse settings in {}", self.path.display()))?;
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        Ok(settings)
    }

    /// Save settings
    pub fn save(&self, settings: &EditorSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {}", parent.display()))?;
        }
        let data = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, data)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))?;
        Ok(())
    }
}

/// Clock honouring the configured timezone, or the local zone when unset.
pub fn clock_for(settings: &EditorSettings) -> Box<dyn Clock> {
    match settings.timezone.as_deref().and_then(ZonedClock::from_name) {
        Some(clock) => Box::new(clock),
        None => Box::new(LocalClock),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::MergeStrategy;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let service = SettingsService::new(dir.path().join("settings.toml"));

        assert_eq!(service.load().unwrap(), EditorSettings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let service = SettingsService::new(dir.path().join("nested").join("settings.toml"));

        let settings = EditorSettings {
            default_granularity: 60,
            merge_strategy: MergeStrategy::GapChecked,
            timezone: Some("Australia/Brisbane".to_string()),
            ..EditorSettings::default()
        };
        service.save(&settings).unwrap();

        assert_eq!(service.load().unwrap(), settings);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "default_granularity = 7\n").unwrap();

        let err = SettingsService::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Invalid settings"));
    }

    #[test]
    fn test_save_rejects_invalid_settings() {
        let dir = tempdir().unwrap();
        let service = SettingsService::new(dir.path().join("settings.toml"));
        let settings = EditorSettings {
            import_granularity: 0,
            ..EditorSettings::default()
        };

        assert!(service.save(&settings).is_err());
        assert!(!service.path().exists());
    }

    #[test]
    #[serial]
    fn test_env_var_overrides_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::env::set_var(CONFIG_PATH_ENV, &path);

        let service = SettingsService::from_env().unwrap();
        std::env::remove_var(CONFIG_PATH_ENV);

        assert_eq!(service.path(), path.as_path());
    }

    #[test]
    fn test_clock_for_configured_zone() {
        let settings = EditorSettings {
            timezone: Some("Europe/Lisbon".to_string()),
            ..EditorSettings::default()
        };
        // Both clocks report a real date; the zoned one is within a day of local
        let zoned = clock_for(&settings).today();
        let local = LocalClock.today();
        assert!((zoned - local).num_days().abs() <= 1);
    }
}
