// Settings module
// Editor configuration loaded from settings.toml

use serde::{Deserialize, Serialize};

use crate::models::time_slot::Granularity;

/// How contiguous enabled slots are grouped into display blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Enabled slots merge while no disabled slot lies between them in time order,
    /// regardless of the minute gap.
    #[default]
    SequenceOrder,
    /// Like `SequenceOrder`, but a gap larger than one granularity step also
    /// closes the block.
    GapChecked,
}

/// Tunables for a poll-editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Granularity of a fresh session, in minutes
    pub default_granularity: u32,
    /// Lattice used when expanding assistant suggestions, in minutes
    pub import_granularity: u32,
    pub merge_strategy: MergeStrategy,
    pub long_press_ms: u64,
    pub move_tolerance_px: f32,
    pub haptic_pulse_ms: u64,
    pub scroll_extend_threshold_px: f32,
    pub scroll_extend_batch: usize,
    pub max_visible_months: usize,
    pub creation_horizon_years: u32,
    pub scroll_horizon_years: u32,
    pub autosave_debounce_ms: u64,
    /// IANA timezone used for "today"; the machine's local zone when unset
    pub timezone: Option<String>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            default_granularity: 30,
            import_granularity: 15,
            merge_strategy: MergeStrategy::SequenceOrder,
            long_press_ms: 500,
            move_tolerance_px: 10.0,
            haptic_pulse_ms: 50,
            scroll_extend_threshold_px: 200.0,
            scroll_extend_batch: 3,
            max_visible_months: 60,
            creation_horizon_years: 2,
            scroll_horizon_years: 5,
            autosave_debounce_ms: 1500,
            timezone: None,
        }
    }
}

impl EditorSettings {
    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if Granularity::from_minutes(self.default_granularity).is_none() {
            return Err(format!(
                "Unsupported default granularity: {} minutes",
                self.default_granularity
            ));
        }

        if Granularity::from_minutes(self.import_granularity).is_none() {
            return Err(format!(
                "Unsupported import granularity: {} minutes",
                self.import_granularity
            ));
        }

        if self.scroll_extend_batch == 0 {
            return Err("Scroll extend batch must be at least 1 month".to_string());
        }

        if self.max_visible_months == 0 {
            return Err("Visible month window must hold at least 1 month".to_string());
        }

        if !self.move_tolerance_px.is_finite() || self.move_tolerance_px < 0.0 {
            return Err("Move tolerance must be a non-negative number of pixels".to_string());
        }

        if let Some(ref name) = self.timezone {
            if name.parse::<chrono_tz::Tz>().is_err() {
                return Err(format!("Unknown timezone: {}", name));
            }
        }

        Ok(())
    }

    pub fn default_granularity(&self) -> Granularity {
        Granularity::from_minutes(self.default_granularity).unwrap_or_default()
    }

    pub fn import_granularity(&self) -> Granularity {
        Granularity::from_minutes(self.import_granularity)
            .unwrap_or(Granularity::FifteenMinutes)
    }
}
