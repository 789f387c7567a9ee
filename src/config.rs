use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, Result};

// ---------- DEFAULTS ----------

pub const DEFAULT_REFERENCE_KIN: u32 = 183; // Kin of the calibration date
pub const DEFAULT_FORECAST_EXPIRY_HOURS: u64 = 24;
pub const DEFAULT_DAYS_BEFORE: u32 = 10;
pub const DEFAULT_DAYS_AFTER: u32 = 20;
pub const MAX_RANGE_DAYS: u32 = 3660; // per side, about ten years

/// 2025-09-23, the calibration date for Kin 183.
pub fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 23).unwrap_or(NaiveDate::MIN)
}

fn default_reference_kin() -> u32 {
    DEFAULT_REFERENCE_KIN
}

fn default_cache_capacity() -> usize {
    crate::cache::DEFAULT_CACHE_CAPACITY
}

fn default_forecast_expiry_hours() -> u64 {
    DEFAULT_FORECAST_EXPIRY_HOURS
}

fn default_days_before() -> u32 {
    DEFAULT_DAYS_BEFORE
}

fn default_days_after() -> u32 {
    DEFAULT_DAYS_AFTER
}

/// Calculator configuration, loadable from TOML.
///
/// | Key | Default | Description |
/// |-----|---------|-------------|
/// | reference_date | 2025-09-23 | Tzolkin calibration date |
/// | reference_kin | 183 | Kin on `reference_date` |
/// | cache_capacity | 100 | Entries kept by the memo cache |
/// | forecast_expiry_hours | 24 | Lifetime of a stored forecast |
/// | days_before / days_after | 10 / 20 | Biorhythm range around the center date |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_reference_date")]
    pub reference_date: NaiveDate,
    #[serde(default = "default_reference_kin")]
    pub reference_kin: u32,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default = "default_forecast_expiry_hours")]
    pub forecast_expiry_hours: u64,
    #[serde(default = "default_days_before")]
    pub days_before: u32,
    #[serde(default = "default_days_after")]
    pub days_after: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_date: default_reference_date(),
            reference_kin: DEFAULT_REFERENCE_KIN,
            cache_capacity: default_cache_capacity(),
            forecast_expiry_hours: DEFAULT_FORECAST_EXPIRY_HOURS,
            days_before: DEFAULT_DAYS_BEFORE,
            days_after: DEFAULT_DAYS_AFTER,
        }
    }
}

impl Config {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(input).map_err(|e| CalendarError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| CalendarError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=260).contains(&self.reference_kin) {
            return Err(CalendarError::Config(format!(
                "reference_kin must be in 1..=260, got {}",
                self.reference_kin
            )));
        }
        if self.cache_capacity == 0 {
            return Err(CalendarError::Config(
                "cache_capacity must be positive".to_string(),
            ));
        }
        if self.days_before > MAX_RANGE_DAYS || self.days_after > MAX_RANGE_DAYS {
            return Err(CalendarError::Config(format!(
                "days_before/days_after must be at most {}, got {}/{}",
                MAX_RANGE_DAYS, self.days_before, self.days_after
            )));
        }
        if self.forecast_expiry_hours == 0 {
            return Err(CalendarError::Config(
                "forecast_expiry_hours must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn forecast_expiry_ms(&self) -> i64 {
        (self.forecast_expiry_hours as i64).saturating_mul(60 * 60 * 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.reference_date, NaiveDate::from_ymd_opt(2025, 9, 23).unwrap());
        assert_eq!(config.reference_kin, 183);
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.forecast_expiry_ms(), 86_400_000);
        assert_eq!((config.days_before, config.days_after), (10, 20));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str("cache_capacity = 8\ndays_after = 3\n").unwrap();
        assert_eq!(config.cache_capacity, 8);
        assert_eq!(config.days_after, 3);
        assert_eq!(config.reference_kin, 183);

        let empty = Config::from_toml_str("").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn test_reference_date_from_toml() {
        let config =
            Config::from_toml_str("reference_date = \"2012-12-21\"\nreference_kin = 207\n").unwrap();
        assert_eq!(config.reference_date, NaiveDate::from_ymd_opt(2012, 12, 21).unwrap());
        assert_eq!(config.reference_kin, 207);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for bad in [
            "reference_kin = 0",
            "reference_kin = 261",
            "cache_capacity = 0",
            "forecast_expiry_hours = 0",
            "reference_date = \"not a date\"",
            "days_before = -1",
            "days_before = 3661",
            "days_after = 4000000000",
        ] {
            assert!(
                matches!(Config::from_toml_str(bad), Err(CalendarError::Config(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::load("/nonexistent/nicetoday.toml"),
            Err(CalendarError::Config(_))
        ));
    }
}
