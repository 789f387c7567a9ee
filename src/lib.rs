//! Daily calendar readings: biorhythm cycles, the 260-day Tzolkin count,
//! Western zodiac signs and seeded per-day horoscope forecasts.

pub mod biorhythm;
pub mod cache;
pub mod config;
pub mod date_utils;
pub mod error;
pub mod guidance;
pub mod horoscope;
pub mod metrics;
pub mod store;
pub mod tzolkin;
pub mod zodiac;

pub use biorhythm::{compute_biorhythm, compute_biorhythm_range, BiorhythmSample, Cycle};
pub use cache::{CalendarCache, MemoCache};
pub use config::Config;
pub use error::{CalendarError, Result};
pub use horoscope::{generate_daily_forecast, DailyForecast};
pub use metrics::Metrics;
pub use store::{ForecastStore, KeyValueStore, MemoryStore};
pub use tzolkin::{compute_tzolkin, TzolkinCalculator, TzolkinSample};
pub use zodiac::{compute_compatibility, compute_moon_sign, resolve_zodiac_sign, ZodiacSign};
