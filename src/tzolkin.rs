use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::cache::{CalendarCache, MemoCache};
use crate::config::{default_reference_date, Config, DEFAULT_REFERENCE_KIN};
use crate::date_utils::{days_between, modulo};
use crate::error::{CalendarError, Result};
use crate::guidance::{tip_for, EnergyLevel, Guidance};
use crate::metrics::Metrics;

// ---------- TABLES ----------

pub const TZOLKIN_CYCLE: i64 = 260; // days
pub const TONE_COUNT: usize = 13;
pub const SEAL_COUNT: usize = 20;
pub const MOON_DAYS: u32 = 28;

pub const TONES: [&str; TONE_COUNT] = [
    "磁性", "月亮", "电力", "自我存在", "超频", "韵律", "共振", "银河", "太阳", "行星", "光谱",
    "水晶", "宇宙",
];

pub const SEALS: [&str; SEAL_COUNT] = [
    "红龙", "白风", "蓝夜", "黄种子", "红蛇", "白世界桥", "蓝手", "黄星星", "红月", "白狗", "蓝猴",
    "黄人", "红天行者", "白巫师", "蓝鹰", "黄战士", "红地球", "白镜", "蓝风暴", "黄太阳",
];

// ---------- SAMPLE ----------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TzolkinSample {
    pub date: NaiveDate,
    pub kin: u32,
    pub tone_index: usize,
    pub seal_index: usize,
    pub tone: &'static str,
    pub seal: &'static str,
    pub days_from_reference: i64,
}

impl TzolkinSample {
    fn from_days(date: NaiveDate, reference_kin: u32, days: i64) -> Self {
        let kin = modulo(i64::from(reference_kin) - 1 + days, TZOLKIN_CYCLE) as u32 + 1;
        let tone_index = (kin as usize - 1) % TONE_COUNT;
        let seal_index = (kin as usize - 1) % SEAL_COUNT;
        Self {
            date,
            kin,
            tone_index,
            seal_index,
            tone: TONES[tone_index],
            seal: SEALS[seal_index],
            days_from_reference: days,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}的{}", self.tone, self.seal)
    }

    /// Position in a 28-day moon count, 1..=28.
    pub fn moon_day(&self) -> u32 {
        match self.kin % MOON_DAYS {
            0 => MOON_DAYS,
            day => day,
        }
    }
}

impl fmt::Display for TzolkinSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kin {} {}", self.kin, self.full_name())
    }
}

// ---------- CALCULATOR ----------

/// Tzolkin calculator anchored on a known (date, Kin) pair.
#[derive(Clone)]
pub struct TzolkinCalculator {
    reference_date: NaiveDate,
    reference_kin: u32,
    cache: Option<Arc<dyn MemoCache<NaiveDate, TzolkinSample>>>,
    metrics: Arc<Metrics>,
}

impl TzolkinCalculator {
    pub fn new(reference_date: NaiveDate, reference_kin: u32) -> Result<Self> {
        if !(1..=TZOLKIN_CYCLE as u32).contains(&reference_kin) {
            return Err(CalendarError::Config(format!(
                "reference kin must be in 1..=260, got {}",
                reference_kin
            )));
        }
        Ok(Self {
            reference_date,
            reference_kin,
            cache: None,
            metrics: Arc::new(Metrics::new()),
        })
    }

    /// Calibration and cache sized from `config`; the cache shares this calculator's metrics.
    pub fn from_config(config: &Config) -> Result<Self> {
        let calculator = Self::new(config.reference_date, config.reference_kin)?;
        let cache = CalendarCache::with_metrics(config.cache_capacity, Arc::clone(&calculator.metrics));
        Ok(calculator.with_cache(Arc::new(cache)))
    }

    pub fn with_cache(mut self, cache: Arc<dyn MemoCache<NaiveDate, TzolkinSample>>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn reference_kin(&self) -> u32 {
        self.reference_kin
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn compute(&self, target: NaiveDate) -> TzolkinSample {
        if let Some(sample) = self.cache.as_ref().and_then(|c| c.get(&target)) {
            debug!(target: "tzolkin", "cache hit for {}", target);
            return sample;
        }

        let start = Instant::now();
        let days = days_between(self.reference_date, target);
        let sample = TzolkinSample::from_days(target, self.reference_kin, days);
        self.metrics.record_calculation(start.elapsed());

        if let Some(cache) = &self.cache {
            debug!(target: "tzolkin", "cache miss for {}, storing {}", target, sample);
            cache.put(target, sample.clone());
        }
        sample
    }
}

impl Default for TzolkinCalculator {
    fn default() -> Self {
        Self {
            reference_date: default_reference_date(),
            reference_kin: DEFAULT_REFERENCE_KIN,
            cache: None,
            metrics: Arc::new(Metrics::new()),
        }
    }
}

/// Tzolkin reading with the default calibration (2025-09-23 is Kin 183).
///
/// Uncached; callers wanting memoization build a `TzolkinCalculator`.
pub fn compute_tzolkin(target: NaiveDate) -> TzolkinSample {
    let days = days_between(default_reference_date(), target);
    TzolkinSample::from_days(target, DEFAULT_REFERENCE_KIN, days)
}

// ---------- ENERGY TIP ----------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnergyTip {
    pub level: EnergyLevel,
    pub score: u32,
    pub tip: &'static str,
    pub suggestion: &'static str,
    pub color: &'static str,
}

impl EnergyTip {
    pub fn level_label(&self) -> &'static str {
        self.level.label()
    }
}

/// Energy tier for a Kin, scored `kin % 100 + 1`. The tip variant is indexed
/// by `kin`, so a given day always shows the same text.
pub fn energy_tip(kin: u32) -> EnergyTip {
    let score = kin % 100 + 1;
    let level = EnergyLevel::from_score(f64::from(score));
    let (suggestion, color) = match level {
        EnergyLevel::High => ("适合开展重要活动、做决策、开启新项目", "green"),
        EnergyLevel::Medium => ("适合日常工作、学习、社交活动", "blue"),
        EnergyLevel::Low => ("适合休息、冥想、规划、内省活动", "yellow"),
    };
    EnergyTip {
        level,
        score,
        tip: tip_for(level, u64::from(kin)),
        suggestion,
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_utils::offset_days;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_calibration_neighbourhood() {
        assert_eq!(compute_tzolkin(ymd(2025, 9, 22)).kin, 182);
        assert_eq!(compute_tzolkin(ymd(2025, 9, 23)).kin, 183);
        assert_eq!(compute_tzolkin(ymd(2025, 9, 24)).kin, 184);
    }

    #[test]
    fn test_kin_183_names() {
        let sample = compute_tzolkin(ymd(2025, 9, 23));
        assert_eq!(sample.tone_index, 0);
        assert_eq!(sample.seal_index, 2);
        assert_eq!(sample.full_name(), "磁性的蓝夜");
        assert_eq!(sample.days_from_reference, 0);
        assert_eq!(sample.moon_day(), 15);
        assert_eq!(sample.to_string(), "Kin 183 磁性的蓝夜");
    }

    #[test]
    fn test_wraps_in_both_directions() {
        let calc = TzolkinCalculator::new(ymd(2025, 9, 23), 1).unwrap();
        assert_eq!(calc.compute(ymd(2025, 9, 22)).kin, 260);
        assert_eq!(calc.compute(ymd(2025, 9, 23)).kin, 1);

        let calc = TzolkinCalculator::new(ymd(2025, 9, 23), 260).unwrap();
        assert_eq!(calc.compute(ymd(2025, 9, 24)).kin, 1);

        let far_past = compute_tzolkin(offset_days(ymd(2025, 9, 23), -260 * 40 - 1).unwrap());
        assert_eq!(far_past.kin, 182);
    }

    #[test]
    fn test_moon_day_never_zero() {
        let calc = TzolkinCalculator::new(ymd(2025, 9, 23), 28).unwrap();
        assert_eq!(calc.compute(ymd(2025, 9, 23)).moon_day(), 28);
        assert_eq!(calc.compute(ymd(2025, 9, 24)).moon_day(), 1);
    }

    #[test]
    fn test_invalid_reference_kin() {
        assert!(matches!(
            TzolkinCalculator::new(ymd(2025, 9, 23), 0),
            Err(CalendarError::Config(_))
        ));
        assert!(TzolkinCalculator::new(ymd(2025, 9, 23), 261).is_err());
    }

    #[test]
    fn test_free_function_matches_calculators() {
        let plain = TzolkinCalculator::default();
        let cached = TzolkinCalculator::from_config(&Config::default()).unwrap();
        for offset in [-400, -1, 0, 1, 259, 260, 1000] {
            let date = offset_days(ymd(2025, 9, 23), offset).unwrap();
            assert_eq!(compute_tzolkin(date), plain.compute(date));
            assert_eq!(compute_tzolkin(date), cached.compute(date));
        }
    }

    #[test]
    fn test_cache_is_transparent() {
        let plain = TzolkinCalculator::default();
        let cached = TzolkinCalculator::from_config(&Config::default()).unwrap();
        let start = ymd(2024, 1, 1);
        for round in 0..2 {
            for offset in 0..50 {
                let date = offset_days(start, offset).unwrap();
                assert_eq!(plain.compute(date), cached.compute(date), "round {round}");
            }
        }
        assert_eq!(cached.metrics().cache_hits(), 50);
        assert_eq!(cached.metrics().cache_misses(), 50);
        assert_eq!(cached.metrics().calculations(), 50);
    }

    #[test]
    fn test_cache_capacity_bound() {
        let cache: Arc<CalendarCache<NaiveDate, TzolkinSample>> = Arc::new(CalendarCache::new(5));
        let calc = TzolkinCalculator::default().with_cache(cache.clone());
        for offset in 0..12 {
            calc.compute(offset_days(ymd(2025, 1, 1), offset).unwrap());
        }
        assert_eq!(cache.len(), 5);
        assert!(cache.contains(&ymd(2025, 1, 12)));
        assert!(!cache.contains(&ymd(2025, 1, 1)));
    }

    #[test]
    fn test_energy_tiers() {
        let high = energy_tip(183);
        assert_eq!(high.score, 84);
        assert_eq!(high.level, EnergyLevel::High);
        assert_eq!(high.level_label(), "高");
        assert_eq!(high.color, "green");

        assert_eq!(energy_tip(79).score, 80);
        assert_eq!(energy_tip(79).level, EnergyLevel::High);
        assert_eq!(energy_tip(179).level, EnergyLevel::High);
        assert_eq!(energy_tip(78).level, EnergyLevel::Medium);
        assert_eq!(energy_tip(59).level, EnergyLevel::Medium);
        assert_eq!(energy_tip(159).level, EnergyLevel::Medium);
        assert_eq!(energy_tip(259).level, EnergyLevel::Medium);
        assert_eq!(energy_tip(260).level, EnergyLevel::Medium);
        assert_eq!(energy_tip(58).level, EnergyLevel::Low);
        assert_eq!(energy_tip(258).level, EnergyLevel::Low);
        assert_eq!(energy_tip(100).score, 1);
        assert_eq!(energy_tip(100).level, EnergyLevel::Low);
    }

    #[test]
    fn test_energy_tip_is_stable_per_kin() {
        for kin in 1..=260 {
            assert_eq!(energy_tip(kin), energy_tip(kin));
            assert!(!energy_tip(kin).tip.is_empty());
        }
    }
}
