use std::f64::consts::PI;
use std::time::Instant;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Config, MAX_RANGE_DAYS};
use crate::date_utils::{days_between, modulo, offset_days, parse_optional_date, require_birth_date, today};
use crate::error::{CalendarError, Result};
use crate::guidance::RhythmStatus;

// ---------- CYCLES ----------

pub const PHYSICAL_PERIOD: i64 = 23; // days
pub const EMOTIONAL_PERIOD: i64 = 28; // days
pub const INTELLECTUAL_PERIOD: i64 = 33; // days

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cycle {
    Physical,
    Emotional,
    Intellectual,
}

impl Cycle {
    pub const ALL: [Cycle; 3] = [Cycle::Physical, Cycle::Emotional, Cycle::Intellectual];

    pub fn period(self) -> i64 {
        match self {
            Cycle::Physical => PHYSICAL_PERIOD,
            Cycle::Emotional => EMOTIONAL_PERIOD,
            Cycle::Intellectual => INTELLECTUAL_PERIOD,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Cycle::Physical => "体力",
            Cycle::Emotional => "情绪",
            Cycle::Intellectual => "智力",
        }
    }

    /// Five insight lines, strongest first, keyed on the normalized value.
    fn insight_levels(self) -> [&'static str; 5] {
        match self {
            Cycle::Physical => [
                "体力充沛，适合高强度运动和工作",
                "体力良好，可以安排适度运动",
                "体力平稳，注意劳逸结合",
                "体力稍弱，建议多休息",
                "体力低迷，需要充分休息",
            ],
            Cycle::Emotional => [
                "情绪高涨，适合创意工作",
                "情绪稳定，心情愉快",
                "情绪平稳，保持乐观",
                "情绪稍低，注意调节",
                "情绪低落，需要放松心情",
            ],
            Cycle::Intellectual => [
                "思维敏捷，适合学习思考",
                "智力良好，可以处理复杂问题",
                "智力平稳，适合常规工作",
                "注意力分散，需要专注",
                "思维迟缓，建议简单任务",
            ],
        }
    }

    /// (low, high) reminder lines for values beyond ±0.5.
    fn reminders(self) -> (&'static str, &'static str) {
        match self {
            Cycle::Physical => (
                "今天体力较低，建议安排轻松的活动，避免过度劳累。",
                "体力充沛，可以安排运动或需要体力的工作。",
            ),
            Cycle::Emotional => (
                "情绪可能有些低落，可以听听音乐或与朋友聊天来调节心情。",
                "情绪状态很好，适合进行创意性的工作或社交活动。",
            ),
            Cycle::Intellectual => (
                "思维可能不够敏捷，建议处理简单任务，避免复杂决策。",
                "思维敏捷，适合学习新知识或解决复杂问题。",
            ),
        }
    }
}

/// Halves round towards positive infinity, so -0.5 becomes 0.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// `round(100 * sin(2π * days / period))`.
///
/// The day count is reduced modulo the period first, so `days` and
/// `days + period` produce bit-identical phases.
pub fn cycle_score(days: i64, period: i64) -> i32 {
    let phase = modulo(days, period) as f64 / period as f64;
    round_half_up(100.0 * (2.0 * PI * phase).sin()) as i32
}

// ---------- SAMPLE ----------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiorhythmSample {
    pub date: NaiveDate,
    pub physical: i32,
    pub emotional: i32,
    pub intellectual: i32,
    pub days_since_birth: i64,
}

impl BiorhythmSample {
    pub fn score(&self, cycle: Cycle) -> i32 {
        match cycle {
            Cycle::Physical => self.physical,
            Cycle::Emotional => self.emotional,
            Cycle::Intellectual => self.intellectual,
        }
    }

    /// Score scaled back to [-1, 1].
    pub fn normalized(&self, cycle: Cycle) -> f64 {
        f64::from(self.score(cycle)) / 100.0
    }

    pub fn status(&self, cycle: Cycle) -> RhythmStatus {
        RhythmStatus::from_score(f64::from(self.score(cycle)))
    }

    /// Number of cycles strictly above zero.
    pub fn positive_count(&self) -> usize {
        Cycle::ALL.iter().filter(|c| self.score(**c) > 0).count()
    }

    pub fn is_critical(&self) -> bool {
        !critical_cycles(self).is_empty()
    }
}

pub fn compute_biorhythm(birth: NaiveDate, target: NaiveDate) -> BiorhythmSample {
    let days = days_between(birth, target);
    BiorhythmSample {
        date: target,
        physical: cycle_score(days, PHYSICAL_PERIOD),
        emotional: cycle_score(days, EMOTIONAL_PERIOD),
        intellectual: cycle_score(days, INTELLECTUAL_PERIOD),
        days_since_birth: days,
    }
}

/// String boundary: birth is required, target defaults to today.
pub fn biorhythm_from_strings(birth: Option<&str>, target: Option<&str>) -> Result<BiorhythmSample> {
    let birth = require_birth_date(birth)?;
    let target = parse_optional_date(target, today())?;
    Ok(compute_biorhythm(birth, target))
}

// ---------- RANGES ----------

/// `days_before + days_after + 1` samples centered on `center`, in date order.
///
/// Each side is capped at `MAX_RANGE_DAYS`; a window reaching past chrono's
/// date range is `InvalidDate`.
pub fn compute_biorhythm_range(
    birth: NaiveDate,
    center: NaiveDate,
    days_before: u32,
    days_after: u32,
) -> Result<Vec<BiorhythmSample>> {
    if days_before > MAX_RANGE_DAYS || days_after > MAX_RANGE_DAYS {
        return Err(CalendarError::Config(format!(
            "range of -{}/+{} days exceeds {} per side",
            days_before, days_after, MAX_RANGE_DAYS
        )));
    }
    let start = Instant::now();
    let count = days_before + days_after;

    let samples: Vec<BiorhythmSample> = (0..=count)
        .into_par_iter()
        .map(|i| {
            let offset = i64::from(i) - i64::from(days_before);
            offset_days(center, offset).map(|date| compute_biorhythm(birth, date))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        target: "biorhythm",
        "Calculated {} samples in {}µs",
        samples.len(),
        start.elapsed().as_micros()
    );
    Ok(samples)
}

pub fn compute_biorhythm_range_today(birth: NaiveDate, config: &Config) -> Result<Vec<BiorhythmSample>> {
    compute_biorhythm_range(birth, today(), config.days_before, config.days_after)
}

// ---------- CRITICAL DAYS & TEXT ----------

/// Cycles crossing zero on the sample's day.
pub fn critical_cycles(sample: &BiorhythmSample) -> Vec<Cycle> {
    Cycle::ALL
        .into_iter()
        .filter(|c| modulo(sample.days_since_birth, c.period()) == 0)
        .collect()
}

pub fn insight_lines(sample: &BiorhythmSample) -> Vec<&'static str> {
    let mut lines: Vec<&'static str> = Cycle::ALL
        .iter()
        .map(|cycle| {
            let value = sample.normalized(*cycle);
            let levels = cycle.insight_levels();
            match value {
                v if v > 0.7 => levels[0],
                v if v > 0.3 => levels[1],
                v if v > -0.3 => levels[2],
                v if v > -0.7 => levels[3],
                _ => levels[4],
            }
        })
        .collect();

    lines.push(match sample.positive_count() {
        3 => "今天三大周期都处于良好状态，是高效工作学习的好时机！",
        2 => "大部分周期状态良好，可以合理安排重要事项",
        1 => "有一个周期状态良好，可以专注于相关领域的工作",
        _ => "今天各周期都处于调整期，适合休息放松，为明天储备能量",
    });
    lines
}

pub fn insight(sample: &BiorhythmSample) -> String {
    let mut text = insight_lines(sample).join("。");
    if !text.ends_with('！') {
        text.push('。');
    }
    text
}

pub fn daily_reminder(sample: &BiorhythmSample) -> String {
    let reminders: Vec<&'static str> = Cycle::ALL
        .iter()
        .filter_map(|cycle| {
            let value = sample.normalized(*cycle);
            let (low, high) = cycle.reminders();
            if value < -0.5 {
                Some(low)
            } else if value > 0.5 {
                Some(high)
            } else {
                None
            }
        })
        .collect();

    if reminders.is_empty() {
        "今天各周期状态平稳，可以按计划进行日常工作。".to_string()
    } else {
        reminders.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_birth_day_is_zero() {
        let birth = ymd(1990, 5, 15);
        let sample = compute_biorhythm(birth, birth);
        assert_eq!(sample.days_since_birth, 0);
        assert_eq!((sample.physical, sample.emotional, sample.intellectual), (0, 0, 0));
        assert_eq!(critical_cycles(&sample), Cycle::ALL.to_vec());
    }

    #[test]
    fn test_known_values() {
        // Quarter of the emotional cycle: sin(π/2)
        let birth = ymd(2000, 1, 1);
        let sample = compute_biorhythm(birth, offset_days(birth, 7).unwrap());
        assert_eq!(sample.emotional, 100);
        assert_eq!(sample.physical, cycle_score(7, 23));
        assert_eq!(cycle_score(21, 28), -100);
        assert_eq!(cycle_score(14, 28), 0);
    }

    #[test]
    fn test_physical_period_example() {
        let sample = compute_biorhythm(ymd(1990, 5, 15), ymd(1990, 6, 7));
        assert_eq!(sample.days_since_birth, 23);
        assert_eq!(sample.physical, 0);
        assert_eq!(critical_cycles(&sample), vec![Cycle::Physical]);
    }

    #[test]
    fn test_target_before_birth() {
        let birth = ymd(2000, 1, 10);
        let sample = compute_biorhythm(birth, ymd(2000, 1, 3));
        assert_eq!(sample.days_since_birth, -7);
        assert_eq!(sample.emotional, -100);
        assert_eq!(sample.physical, -cycle_score(7, 23));
    }

    #[test]
    fn test_half_rounds_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
    }

    #[test]
    fn test_string_boundary() {
        assert!(matches!(
            biorhythm_from_strings(None, Some("2024-01-01")),
            Err(CalendarError::MissingInput(_))
        ));
        assert!(matches!(
            biorhythm_from_strings(Some("1990/05/15"), None),
            Err(CalendarError::InvalidDate(_))
        ));
        assert!(matches!(
            biorhythm_from_strings(Some("1990-05-15"), Some("tomorrow")),
            Err(CalendarError::InvalidDate(_))
        ));

        let sample = biorhythm_from_strings(Some("1990-05-15"), Some("1990-06-07")).unwrap();
        assert_eq!(sample, compute_biorhythm(ymd(1990, 5, 15), ymd(1990, 6, 7)));

        let today_sample = biorhythm_from_strings(Some("1990-05-15"), None).unwrap();
        assert_eq!(today_sample.date, today());
    }

    #[test]
    fn test_range_is_ordered_and_sized() {
        let birth = ymd(1985, 3, 2);
        let center = ymd(2024, 6, 15);
        let samples = compute_biorhythm_range(birth, center, 10, 20).unwrap();
        assert_eq!(samples.len(), 31);
        assert_eq!(samples[0].date, ymd(2024, 6, 5));
        assert_eq!(samples[10].date, center);
        assert_eq!(samples[30].date, ymd(2024, 7, 5));
        for pair in samples.windows(2) {
            assert_eq!(pair[1].days_since_birth, pair[0].days_since_birth + 1);
        }
        assert_eq!(samples[10], compute_biorhythm(birth, center));

        assert_eq!(compute_biorhythm_range(birth, center, 0, 0).unwrap().len(), 1);
    }

    #[test]
    fn test_range_at_calendar_edges() {
        let birth = ymd(2000, 1, 1);
        assert!(matches!(
            compute_biorhythm_range(birth, NaiveDate::MAX, 0, 1),
            Err(CalendarError::InvalidDate(_))
        ));
        assert!(matches!(
            compute_biorhythm_range(birth, NaiveDate::MIN, 1, 0),
            Err(CalendarError::InvalidDate(_))
        ));
        let last = compute_biorhythm_range(birth, NaiveDate::MAX, 1, 0).unwrap();
        assert_eq!(last[1].date, NaiveDate::MAX);
    }

    #[test]
    fn test_range_width_is_capped() {
        let birth = ymd(2000, 1, 1);
        let center = ymd(2024, 6, 15);
        assert!(matches!(
            compute_biorhythm_range(birth, center, MAX_RANGE_DAYS + 1, 0),
            Err(CalendarError::Config(_))
        ));
        assert!(compute_biorhythm_range(birth, center, 0, u32::MAX).is_err());
        let widest = compute_biorhythm_range(birth, center, MAX_RANGE_DAYS, MAX_RANGE_DAYS).unwrap();
        assert_eq!(widest.len(), 2 * MAX_RANGE_DAYS as usize + 1);
    }

    #[test]
    fn test_range_today_uses_config() {
        let config = Config {
            days_before: 2,
            days_after: 3,
            ..Config::default()
        };
        let samples = compute_biorhythm_range_today(ymd(1990, 5, 15), &config).unwrap();
        assert_eq!(samples.len(), 6);
        assert_eq!(samples[2].date, today());
    }

    #[test]
    fn test_insight_text() {
        let sample = BiorhythmSample {
            date: ymd(2024, 1, 1),
            physical: 80,
            emotional: 50,
            intellectual: -90,
            days_since_birth: 100,
        };
        assert_eq!(sample.positive_count(), 2);
        assert_eq!(
            insight(&sample),
            "体力充沛，适合高强度运动和工作。情绪稳定，心情愉快。思维迟缓，建议简单任务。\
             大部分周期状态良好，可以合理安排重要事项。"
        );

        let reminder = daily_reminder(&sample);
        assert!(reminder.starts_with("体力充沛"));
        assert!(reminder.ends_with("避免复杂决策。"));
        assert_eq!(reminder.lines().count(), 2);
    }

    #[test]
    fn test_flat_day_reminder() {
        let sample = BiorhythmSample {
            date: ymd(2024, 1, 1),
            physical: 10,
            emotional: -50,
            intellectual: 50,
            days_since_birth: 1,
        };
        assert_eq!(daily_reminder(&sample), "今天各周期状态平稳，可以按计划进行日常工作。");
        assert_eq!(sample.status(Cycle::Emotional), RhythmStatus::Low);
        assert_eq!(sample.status(Cycle::Physical), RhythmStatus::Moderate);
    }
}
