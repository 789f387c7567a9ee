//! Threshold mapping from numbers to category labels, plus the tip tables
//! each label indexes into.

use serde::{Deserialize, Serialize};

/// One lower bound of a category. `inclusive` decides whether a value equal
/// to `lower` belongs to this label or falls through to the next one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold<L> {
    pub lower: f64,
    pub inclusive: bool,
    pub label: L,
}

impl<L> Threshold<L> {
    pub const fn above(lower: f64, label: L) -> Self {
        Self { lower, inclusive: false, label }
    }

    pub const fn at_least(lower: f64, label: L) -> Self {
        Self { lower, inclusive: true, label }
    }

    fn admits(&self, value: f64) -> bool {
        if self.inclusive {
            value >= self.lower
        } else {
            value > self.lower
        }
    }
}

/// Map `value` onto the first threshold it satisfies.
///
/// Thresholds must be ordered from the highest bound down; anything below the
/// last bound (and NaN) maps to `fallback`, so the mapping is total.
pub fn map_to_category<L: Copy>(value: f64, thresholds: &[Threshold<L>], fallback: L) -> L {
    thresholds
        .iter()
        .find(|t| t.admits(value))
        .map(|t| t.label)
        .unwrap_or(fallback)
}

/// Deterministic pick among equivalent tip variants.
pub fn select_variant(variants: &'static [&'static str], seed: u64) -> &'static str {
    match variants.len() {
        0 => "",
        len => variants[(seed % len as u64) as usize],
    }
}

/// A category label with display text and a table of tip variants.
pub trait Guidance: Copy {
    fn label(self) -> &'static str;

    fn tips(self) -> &'static [&'static str] {
        &[]
    }
}

/// Tip for `label`; the same seed always yields the same variant.
pub fn tip_for<G: Guidance>(label: G, seed: u64) -> &'static str {
    select_variant(label.tips(), seed)
}

// ---------- BIORHYTHM STATUS ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RhythmStatus {
    Good,
    Moderate,
    Low,
}

const RHYTHM_STATUS_THRESHOLDS: [Threshold<RhythmStatus>; 2] = [
    Threshold::above(20.0, RhythmStatus::Good),
    Threshold::at_least(-10.0, RhythmStatus::Moderate),
];

impl RhythmStatus {
    /// Bucket a biorhythm score in percent.
    pub fn from_score(score: f64) -> Self {
        map_to_category(score, &RHYTHM_STATUS_THRESHOLDS, RhythmStatus::Low)
    }
}

impl Guidance for RhythmStatus {
    fn label(self) -> &'static str {
        match self {
            RhythmStatus::Good => "良好",
            RhythmStatus::Moderate => "一般",
            RhythmStatus::Low => "较低",
        }
    }

    fn tips(self) -> &'static [&'static str] {
        match self {
            RhythmStatus::Good => &[
                "状态上佳，适合安排有挑战性的任务。",
                "精力充沛，可以尝试新的运动或学习计划。",
                "今天效率很高，把重要的事情放在上午完成。",
            ],
            RhythmStatus::Moderate => &[
                "状态平稳，按计划推进日常事务即可。",
                "保持规律作息，劳逸结合。",
                "适合处理常规工作，避免临时加码。",
            ],
            RhythmStatus::Low => &[
                "状态偏低，给自己留出休息的时间。",
                "今天适合放慢节奏，少做重大决定。",
                "早点休息，为明天储备能量。",
            ],
        }
    }
}

// ---------- TREND ARROWS ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    StrongUp,
    Up,
    Flat,
    Down,
    StrongDown,
}

const TREND_THRESHOLDS: [Threshold<Trend>; 4] = [
    Threshold::above(2.0, Trend::StrongUp),
    Threshold::above(0.5, Trend::Up),
    Threshold::at_least(-0.5, Trend::Flat),
    Threshold::at_least(-2.0, Trend::Down),
];

impl Trend {
    pub fn from_diff(diff: f64) -> Self {
        map_to_category(diff, &TREND_THRESHOLDS, Trend::StrongDown)
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Trend::StrongUp => "↑↑",
            Trend::Up => "↑",
            Trend::Flat => "→",
            Trend::Down => "↓",
            Trend::StrongDown => "↓↓",
        }
    }
}

/// Trend from a previous value to the current one; no previous value is flat.
pub fn trend_between(previous: Option<f64>, current: f64) -> Trend {
    match previous {
        Some(prev) => Trend::from_diff(current - prev),
        None => Trend::Flat,
    }
}

// ---------- TIME OF DAY ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    LateNight,
    Morning,
    Noon,
    Afternoon,
    Evening,
}

const TIME_OF_DAY_THRESHOLDS: [Threshold<TimeOfDay>; 4] = [
    Threshold::at_least(18.0, TimeOfDay::Evening),
    Threshold::at_least(14.0, TimeOfDay::Afternoon),
    Threshold::at_least(12.0, TimeOfDay::Noon),
    Threshold::at_least(6.0, TimeOfDay::Morning),
];

impl TimeOfDay {
    /// Bucket a clock hour (0-23). Out-of-range hours wrap around the day.
    pub fn from_hour(hour: u32) -> Self {
        map_to_category(
            f64::from(hour % 24),
            &TIME_OF_DAY_THRESHOLDS,
            TimeOfDay::LateNight,
        )
    }
}

impl Guidance for TimeOfDay {
    fn label(self) -> &'static str {
        match self {
            TimeOfDay::LateNight => "夜深了",
            TimeOfDay::Morning => "早上好",
            TimeOfDay::Noon => "中午好",
            TimeOfDay::Afternoon => "下午好",
            TimeOfDay::Evening => "晚上好",
        }
    }

    fn tips(self) -> &'static [&'static str] {
        match self {
            TimeOfDay::LateNight => &["放下手机，尽快入睡。", "深夜不宜做重大决定。"],
            TimeOfDay::Morning => &["喝一杯温水，唤醒身体。", "上午头脑清醒，适合处理难题。"],
            TimeOfDay::Noon => &["午餐七分饱，饭后小憩片刻。", "中午适当走动，放松肩颈。"],
            TimeOfDay::Afternoon => &["下午容易犯困，起身活动一下。", "适合沟通协作和收尾工作。"],
            TimeOfDay::Evening => &["晚餐宜清淡，给身体减负。", "适合散步、阅读，放松心情。"],
        }
    }
}

// ---------- SEASONS ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

const SEASON_THRESHOLDS: [Threshold<Season>; 4] = [
    Threshold::at_least(12.0, Season::Winter),
    Threshold::at_least(9.0, Season::Autumn),
    Threshold::at_least(6.0, Season::Summer),
    Threshold::at_least(3.0, Season::Spring),
];

impl Season {
    /// Bucket a calendar month (1-12); January and February are winter.
    pub fn from_month(month: u32) -> Self {
        map_to_category(f64::from(month), &SEASON_THRESHOLDS, Season::Winter)
    }
}

impl Guidance for Season {
    fn label(self) -> &'static str {
        match self {
            Season::Spring => "春",
            Season::Summer => "夏",
            Season::Autumn => "秋",
            Season::Winter => "冬",
        }
    }

    fn tips(self) -> &'static [&'static str] {
        match self {
            Season::Spring => &["早睡早起，多去户外踏青。", "春季养肝，少酸多甘。"],
            Season::Summer => &["夜卧早起，午间小憩。", "注意防暑，及时补水。"],
            Season::Autumn => &["早睡早起，收敛神气。", "秋燥伤肺，多吃润燥食物。"],
            Season::Winter => &["早睡晚起，注意保暖。", "冬季宜温补，适度进补。"],
        }
    }
}

// ---------- FORECAST SCORES ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreLevel {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

const SCORE_LEVEL_THRESHOLDS: [Threshold<ScoreLevel>; 5] = [
    Threshold::at_least(90.0, ScoreLevel::Excellent),
    Threshold::at_least(75.0, ScoreLevel::VeryGood),
    Threshold::at_least(60.0, ScoreLevel::Good),
    Threshold::at_least(45.0, ScoreLevel::Fair),
    Threshold::at_least(30.0, ScoreLevel::Poor),
];

impl ScoreLevel {
    pub fn from_score(score: f64) -> Self {
        map_to_category(score, &SCORE_LEVEL_THRESHOLDS, ScoreLevel::VeryPoor)
    }
}

impl Guidance for ScoreLevel {
    fn label(self) -> &'static str {
        match self {
            ScoreLevel::Excellent => "极佳",
            ScoreLevel::VeryGood => "很好",
            ScoreLevel::Good => "良好",
            ScoreLevel::Fair => "一般",
            ScoreLevel::Poor => "较差",
            ScoreLevel::VeryPoor => "很差",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreTrend {
    SharpRise,
    Rise,
    Steady,
    Decline,
    SharpDecline,
}

const SCORE_TREND_THRESHOLDS: [Threshold<ScoreTrend>; 4] = [
    Threshold::at_least(80.0, ScoreTrend::SharpRise),
    Threshold::at_least(60.0, ScoreTrend::Rise),
    Threshold::at_least(40.0, ScoreTrend::Steady),
    Threshold::at_least(20.0, ScoreTrend::Decline),
];

impl ScoreTrend {
    pub fn from_score(score: f64) -> Self {
        map_to_category(score, &SCORE_TREND_THRESHOLDS, ScoreTrend::SharpDecline)
    }
}

impl Guidance for ScoreTrend {
    fn label(self) -> &'static str {
        match self {
            ScoreTrend::SharpRise => "大幅上升",
            ScoreTrend::Rise => "上升",
            ScoreTrend::Steady => "平稳",
            ScoreTrend::Decline => "下降",
            ScoreTrend::SharpDecline => "大幅下降",
        }
    }
}

// ---------- ENERGY LEVEL ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnergyLevel {
    High,
    Medium,
    Low,
}

const ENERGY_LEVEL_THRESHOLDS: [Threshold<EnergyLevel>; 2] = [
    Threshold::at_least(80.0, EnergyLevel::High),
    Threshold::at_least(60.0, EnergyLevel::Medium),
];

impl EnergyLevel {
    pub fn from_score(score: f64) -> Self {
        map_to_category(score, &ENERGY_LEVEL_THRESHOLDS, EnergyLevel::Low)
    }
}

impl Guidance for EnergyLevel {
    fn label(self) -> &'static str {
        match self {
            EnergyLevel::High => "高",
            EnergyLevel::Medium => "中",
            EnergyLevel::Low => "低",
        }
    }

    fn tips(self) -> &'static [&'static str] {
        match self {
            EnergyLevel::High => &[
                "今日能量充沛，是行动的好时机！保持积极心态，勇敢追求目标。",
                "今日能量高涨，适合迈出关键一步，把想法落到实处。",
                "今日气场强劲，主动沟通会带来意想不到的收获。",
            ],
            EnergyLevel::Medium => &[
                "今日能量中等，适合稳步推进计划。注意调节身心平衡，避免过度劳累。",
                "今日能量平稳，按部就班完成手头的事情就很好。",
                "今日节奏适中，适合整理思路，为接下来的行动做准备。",
            ],
            EnergyLevel::Low => &[
                "今日能量偏低，建议放慢节奏，多休息调整。适合内省和规划，避免重大决策。",
                "今日能量较弱，照顾好自己的身体，早些休息。",
                "今日适合安静独处，回顾近期得失，积蓄力量。",
            ],
        }
    }
}
