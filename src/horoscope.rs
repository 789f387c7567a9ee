//! Seeded daily forecast generation.
//!
//! Every "random" choice is drawn from a PRNG seeded by the SHA-256 of the
//! date and sign name, so one (sign, date) pair always yields one forecast.

use std::f64::consts::PI;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::biorhythm::round_half_up;
use crate::date_utils::format_date;
use crate::error::Result;
use crate::guidance::{ScoreLevel, ScoreTrend};
use crate::zodiac::{Element, ZodiacSign};

// ---------- SEEDING ----------

const LEHMER_MODULUS: u64 = 2_147_483_647; // 2^31 - 1
const LEHMER_MULTIPLIER: u64 = 16_807;

fn hash_to_u64(input: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let hash = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash[..8]);
    u64::from_be_bytes(bytes)
}

/// `"{YYYY-MM-DD}-{sign name}"`, the identity of one day's forecast.
pub fn daily_id(sign: ZodiacSign, date: NaiveDate) -> String {
    format!("{}-{}", format_date(date), sign.name())
}

/// Seed material for one (sign, date) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySeed {
    id: String,
    value: u64,
}

impl DailySeed {
    pub fn new(sign: ZodiacSign, date: NaiveDate) -> Self {
        let id = daily_id(sign, date);
        let value = hash_to_u64(&id);
        Self { id, value }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Independent generator for one purpose ("score", "item", ...).
    pub fn stream(&self, salt: &str) -> DailyRng {
        DailyRng::new(hash_to_u64(&format!("{}#{}", self.id, salt)))
    }
}

/// Park-Miller minimal standard generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRng {
    state: u64,
}

impl DailyRng {
    pub fn new(seed: u64) -> Self {
        // state must stay in [1, 2^31 - 2]
        Self {
            state: seed % (LEHMER_MODULUS - 1) + 1,
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state * LEHMER_MULTIPLIER % LEHMER_MODULUS;
        self.state as u32
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32() - 1) / (LEHMER_MODULUS - 1) as f64
    }

    /// Index in `0..len`; 0 for an empty range.
    pub fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }
}

// ---------- STATIC TABLES ----------

/// (period in days, weights by element in fire/earth/air/water order)
const PLANETS: [(f64, [f64; 4]); 5] = [
    (365.0, [8.0, 3.0, 6.0, 4.0]), // sun
    (27.3, [4.0, 5.0, 4.0, 9.0]),  // moon
    (88.0, [5.0, 6.0, 8.0, 4.0]),  // mercury
    (225.0, [6.0, 7.0, 5.0, 8.0]), // venus
    (687.0, [9.0, 4.0, 6.0, 3.0]), // mars
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoulCategory {
    Love,
    Career,
    Health,
    Finance,
    Personal,
}

impl SoulCategory {
    pub const ALL: [SoulCategory; 5] = [
        SoulCategory::Love,
        SoulCategory::Career,
        SoulCategory::Health,
        SoulCategory::Finance,
        SoulCategory::Personal,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SoulCategory::Love => "love",
            SoulCategory::Career => "career",
            SoulCategory::Health => "health",
            SoulCategory::Finance => "finance",
            SoulCategory::Personal => "personal",
        }
    }

    fn questions(self) -> [&'static str; 5] {
        match self {
            SoulCategory::Love => [
                "我何时能找到真爱？",
                "如何改善当前的感情关系？",
                "我应该主动表白吗？",
                "如何判断对方是否真心？",
                "在感情中如何保持自我？",
            ],
            SoulCategory::Career => [
                "我的职业发展前景如何？",
                "何时是换工作的最佳时机？",
                "如何提升职场竞争力？",
                "我应该创业还是继续打工？",
                "如何平衡工作与生活？",
            ],
            SoulCategory::Health => [
                "如何改善身体健康状况？",
                "需要注意哪些健康问题？",
                "如何缓解压力？",
                "什么样的运动最适合我？",
                "如何提升睡眠质量？",
            ],
            SoulCategory::Finance => [
                "我的财运何时会有转机？",
                "如何进行合理的投资？",
                "如何控制不必要的开支？",
                "今年适合进行大额消费吗？",
                "如何提升理财能力？",
            ],
            SoulCategory::Personal => [
                "如何提升自信心？",
                "我应该学习什么新技能？",
                "如何改善人际关系？",
                "今年的主要目标是什么？",
                "如何找到生活的意义？",
            ],
        }
    }
}

fn soul_answers(element: Element, category: SoulCategory) -> [&'static str; 4] {
    use SoulCategory::*;
    match (element, category) {
        (Element::Fire, Love) => [
            "勇敢追求，但要注意表达方式",
            "热情似火，但要学会控制节奏",
            "主动出击，但要尊重对方感受",
            "真诚表达，但不要急于求成",
        ],
        (Element::Fire, Career) => [
            "发挥领导力，勇于承担责任",
            "积极进取，但要注意团队合作",
            "创新思维，但要注重实际效果",
            "目标明确，但要保持耐心",
        ],
        (Element::Fire, Health) => [
            "多进行户外运动，释放能量",
            "注意情绪管理，避免过度激动",
            "保持规律作息，避免熬夜",
            "适当放松，不要给自己太大压力",
        ],
        (Element::Fire, Finance) => [
            "投资要有冒险精神，但要控制风险",
            "赚钱机会较多，但要理性消费",
            "积极开拓财源，但要避免冲动",
            "财运总体不错，但要合理规划",
        ],
        (Element::Fire, Personal) => [
            "保持自信，勇于展现自我",
            "多尝试新事物，扩展视野",
            "学会控制情绪，保持冷静",
            "发挥创造力，追求梦想",
        ],
        (Element::Earth, Love) => [
            "稳扎稳打，建立可靠关系",
            "注重实际，不要过分理想化",
            "耐心经营，感情需要时间培养",
            "真诚付出，但要有自我保护意识",
        ],
        (Element::Earth, Career) => [
            "脚踏实地，一步一个脚印",
            "注重细节，追求完美",
            "长期规划，不要急于求成",
            "发挥耐心，积累经验",
        ],
        (Element::Earth, Health) => [
            "注意饮食规律，保持健康",
            "适当运动，不要过度劳累",
            "关注肠胃健康，避免压力",
            "保持稳定作息，避免变化",
        ],
        (Element::Earth, Finance) => [
            "稳健理财，避免高风险投资",
            "积累财富需要耐心和时间",
            "合理规划开支，注重储蓄",
            "财运稳定，但要避免过度保守",
        ],
        (Element::Earth, Personal) => [
            "保持务实态度，注重实际",
            "培养耐心，不要急于求成",
            "注重细节，追求完美",
            "建立稳定的人际关系",
        ],
        (Element::Air, Love) => [
            "注重沟通，但要避免过度理性",
            "保持新鲜感，避免单调",
            "尊重对方空间，保持独立",
            "灵活应变，但要保持真诚",
        ],
        (Element::Air, Career) => [
            "发挥沟通优势，建立人脉",
            "创新思维，但要结合实际",
            "多学习新知识，保持竞争力",
            "注重合作，发挥团队力量",
        ],
        (Element::Air, Health) => [
            "注意神经系统健康，避免过度思考",
            "保持社交活动，避免孤独",
            "适当冥想，平静心灵",
            "注意呼吸系统健康",
        ],
        (Element::Air, Finance) => [
            "灵活理财，善于发现机会",
            "多元化投资，分散风险",
            "善于利用信息优势",
            "财运多变，要灵活应对",
        ],
        (Element::Air, Personal) => [
            "保持好奇心，不断学习",
            "注重沟通交流，扩展人脉",
            "培养独立思考能力",
            "平衡理性与感性",
        ],
        (Element::Water, Love) => [
            "相信直觉，但要理性判断",
            "用心感受，但要避免过度敏感",
            "真诚付出，但要保护自己",
            "深度连接，但要保持独立",
        ],
        (Element::Water, Career) => [
            "发挥创造力，注重情感价值",
            "相信直觉，但要结合实际",
            "注重人际关系，发挥同理心",
            "保持耐心，等待时机",
        ],
        (Element::Water, Health) => [
            "注意情绪管理，避免抑郁",
            "关注内分泌系统健康",
            "适当进行水中运动",
            "保持积极心态，避免消极",
        ],
        (Element::Water, Finance) => [
            "感性理财，但要保持理性",
            "财运与情绪状态相关",
            "适合投资有情感价值的项目",
            "注意控制消费冲动",
        ],
        (Element::Water, Personal) => [
            "相信直觉，但要理性验证",
            "培养情感智慧，理解他人",
            "保持敏感，但不要过度",
            "发挥创造力，追求梦想",
        ],
    }
}

/// (name, icon, description)
fn lucky_items(element: Element) -> [(&'static str, &'static str, &'static str); 5] {
    match element {
        Element::Fire => [
            ("红色笔记本", "📓", "记录灵感，提升创造力"),
            ("玛瑙手链", "🔴", "增强勇气，保护能量"),
            ("香薰蜡烛", "🕯️", "净化环境，提升热情"),
            ("运动手环", "🏃", "记录活力，激励行动"),
            ("太阳镜", "🕶️", "保护视力，增强自信"),
        ],
        Element::Earth => [
            ("皮质钱包", "👝", "聚财守财，增强稳定"),
            ("绿植盆栽", "🌱", "净化空气，带来生机"),
            ("实木书签", "📖", "辅助学习，增强耐心"),
            ("陶瓷杯", "☕", "温暖人心，促进交流"),
            ("玉石挂件", "💎", "稳定情绪，增强耐力"),
        ],
        Element::Air => [
            ("智能手机", "📱", "便捷沟通，获取信息"),
            ("水晶饰品", "🔮", "净化思维，增强灵感"),
            ("羽毛笔", "✒️", "激发创意，提升表达"),
            ("风铃", "🎐", "带来好运，净化环境"),
            ("蓝牙耳机", "🎧", "专注学习，避免干扰"),
        ],
        Element::Water => [
            ("海洋香薰", "🌊", "平静心灵，增强直觉"),
            ("蓝色水晶", "💧", "净化情感，带来宁静"),
            ("鱼形挂饰", "🐠", "带来好运，增强感性"),
            ("茶具套装", "🍵", "促进交流，平静内心"),
            ("珍珠项链", "⚪", "增强魅力，保护情感"),
        ],
    }
}

/// (positive advice, things to avoid, daily reminder), indexed like `ZodiacSign::ALL`.
const SIGN_ADVICE: [(&str, &str, &str); 12] = [
    (
        "积极表达、展现领导力",
        "冲动行事、过度自我",
        "今天适合主动出击，但要注意控制脾气，避免因小事与人发生冲突。",
    ),
    (
        "稳扎稳打、注重实际",
        "固执己见、拒绝变化",
        "保持稳定节奏，避免被外界干扰，专注完成手头工作会有不错收获。",
    ),
    (
        "多沟通交流、学习新知识",
        "三心二意、缺乏耐心",
        "今天思维活跃，适合学习交流，但要避免同时处理太多事情导致分心。",
    ),
    (
        "关心家人、表达情感",
        "过度敏感、情绪化",
        "情感丰富的一天，多关心家人朋友，但要注意不要过度敏感影响心情。",
    ),
    (
        "展现自信、发挥创造力",
        "自负炫耀、控制欲强",
        "展现自信的好时机，但要避免过度强势，多听取他人意见会有帮助。",
    ),
    (
        "注重细节、追求完美",
        "过度挑剔、焦虑不安",
        "注重细节的一天，但不要过分追求完美，适当放松会让效率更高。",
    ),
    (
        "保持平衡、促进和谐",
        "犹豫不决、逃避冲突",
        "适合社交活动，但要避免为了和谐而委屈自己，保持真诚最重要。",
    ),
    (
        "深度思考、相信直觉",
        "多疑嫉妒、极端行为",
        "直觉敏锐，适合深度思考，但要避免因多疑而影响人际关系。",
    ),
    (
        "冒险探索、保持乐观",
        "不负责任、冲动决定",
        "冒险精神旺盛，适合尝试新事物，但要考虑实际可行性再行动。",
    ),
    (
        "专注目标、脚踏实地",
        "过度悲观、工作狂",
        "专注工作会有好成绩，但要注意劳逸结合，避免过度劳累。",
    ),
    (
        "创新思维、独立行动",
        "过于理性、冷漠疏离",
        "创新思维活跃，适合头脑风暴，但要考虑方案的实用性。",
    ),
    (
        "发挥想象、相信直觉",
        "逃避现实、缺乏界限",
        "想象力丰富，适合创作和冥想，但要避免过度沉溺于幻想。",
    ),
];

// ---------- FORECAST TYPES ----------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: u8,
    pub description: ScoreLevel,
    pub trend: ScoreTrend,
}

impl CategoryScore {
    fn new(score: u8) -> Self {
        Self {
            score,
            description: ScoreLevel::from_score(f64::from(score)),
            trend: ScoreTrend::from_score(f64::from(score)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoulQuestion {
    pub category: SoulCategory,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckyItem {
    pub name: String,
    pub icon: String,
    pub description: String,
    pub element: Element,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub sign: ZodiacSign,
    pub daily_id: String,
    pub base_score: u8,
    pub overall_score: u8,
    pub love: CategoryScore,
    pub wealth: CategoryScore,
    pub career: CategoryScore,
    pub study: CategoryScore,
    pub social: CategoryScore,
    pub positive_advice: String,
    pub avoid_advice: String,
    pub daily_reminder: String,
    pub lucky_colors: Vec<String>,
    pub lucky_numbers: Vec<u8>,
    pub compatible_signs: Vec<ZodiacSign>,
    pub moon_sign: ZodiacSign,
    pub lucky_item: LuckyItem,
    pub soul_question: Option<SoulQuestion>,
    pub overall_description: String,
}

impl DailyForecast {
    /// The four categories the overall score averages over.
    pub fn scored_categories(&self) -> [&CategoryScore; 4] {
        [&self.love, &self.wealth, &self.career, &self.study]
    }
}

// ---------- GENERATION ----------

fn clamp_score(value: f64) -> u8 {
    round_half_up(value).clamp(0.0, 100.0) as u8
}

/// Sine influence of each planet on the day of year, in [0, 1].
pub fn planetary_influences(date: NaiveDate) -> [f64; 5] {
    let day_of_year = f64::from(date.ordinal());
    PLANETS.map(|(period, _)| (day_of_year / period * 2.0 * PI).sin() * 0.5 + 0.5)
}

/// 50 plus weighted planetary influence plus up to ±10 of seeded jitter.
pub fn base_score(sign: ZodiacSign, date: NaiveDate, seed: &DailySeed) -> u8 {
    let element = sign.element().index();
    let planetary: f64 = planetary_influences(date)
        .iter()
        .zip(PLANETS.iter())
        .map(|(influence, (_, weights))| (influence - 0.5) * weights[element])
        .sum();
    let jitter = (seed.stream("score").next_f64() - 0.5) * 20.0;
    clamp_score(50.0 + planetary + jitter)
}

pub fn soul_question(sign: ZodiacSign, seed: &DailySeed) -> SoulQuestion {
    let category = SoulCategory::ALL[seed.stream("question").pick(SoulCategory::ALL.len())];
    let questions = category.questions();
    let question = questions[seed.stream(category.key()).pick(questions.len())];
    let answers = soul_answers(sign.element(), category);
    let answer = answers[seed.stream("answer").pick(answers.len())];
    SoulQuestion {
        category,
        question: question.to_string(),
        answer: answer.to_string(),
    }
}

pub fn lucky_item(sign: ZodiacSign, seed: &DailySeed) -> LuckyItem {
    let element = sign.element();
    let items = lucky_items(element);
    let (name, icon, description) = items[seed.stream("item").pick(items.len())];
    LuckyItem {
        name: name.to_string(),
        icon: icon.to_string(),
        description: description.to_string(),
        element,
    }
}

pub fn overall_description(score: u8, sign: ZodiacSign) -> String {
    let name = sign.name();
    match score {
        80..=u8::MAX => format!("今天对{}来说是充满机遇的一天，各方面运势都很不错，要好好把握！", name),
        60..=79 => format!("今天{}的运势总体良好，只要保持积极心态，会有不错的发展。", name),
        40..=59 => format!("今天{}的运势平稳，需要多一些耐心和努力才能获得理想结果。", name),
        _ => format!("今天{}可能会遇到一些挑战，但只要保持冷静，一切都会好起来。", name),
    }
}

/// Full forecast for one sign on one day.
pub fn generate_daily_forecast(sign: ZodiacSign, date: NaiveDate) -> DailyForecast {
    let seed = DailySeed::new(sign, date);
    let base = base_score(sign, date, &seed);
    let base_f = f64::from(base);
    let r = seed.stream("detailed").next_f64();

    let mut love = base_f * 0.8 + r * 20.0;
    let mut wealth = base_f * 0.7 + (1.0 - r) * 30.0;
    let mut career = base_f * 0.9 + r * 10.0;
    let mut study = base_f * 0.6 + r * 40.0;
    let mut social = base_f * 0.75 + r * 25.0;

    match sign.element() {
        Element::Fire => {
            career += 5.0;
            love += 3.0;
        }
        Element::Earth => {
            wealth += 5.0;
            career += 3.0;
        }
        Element::Air => {
            study += 5.0;
            love += 3.0;
            social += 3.0;
        }
        Element::Water => {
            love += 5.0;
            study += 3.0;
        }
    }

    let (love, wealth, career, study, social) = (
        clamp_score(love),
        clamp_score(wealth),
        clamp_score(career),
        clamp_score(study),
        clamp_score(social),
    );
    let sum = u32::from(love) + u32::from(wealth) + u32::from(career) + u32::from(study);
    let overall_score = ((sum + 2) / 4) as u8;

    let profile = sign.profile();
    let (positive_advice, avoid_advice, daily_reminder) = SIGN_ADVICE[sign.index()];
    let moon_sign = ZodiacSign::ALL[seed.stream("moon").pick(ZodiacSign::ALL.len())];

    debug!(
        target: "horoscope",
        "Generated forecast {} (base {}, overall {})",
        seed.id(),
        base,
        overall_score
    );

    DailyForecast {
        date,
        sign,
        daily_id: seed.id().to_string(),
        base_score: base,
        overall_score,
        love: CategoryScore::new(love),
        wealth: CategoryScore::new(wealth),
        career: CategoryScore::new(career),
        study: CategoryScore::new(study),
        social: CategoryScore::new(social),
        positive_advice: positive_advice.to_string(),
        avoid_advice: avoid_advice.to_string(),
        daily_reminder: daily_reminder.to_string(),
        lucky_colors: profile.lucky_colors.iter().map(|c| c.to_string()).collect(),
        lucky_numbers: profile.lucky_numbers.to_vec(),
        compatible_signs: profile.compatible.to_vec(),
        moon_sign,
        lucky_item: lucky_item(sign, &seed),
        soul_question: Some(soul_question(sign, &seed)),
        overall_description: overall_description(overall_score, sign),
    }
}

/// Name-keyed boundary; unknown names are `UnknownSign`.
pub fn generate_daily_forecast_by_name(name: &str, date: NaiveDate) -> Result<DailyForecast> {
    let sign = ZodiacSign::from_name(name)?;
    Ok(generate_daily_forecast(sign, date))
}

/// True when both forecasts are the same day's artifact for the same sign.
pub fn same_daily_artifact(a: &DailyForecast, b: &DailyForecast) -> bool {
    a.daily_id == b.daily_id && a.sign == b.sign && a.date == b.date
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_utils::offset_days;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_id() {
        assert_eq!(daily_id(ZodiacSign::Leo, ymd(2025, 9, 23)), "2025-09-23-狮子座");
        let seed = DailySeed::new(ZodiacSign::Leo, ymd(2025, 9, 23));
        assert_eq!(seed.id(), "2025-09-23-狮子座");
        assert_eq!(seed, DailySeed::new(ZodiacSign::Leo, ymd(2025, 9, 23)));
        assert_ne!(seed.value(), DailySeed::new(ZodiacSign::Leo, ymd(2025, 9, 24)).value());
    }

    #[test]
    fn test_rng_range_and_repeatability() {
        let mut a = DailyRng::new(42);
        let mut b = DailyRng::new(42);
        for _ in 0..1000 {
            let x = a.next_f64();
            assert!((0.0..1.0).contains(&x));
            assert_eq!(x, b.next_f64());
            assert!(a.pick(7) < 7);
            b.pick(7);
        }
        assert_eq!(DailyRng::new(0).pick(0), 0);
    }

    #[test]
    fn test_rng_extreme_seeds() {
        for seed in [0, 1, LEHMER_MODULUS - 2, LEHMER_MODULUS - 1, u64::MAX] {
            let mut rng = DailyRng::new(seed);
            for _ in 0..10 {
                let value = rng.next_u32();
                assert!(value >= 1 && (value as u64) < LEHMER_MODULUS);
            }
        }
    }

    #[test]
    fn test_streams_are_independent() {
        let seed = DailySeed::new(ZodiacSign::Aries, ymd(2024, 2, 29));
        let mut score = seed.stream("score");
        let mut item = seed.stream("item");
        let a: Vec<u32> = (0..4).map(|_| score.next_u32()).collect();
        let b: Vec<u32> = (0..4).map(|_| item.next_u32()).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_forecast_is_deterministic() {
        let date = ymd(2025, 9, 23);
        for sign in ZodiacSign::ALL {
            let first = generate_daily_forecast(sign, date);
            let second = generate_daily_forecast(sign, date);
            assert_eq!(first, second);
            assert!(same_daily_artifact(&first, &second));
        }
    }

    #[test]
    fn test_overall_is_rounded_mean() {
        let start = ymd(2025, 1, 1);
        for offset in 0..60 {
            for sign in ZodiacSign::ALL {
                let forecast = generate_daily_forecast(sign, offset_days(start, offset).unwrap());
                let sum: u32 = forecast
                    .scored_categories()
                    .iter()
                    .map(|c| u32::from(c.score))
                    .sum();
                let mean = f64::from(sum) / 4.0;
                assert_eq!(f64::from(forecast.overall_score), (mean + 0.5).floor());
                for category in forecast.scored_categories() {
                    assert!(category.score <= 100);
                }
                assert!(forecast.social.score <= 100);
                assert!(forecast.base_score <= 100);
            }
        }
    }

    #[test]
    fn test_forecast_tables() {
        let forecast = generate_daily_forecast(ZodiacSign::Virgo, ymd(2025, 3, 14));
        assert_eq!(forecast.daily_id, "2025-03-14-处女座");
        assert_eq!(forecast.positive_advice, "注重细节、追求完美");
        assert_eq!(forecast.avoid_advice, "过度挑剔、焦虑不安");
        assert_eq!(forecast.lucky_numbers, vec![3, 6]);
        assert_eq!(forecast.lucky_item.element, Element::Earth);
        assert_eq!(
            forecast.compatible_signs,
            vec![ZodiacSign::Taurus, ZodiacSign::Capricorn, ZodiacSign::Cancer]
        );
        let soul = forecast.soul_question.as_ref().unwrap();
        assert!(soul.category.questions().contains(&soul.question.as_str()));
        assert!(soul_answers(Element::Earth, soul.category).contains(&soul.answer.as_str()));
        assert!(forecast.overall_description.contains("处女座"));
    }

    #[test]
    fn test_different_days_differ() {
        let a = generate_daily_forecast(ZodiacSign::Gemini, ymd(2025, 6, 1));
        let b = generate_daily_forecast(ZodiacSign::Gemini, ymd(2025, 6, 2));
        assert!(!same_daily_artifact(&a, &b));
    }

    #[test]
    fn test_overall_description_tiers() {
        assert!(overall_description(80, ZodiacSign::Leo).starts_with("今天对狮子座"));
        assert!(overall_description(79, ZodiacSign::Leo).contains("总体良好"));
        assert!(overall_description(40, ZodiacSign::Leo).contains("平稳"));
        assert!(overall_description(39, ZodiacSign::Leo).contains("挑战"));
    }

    #[test]
    fn test_by_name() {
        let forecast = generate_daily_forecast_by_name("双鱼座", ymd(2025, 1, 1)).unwrap();
        assert_eq!(forecast.sign, ZodiacSign::Pisces);
        assert!(generate_daily_forecast_by_name("Pisces", ymd(2025, 1, 1)).is_err());
    }

    #[test]
    fn test_forecast_json_round_trip_keeps_identity() {
        let forecast = generate_daily_forecast(ZodiacSign::Scorpio, ymd(2025, 11, 1));
        let json = serde_json::to_string(&forecast).unwrap();
        assert!(json.contains("\"sign\":\"天蝎座\""));
        let back: DailyForecast = serde_json::from_str(&json).unwrap();
        assert!(same_daily_artifact(&forecast, &back));
        assert_eq!(back, forecast);
    }
}
