use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Datelike, Local, NaiveDate, Timelike};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use nicetoday_core::biorhythm::{self, compute_biorhythm_range, critical_cycles, Cycle};
use nicetoday_core::config::Config;
use nicetoday_core::date_utils::{format_date, parse_date, today};
use nicetoday_core::error::Result;
use nicetoday_core::guidance::{tip_for, trend_between, Guidance, Season, TimeOfDay};
use nicetoday_core::horoscope::generate_daily_forecast;
use nicetoday_core::tzolkin::{energy_tip, TzolkinCalculator};
use nicetoday_core::zodiac::{
    compatible_matches, compute_moon_sign, moon_cycle_percent, moon_sign_influence, sign_for_date,
    ZodiacSign,
};

/// Daily readings: biorhythm, Tzolkin, zodiac forecast.
#[derive(Debug, Parser)]
#[command(name = "nicetoday", version, about)]
struct Args {
    /// Birth date (YYYY-MM-DD); enables the biorhythm section
    #[arg(long)]
    birth: Option<String>,

    /// Day to read (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<String>,

    /// Zodiac sign by Chinese name, e.g. 白羊座
    #[arg(long)]
    sign: Option<ZodiacSign>,

    #[arg(long)]
    days_before: Option<u32>,

    #[arg(long)]
    days_after: Option<u32>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_logging() {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .compact()
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(before) = args.days_before {
        config.days_before = before;
    }
    if let Some(after) = args.days_after {
        config.days_after = after;
    }
    config.validate()?;
    Ok(config)
}

fn print_biorhythm(birth: NaiveDate, date: NaiveDate, config: &Config) -> Result<()> {
    let samples = compute_biorhythm_range(birth, date, config.days_before, config.days_after)?;
    let center = config.days_before as usize;
    let Some(sample) = samples.get(center) else {
        return Ok(());
    };
    let previous = center.checked_sub(1).and_then(|i| samples.get(i));

    println!("\n🧬 Biorhythm ({} days since birth)", sample.days_since_birth);
    for cycle in Cycle::ALL {
        let status = sample.status(cycle);
        let trend = trend_between(
            previous.map(|p| f64::from(p.score(cycle))),
            f64::from(sample.score(cycle)),
        );
        println!(
            "   {} {:>4} {} {}  {}",
            cycle.label(),
            sample.score(cycle),
            trend.arrow(),
            status.label(),
            tip_for(status, sample.days_since_birth.unsigned_abs())
        );
    }
    println!("💡 {}", biorhythm::insight(sample));
    println!("📌 {}", biorhythm::daily_reminder(sample));

    let critical: Vec<String> = samples
        .iter()
        .filter(|s| !critical_cycles(s).is_empty())
        .map(|s| {
            let names: Vec<&str> = critical_cycles(s).iter().map(|c| c.label()).collect();
            format!("{} ({})", format_date(s.date), names.join("/"))
        })
        .collect();
    if !critical.is_empty() {
        println!("⚠️  Critical days: {}", critical.join(", "));
    }
    Ok(())
}

fn print_tzolkin(date: NaiveDate, config: &Config) -> Result<TzolkinCalculator> {
    let calculator = TzolkinCalculator::from_config(config)?;
    let sample = calculator.compute(date);
    let energy = energy_tip(sample.kin);

    println!("\n🌞 Tzolkin: {} (moon day {}/28)", sample, sample.moon_day());
    println!(
        "⚡ Energy {} ({}): {}  {}",
        energy.level_label(),
        energy.score,
        energy.tip,
        energy.suggestion
    );
    Ok(calculator)
}

fn print_forecast(sign: ZodiacSign, date: NaiveDate) {
    let forecast = generate_daily_forecast(sign, date);

    println!("\n✨ {} ({}) forecast {}", sign, sign.element().label(), forecast.daily_id);
    println!("   综合 {}  {}", forecast.overall_score, forecast.overall_description);
    for (name, score) in [
        ("爱情", &forecast.love),
        ("财运", &forecast.wealth),
        ("事业", &forecast.career),
        ("学业", &forecast.study),
        ("人际", &forecast.social),
    ] {
        println!(
            "   {} {:>3} {} ({})",
            name,
            score.score,
            score.description.label(),
            score.trend.label()
        );
    }
    println!("👍 {}", forecast.positive_advice);
    println!("🚫 {}", forecast.avoid_advice);
    println!("📌 {}", forecast.daily_reminder);
    println!(
        "🍀 {} {}: {}",
        forecast.lucky_item.icon, forecast.lucky_item.name, forecast.lucky_item.description
    );
    if let Some(question) = &forecast.soul_question {
        println!("❓ {}\n   {}", question.question, question.answer);
    }

    let matches: Vec<String> = compatible_matches(sign)
        .iter()
        .map(|m| format!("{} {}", m.sign, m.score))
        .collect();
    println!("💞 Compatible: {}", matches.join(", "));

    let moon = moon_sign_influence(compute_moon_sign(date));
    println!(
        "🌙 Moon in {} ({}%): {} / {}",
        moon.sign,
        moon_cycle_percent(date),
        moon.activity,
        moon.energy_level
    );
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let date = match &args.date {
        Some(raw) => parse_date(raw)?,
        None => today(),
    };
    let birth = args.birth.as_deref().map(parse_date).transpose()?;
    let sign = args
        .sign
        .or_else(|| birth.map(sign_for_date))
        .unwrap_or_else(|| sign_for_date(date));

    info!(date = %format_date(date), sign = %sign, "Reading day");
    println!("📆 {}", format_date(date));

    if let Some(birth) = birth {
        print_biorhythm(birth, date, &config)?;
    }
    let calculator = print_tzolkin(date, &config)?;
    print_forecast(sign, date);

    let hour = Local::now().hour();
    let time_of_day = TimeOfDay::from_hour(hour);
    let season = Season::from_month(date.month());
    let seed = u64::from(date.ordinal());
    println!("\n🕰 {}! {}", time_of_day.label(), tip_for(time_of_day, seed));
    println!("🍂 {}季: {}", season.label(), tip_for(season, seed));

    info!("{}", calculator.metrics().report());
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("❌ {}", err);
            ExitCode::FAILURE
        }
    }
}
