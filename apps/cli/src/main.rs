#![deny(warnings)]

//! Headless CLI that plays the week's venture with a simple autopilot.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;
use venture_core::{week_number, MarketingChoice, VentureConfig};
use venture_runtime::config::{load_config, select_theme};
use venture_runtime::{Simulator, UniformSource};

const USAGE: &str =
    "usage: venture [--days N] [--seed S] [--config PATH] [--date YYYY-MM-DD] [--version]";

#[derive(Debug, Default)]
struct Args {
    days: Option<u32>,
    seed: Option<u64>,
    config: Option<String>,
    date: Option<NaiveDate>,
    version: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--days" => {
                let v = it.next().context("--days needs a value")?;
                args.days = Some(v.parse().with_context(|| format!("bad --days {v}"))?);
            }
            "--seed" => {
                let v = it.next().context("--seed needs a value")?;
                args.seed = Some(v.parse().with_context(|| format!("bad --seed {v}"))?);
            }
            "--config" => args.config = Some(it.next().context("--config needs a path")?),
            "--date" => {
                let v = it.next().context("--date needs a value")?;
                let d = NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                    .with_context(|| format!("bad --date {v}"))?;
                args.date = Some(d);
            }
            "--version" => args.version = true,
            other => bail!("unknown argument {other}\n{USAGE}"),
        }
    }
    Ok(args)
}

/// Morning routine: pick a campaign the cash can carry, then restock to
/// cover the forecast with a 20% buffer, keeping the campaign cost in reserve.
fn plan_day<S: UniformSource>(sim: &mut Simulator<S>) -> Result<()> {
    let cash = sim.state().cash;
    let marketing = if cash >= Decimal::from(12_000) {
        MarketingChoice::Social
    } else if cash >= Decimal::from(4_000) {
        MarketingChoice::Flyers
    } else {
        MarketingChoice::None
    };
    sim.set_marketing(marketing)?;

    let target = (sim.forecast()? * 1.2).ceil() as u64;
    let wanted = target.saturating_sub(sim.state().stock);
    let budget = cash - marketing.cost();
    let affordable = venture_econ::max_affordable(budget, sim.state().ingredient_cost);
    let qty = wanted.min(affordable);
    if qty > 0 {
        sim.buy_stock(qty)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args()?;
    if args.version {
        println!(
            "venture {} ({} {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => load_config(path).with_context(|| format!("loading {path}"))?,
        None => VentureConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }
    let today = args.date.unwrap_or_else(|| Local::now().date_naive());
    let days = args.days.unwrap_or(7);
    let theme_id = select_theme(&config, today);
    info!(?theme_id, days, seed = config.rng_seed, "starting CLI");

    let mut sim = Simulator::seeded(theme_id, &config)?;
    let theme = sim.theme().clone();
    println!(
        "Game of the Week: {} | week {} | product: {} | supply: {} | market avg: P{}",
        theme.name,
        config.theme_week.unwrap_or_else(|| week_number(today)),
        theme.product,
        theme.material,
        theme.reference_price
    );

    let mut total_profit = Decimal::ZERO;
    for _ in 0..days {
        plan_day(&mut sim)?;
        let r = sim.resolve_day()?.clone();
        total_profit += r.profit;
        println!(
            "Day {:>3} | {:<10} | demand {:>3} | sold {:>3} | revenue P{} | profit P{} | {}",
            r.day,
            r.weather.label(),
            r.demand,
            r.sold,
            r.revenue,
            r.profit,
            r.message()
        );
        sim.next_day()?;
    }

    let s = sim.state();
    println!(
        "Summary | days: {} | cash: P{} | stock: {} | reputation: {}% | total profit: P{}",
        days, s.cash, s.stock, s.reputation, total_profit
    );
    Ok(())
}
