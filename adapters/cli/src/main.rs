#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Survivor level headlessly.

mod driver;
mod headless;
mod level_file;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use survivor_core::{duration_from_secs, CurrencyStore, LoadedLevel};
use survivor_director::LevelDirector;

use crate::headless::{ConsoleReport, HeadlessEntities, JsonCoinStore};

/// Plays a level at a fixed frame rate without a renderer.
#[derive(Debug, Parser)]
#[command(name = "survivor", version, about)]
struct Args {
    /// Level blueprint to play.
    #[arg(long, default_value = "levels/graveyard.toml")]
    level: PathBuf,
    /// Simulated frames per second.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    fps: u32,
    /// Seconds to simulate before giving up; defaults to the level duration plus one minute.
    #[arg(long)]
    run_secs: Option<f32>,
    /// Seconds after which the player dies.
    #[arg(long)]
    die_at: Option<f32>,
    /// Seconds the final boss survives after it spawns.
    #[arg(long, default_value_t = 5.0)]
    boss_kill_delay: f32,
    /// Coins awarded for each chest that drops.
    #[arg(long, default_value_t = 1)]
    coins_per_chest: u32,
    /// JSON file holding the persisted coin total.
    #[arg(long, default_value = "coins.json")]
    coin_file: PathBuf,
}

impl Args {
    fn driver_options(&self, level: &LoadedLevel) -> Result<driver::Options> {
        let run_length = match self.run_secs {
            Some(seconds) => seconds_arg("--run-secs", seconds)?,
            None => level.level_duration().saturating_add(Duration::from_secs(60)),
        };
        let death_at = self
            .die_at
            .map(|seconds| seconds_arg("--die-at", seconds))
            .transpose()?;

        Ok(driver::Options {
            frame: Duration::from_secs(1) / self.fps,
            run_length,
            death_at,
            boss_kill_delay: seconds_arg("--boss-kill-delay", self.boss_kill_delay)?,
            coins_per_chest: self.coins_per_chest,
        })
    }
}

fn seconds_arg(flag: &str, seconds: f32) -> Result<Duration> {
    let Some(duration) = duration_from_secs(seconds) else {
        bail!("{flag} expects a non-negative number of seconds, got {seconds}");
    };
    Ok(duration)
}

/// Entry point for the Survivor command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let level = level_file::load_level(&args.level)?;
    let options = args.driver_options(&level)?;

    let mut director = LevelDirector::new(
        Arc::new(level),
        HeadlessEntities::default(),
        ConsoleReport,
        JsonCoinStore::new(&args.coin_file),
    );
    let outcome = driver::run(&mut director, &options);
    let elapsed = director.elapsed();

    let (entities, _, coins) = director.into_parts();
    log::info!(
        "simulated {:.1}s, {} monsters spawned",
        elapsed.as_secs_f32(),
        entities.monsters()
    );
    let Some(outcome) = outcome else {
        log::warn!(
            "stopped after {:.1}s before the level ended",
            elapsed.as_secs_f32()
        );
        return Ok(());
    };

    let total = coins
        .coins()
        .with_context(|| format!("failed to read {}", coins.path().display()))?;
    log::info!(
        "level {}; {total} coins stored in {}",
        if outcome.is_won() { "won" } else { "lost" },
        coins.path().display()
    );

    Ok(())
}
