//! Fixed-step driver that plays a level without a game engine.
//!
//! Every chest that drops is opened right away for a fixed amount of coins,
//! the final boss dies a configurable time after it appears, and the player
//! optionally dies at a scripted moment.

use std::time::Duration;

use survivor_core::{CurrencyStore, LevelOutcome, LevelReport, LevelSignal};
use survivor_director::LevelDirector;

use crate::headless::HeadlessEntities;

/// Parameters of a headless run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Options {
    /// Fixed frame delta.
    pub(crate) frame: Duration,
    /// World time after which the run stops even if the level is still going.
    pub(crate) run_length: Duration,
    /// World time at which the player dies.
    pub(crate) death_at: Option<Duration>,
    /// Time the final boss survives after spawning.
    pub(crate) boss_kill_delay: Duration,
    /// Coins awarded for every chest.
    pub(crate) coins_per_chest: u32,
}

/// Plays the level until it ends or the run length elapses.
pub(crate) fn run<R, C>(
    director: &mut LevelDirector<HeadlessEntities, R, C>,
    options: &Options,
) -> Option<LevelOutcome>
where
    R: LevelReport,
    C: CurrencyStore,
{
    director.start();

    let mut world_time = Duration::ZERO;
    let mut chests_opened = 0_u32;
    let mut boss_seen_at: Option<Duration> = None;
    let mut signals = Vec::new();

    while director.outcome().is_none() && world_time < options.run_length {
        let dt = options.frame.mul_f32(director.time_scale());
        world_time = world_time.saturating_add(dt);
        director.tick_duration(dt);

        signals.clear();
        let chests = director.entities().chests();
        let fresh = chests.saturating_sub(chests_opened);
        chests_opened = chests;
        if fresh > 0 && options.coins_per_chest > 0 {
            signals.push(LevelSignal::CoinsCollected {
                amount: fresh.saturating_mul(options.coins_per_chest),
            });
        }

        if let Some(boss) = director.final_boss() {
            let seen_at = *boss_seen_at.get_or_insert(world_time);
            if world_time.saturating_sub(seen_at) >= options.boss_kill_delay {
                signals.push(LevelSignal::MonsterKilled { entity: boss });
            }
        }

        if options.death_at.is_some_and(|death_at| world_time >= death_at) {
            signals.push(LevelSignal::PlayerDied);
        }

        director.handle(&signals);
    }

    director.outcome()
}
