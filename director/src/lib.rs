#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-frame level director for the Survivor experience.
//!
//! The director owns the level clock and every spawn timer. Each call to
//! [`LevelDirector::tick`] advances the clock, asks the spawn table, the
//! scripted event timeline, and the chest cadence what became due, and hands the
//! resulting spawns to the [`EntityManager`]. Terminal signals delivered through
//! [`LevelDirector::handle`] end the level exactly once, persisting coins and
//! opening the end-of-level report.

use std::{sync::Arc, time::Duration};

use survivor_core::{
    clamp_delta_secs, BlueprintError, CurrencyStore, EntityHandle, EntityManager, LevelBlueprint,
    LevelOutcome, LevelReport, LevelSignal, LevelStats, LoadedLevel, MonsterKind,
    ScriptedEventId, SpawnRequest,
};
use survivor_system_chest_cadence::{self as chest_cadence, ChestCadence};
use survivor_system_level_clock::{ClockStep, LevelClock};
use survivor_system_scripted_events::ScriptedEventTimeline;
use survivor_system_spawn_table::SpawnTable;

mod regular;

use regular::RegularSpawner;

/// Lifecycle of a single level attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LevelState {
    /// Created but not started; ticks are ignored.
    Initializing,
    /// Spawning and accepting signals.
    Running,
    /// Terminal; the world is frozen.
    Ended(LevelOutcome),
}

/// Orchestrates spawning and the win/lose transition for one level attempt.
#[derive(Debug)]
pub struct LevelDirector<E, R, C> {
    level: Arc<LoadedLevel>,
    clock: LevelClock,
    regular: RegularSpawner,
    timeline: ScriptedEventTimeline,
    chests: ChestCadence,
    state: LevelState,
    final_boss: Option<EntityHandle>,
    stats: LevelStats,
    requests: Vec<SpawnRequest>,
    fired: Vec<ScriptedEventId>,
    entities: E,
    report: R,
    currency: C,
}

impl<E, R, C> LevelDirector<E, R, C>
where
    E: EntityManager,
    R: LevelReport,
    C: CurrencyStore,
{
    /// Creates a director for an already validated level.
    #[must_use]
    pub fn new(level: Arc<LoadedLevel>, entities: E, report: R, currency: C) -> Self {
        let clock = LevelClock::new(level.level_duration());
        let table = SpawnTable::new(level.spawn_table().clone(), level.rng_seed());
        let timeline = ScriptedEventTimeline::new(level.scripted_events().to_vec());
        let chests = ChestCadence::new(chest_cadence::Config::from_level(&level));

        Self {
            clock,
            regular: RegularSpawner::new(table),
            timeline,
            chests,
            state: LevelState::Initializing,
            final_boss: None,
            stats: LevelStats::default(),
            requests: Vec::new(),
            fired: Vec::new(),
            level,
            entities,
            report,
            currency,
        }
    }

    /// Validates `blueprint` and creates a director for it.
    pub fn from_blueprint(
        blueprint: LevelBlueprint,
        entities: E,
        report: R,
        currency: C,
    ) -> Result<Self, BlueprintError> {
        let level = blueprint.load()?;
        Ok(Self::new(Arc::new(level), entities, report, currency))
    }

    /// Performs the one-shot level setup and starts the simulation.
    ///
    /// Prepares the entity collaborator, scatters the initial gems, and drops
    /// the starter chest. Calling this more than once has no effect.
    pub fn start(&mut self) {
        if self.state != LevelState::Initializing {
            log::debug!("ignoring start request in state {:?}", self.state);
            return;
        }

        self.entities.prepare(&self.level);
        let blueprint = self.level.blueprint();
        self.entities
            .spawn_gem_cluster(blueprint.initial_gem_count, blueprint.initial_gem_kind);
        self.entities.spawn_chest(self.level.chest());
        self.stats.chests_spawned = self.stats.chests_spawned.saturating_add(1);

        self.state = LevelState::Running;
        log::info!(
            "level `{}` started: {:.0}s of regular spawns, {} scripted events",
            self.level.name(),
            self.level.level_duration().as_secs_f32(),
            self.timeline.pending()
        );
    }

    /// Advances the level by a frame delta in seconds.
    ///
    /// Negative, non-finite, and unrepresentably large deltas count as zero.
    /// Does nothing unless running.
    pub fn tick(&mut self, dt_secs: f32) {
        self.tick_duration(clamp_delta_secs(dt_secs));
    }

    /// Advances the level by `dt`. Does nothing unless running.
    pub fn tick_duration(&mut self, dt: Duration) {
        if self.state != LevelState::Running {
            return;
        }

        let step = self.clock.advance(dt);
        if step.reached_level_end() {
            log::info!(
                "level `{}` reached its end; regular spawning stops",
                self.level.name()
            );
        }

        self.spawn_regular(&step);
        self.fire_scripted_events(&step);
        self.drop_chests(step.delta());
        self.stats.time_survived = self.clock.elapsed();
    }

    /// Processes signals in order. The first terminal signal ends the level;
    /// everything after it is ignored.
    pub fn handle(&mut self, signals: &[LevelSignal]) {
        for signal in signals {
            if self.state != LevelState::Running {
                log::debug!("ignoring {signal:?} in state {:?}", self.state);
                continue;
            }

            match *signal {
                LevelSignal::PlayerDied => self.finish(LevelOutcome::Lost),
                LevelSignal::MonsterKilled { entity } => {
                    self.stats.monsters_killed = self.stats.monsters_killed.saturating_add(1);
                    if self.final_boss == Some(entity) {
                        self.finish(LevelOutcome::Won);
                    }
                }
                LevelSignal::CoinsCollected { amount } => {
                    self.stats.coins_gained = self.stats.coins_gained.saturating_add(amount);
                }
            }
        }
    }

    /// Discards all runtime state and returns a fresh director for the same level.
    #[must_use]
    pub fn restart(self) -> Self {
        log::info!("restarting level `{}`", self.level.name());
        Self::new(self.level, self.entities, self.report, self.currency)
    }

    /// Consumes the director, returning its collaborators.
    #[must_use]
    pub fn into_parts(self) -> (E, R, C) {
        (self.entities, self.report, self.currency)
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> LevelState {
        self.state
    }

    /// Outcome of the attempt once it ended.
    #[must_use]
    pub const fn outcome(&self) -> Option<LevelOutcome> {
        match self.state {
            LevelState::Ended(outcome) => Some(outcome),
            LevelState::Initializing | LevelState::Running => None,
        }
    }

    /// Scale the driver should apply to world time; zero once the level ended.
    #[must_use]
    pub fn time_scale(&self) -> f32 {
        match self.state {
            LevelState::Ended(_) => 0.0,
            LevelState::Initializing | LevelState::Running => 1.0,
        }
    }

    /// Level time elapsed so far.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    /// Elapsed time divided by the level duration, not clamped above one.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.clock.progress()
    }

    /// Statistics gathered so far.
    #[must_use]
    pub const fn stats(&self) -> &LevelStats {
        &self.stats
    }

    /// Handle of the final boss while its kill listener is armed.
    #[must_use]
    pub const fn final_boss(&self) -> Option<EntityHandle> {
        self.final_boss
    }

    /// Number of scripted events that have not fired yet.
    #[must_use]
    pub fn pending_scripted_events(&self) -> usize {
        self.timeline.pending()
    }

    /// Time banked toward the next regular spawn.
    #[must_use]
    pub fn spawn_accumulator(&self) -> Duration {
        self.regular.accumulator()
    }

    /// Time banked toward the next chest batch.
    #[must_use]
    pub const fn chest_accumulator(&self) -> Duration {
        self.chests.accumulator()
    }

    /// Level being played.
    #[must_use]
    pub fn level(&self) -> &LoadedLevel {
        &self.level
    }

    /// Entity collaborator.
    #[must_use]
    pub const fn entities(&self) -> &E {
        &self.entities
    }

    /// End-of-level report collaborator.
    #[must_use]
    pub const fn report(&self) -> &R {
        &self.report
    }

    /// Persisted currency collaborator.
    #[must_use]
    pub const fn currency(&self) -> &C {
        &self.currency
    }

    fn spawn_regular(&mut self, step: &ClockStep) {
        self.requests.clear();
        self.regular
            .advance(step.in_level(), step.progress_at_end(), &mut self.requests);
        if self.requests.is_empty() {
            return;
        }

        for request in &self.requests {
            let entity = self.entities.spawn_monster(request);
            log::trace!("regular spawn {:?} with {:.1} hp as {entity:?}", request.kind, request.hp);
        }
        self.stats.regular_spawns = self
            .stats
            .regular_spawns
            .saturating_add(saturating_count(self.requests.len()));
    }

    fn fire_scripted_events(&mut self, step: &ClockStep) {
        self.fired.clear();
        self.timeline.fire_due(step.after(), &mut self.fired);

        for id in &self.fired {
            let Some(event) = self.timeline.event(*id) else {
                continue;
            };

            let boss = self.entities.spawn_monster(&SpawnRequest {
                kind: MonsterKind::Boss(event.boss),
                hp: event.boss_hp,
            });
            self.stats.bosses_spawned = self.stats.bosses_spawned.saturating_add(1);

            let mut escorts = 0_u32;
            for wave in &event.escorts {
                let request = SpawnRequest {
                    kind: MonsterKind::Regular(wave.monster),
                    hp: wave.hp,
                };
                for _ in 0..wave.count {
                    let _ = self.entities.spawn_monster(&request);
                }
                escorts = escorts.saturating_add(wave.count);
            }
            self.stats.escorts_spawned = self.stats.escorts_spawned.saturating_add(escorts);

            if event.final_boss {
                self.final_boss = Some(boss);
            }

            log::info!(
                "scripted event `{}` fired at {:.1}s: boss {} as {boss:?} with {escorts} escorts",
                event.name,
                step.after().as_secs_f32(),
                event.boss.get()
            );
        }
    }

    fn drop_chests(&mut self, dt: Duration) {
        let batches = self.chests.advance(dt);
        if batches == 0 {
            return;
        }

        let count = batches.saturating_mul(self.chests.batch());
        for _ in 0..count {
            self.entities.spawn_chest(self.level.chest());
        }
        self.stats.chests_spawned = self.stats.chests_spawned.saturating_add(count);
        log::debug!(
            "dropped {count} chests in {batches} batches at {:.1}s",
            self.clock.elapsed().as_secs_f32()
        );
    }

    fn finish(&mut self, outcome: LevelOutcome) {
        if self.state != LevelState::Running {
            return;
        }

        self.state = LevelState::Ended(outcome);
        self.final_boss = None;
        self.stats.time_survived = self.clock.elapsed();
        self.persist_coins();

        log::info!(
            "level `{}` ended ({outcome:?}) after {:.1}s with {} coins",
            self.level.name(),
            self.stats.time_survived.as_secs_f32(),
            self.stats.coins_gained
        );
        self.report.open(outcome, &self.stats);
    }

    fn persist_coins(&mut self) {
        let gained = u64::from(self.stats.coins_gained);
        let result = self
            .currency
            .coins()
            .and_then(|total| self.currency.set_coins(total.saturating_add(gained)));
        if let Err(error) = result {
            log::warn!("failed to persist {gained} coins: {error}");
        }
    }
}

fn saturating_count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
