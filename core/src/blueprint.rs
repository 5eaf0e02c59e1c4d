//! Authored level configuration and its one-time validation.
//!
//! A [`LevelBlueprint`] mirrors the authored file layout. [`LevelBlueprint::load`]
//! checks every reference and number once and produces a [`LoadedLevel`] whose
//! durations are converted and whose monster and boss references carry their
//! resolved hit points, so nothing downstream needs to fail while ticking.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    curve::{Curve, CurveError},
    duration_from_secs, BossId, GemKind, MonsterKey, ScriptedEventId,
};

/// Immutable configuration describing a single level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelBlueprint {
    /// Display name of the level.
    pub name: String,
    /// Length of the regular spawning phase; the final boss usually triggers here.
    pub level_duration_secs: f32,
    /// Number of experience gems scattered around the player on start.
    pub initial_gem_count: u32,
    /// Tier of the initial experience gems.
    pub initial_gem_kind: GemKind,
    /// Chest spawned on start and by the chest cadence.
    pub chest: ChestBlueprint,
    /// Period between chest batches.
    pub chest_spawn_period_secs: f32,
    /// Number of chests spawned per batch.
    pub chest_spawn_amount: u32,
    /// Texture reference for the scrolling background.
    pub background_texture: String,
    /// Ordered regular monster pools.
    pub monster_pools: Vec<MonsterPool>,
    /// Bosses referenced by scripted events.
    pub bosses: Vec<BossBlueprint>,
    /// Progress-driven spawn table.
    pub spawn_table: SpawnTableBlueprint,
    /// Scripted boss events in authoring order.
    pub scripted_events: Vec<ScriptedEventBlueprint>,
    /// Seed for monster selection draws.
    #[serde(default)]
    pub rng_seed: u64,
}

/// Chest that can be dropped into the level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChestBlueprint {
    /// Name of the chest prefab.
    pub name: String,
}

/// Ordered group of monster variants sharing a pool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonsterPool {
    /// Display name of the pool.
    pub name: String,
    /// Variants available in the pool.
    pub variants: Vec<MonsterVariant>,
}

/// Single regular monster type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonsterVariant {
    /// Display name of the monster.
    pub name: String,
    /// Hit points before any multiplier.
    pub hp: f32,
}

/// Boss that can be spawned by a scripted event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BossBlueprint {
    /// Display name of the boss.
    pub name: String,
    /// Hit points of the boss.
    pub hp: f32,
}

/// Authored spawn table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnTableBlueprint {
    /// Regular spawns per second over level progress.
    pub spawn_rate: Curve,
    /// Multiplier applied to the base hit points of regular spawns.
    pub hp_multiplier: Curve,
    /// Selectable monsters and their relative weights over level progress.
    pub monsters: Vec<MonsterWeight>,
}

/// Selection weight of a single monster variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonsterWeight {
    /// Monster that may be selected.
    pub monster: MonsterKey,
    /// Relative weight over level progress.
    pub weight: Curve,
}

/// Authored one-shot boss event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptedEventBlueprint {
    /// Display name used in logs.
    pub name: String,
    /// Level time that must be strictly exceeded for the event to fire.
    pub trigger_secs: f32,
    /// Boss spawned by the event.
    pub boss: BossId,
    /// Ordinary monsters spawned alongside the boss.
    #[serde(default)]
    pub escorts: Vec<EscortWave>,
    /// Whether killing this boss passes the level.
    #[serde(default)]
    pub final_boss: bool,
}

/// Fixed number of copies of one monster variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscortWave {
    /// Monster to spawn.
    pub monster: MonsterKey,
    /// Number of copies.
    pub count: u32,
}

/// Spawn table with every monster reference resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnTableDefinition {
    /// Regular spawns per second over level progress.
    pub spawn_rate: Curve,
    /// Hit point multiplier over level progress.
    pub hp_multiplier: Curve,
    /// Selectable monsters in authoring order.
    pub monsters: Vec<WeightedMonster>,
}

/// Selectable monster with its resolved base hit points.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedMonster {
    /// Monster that may be selected.
    pub monster: MonsterKey,
    /// Hit points before the progress multiplier.
    pub base_hp: f32,
    /// Relative weight over level progress.
    pub weight: Curve,
}

/// Scripted event with converted trigger time and resolved hit points.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedEvent {
    /// Position of the event in authoring order.
    pub id: ScriptedEventId,
    /// Display name used in logs.
    pub name: String,
    /// Level time that must be strictly exceeded for the event to fire.
    pub trigger: Duration,
    /// Boss spawned by the event.
    pub boss: BossId,
    /// Hit points of the boss.
    pub boss_hp: f32,
    /// Escort waves spawned after the boss.
    pub escorts: Vec<EscortSpawn>,
    /// Whether killing this boss passes the level.
    pub final_boss: bool,
}

/// Escort wave with resolved hit points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EscortSpawn {
    /// Monster to spawn.
    pub monster: MonsterKey,
    /// Hit points of each copy; escorts are not scaled by progress.
    pub hp: f32,
    /// Number of copies.
    pub count: u32,
}

/// Load-time configuration errors.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BlueprintError {
    /// The level duration is not a positive finite number of seconds.
    #[error("level duration must be positive, got {seconds}s")]
    InvalidLevelDuration {
        /// Authored value.
        seconds: f32,
    },
    /// The chest period is not a positive finite number of seconds.
    #[error("chest spawn period must be positive, got {seconds}s")]
    InvalidChestPeriod {
        /// Authored value.
        seconds: f32,
    },
    /// A scripted event trigger time is negative or not finite.
    #[error("scripted event `{event}` has invalid trigger time {seconds}s")]
    InvalidTriggerTime {
        /// Name of the event.
        event: String,
        /// Authored value.
        seconds: f32,
    },
    /// A monster reference names a pool that does not exist.
    #[error("monster pool {pool} does not exist")]
    UnknownPool {
        /// Referenced pool index.
        pool: u32,
    },
    /// A monster reference names a pool without variants.
    #[error("monster pool {pool} is empty")]
    EmptyPool {
        /// Referenced pool index.
        pool: u32,
    },
    /// A monster reference names a variant the pool does not contain.
    #[error("monster pool {pool} has no variant {variant}")]
    UnknownVariant {
        /// Referenced pool index.
        pool: u32,
        /// Referenced variant index.
        variant: u32,
    },
    /// A scripted event references a boss missing from the roster.
    #[error("scripted event `{event}` references unknown boss {boss}")]
    UnknownBoss {
        /// Name of the event.
        event: String,
        /// Referenced boss index.
        boss: u32,
    },
    /// A monster or boss has non-positive or non-finite hit points.
    #[error("`{name}` must have positive hit points, got {hp}")]
    InvalidHp {
        /// Name of the monster or boss.
        name: String,
        /// Authored value.
        hp: f32,
    },
    /// A spawn table curve is malformed.
    #[error("{curve} curve is invalid: {source}")]
    InvalidCurve {
        /// Which curve failed validation.
        curve: String,
        /// Underlying curve problem.
        #[source]
        source: CurveError,
    },
    /// The spawn table lists no monsters.
    #[error("spawn table lists no monsters")]
    EmptySpawnTable,
    /// No scripted event is marked as the final boss.
    #[error("no scripted event is marked as the final boss")]
    MissingFinalBoss,
    /// More than one scripted event is marked as the final boss.
    #[error("scripted events `{first}` and `{second}` are both marked as the final boss")]
    MultipleFinalBosses {
        /// First final boss event.
        first: String,
        /// Second final boss event.
        second: String,
    },
}

impl LevelBlueprint {
    /// Validates the blueprint and resolves every reference it contains.
    pub fn load(self) -> Result<LoadedLevel, BlueprintError> {
        let level_duration = duration_from_secs(self.level_duration_secs)
            .filter(|duration| !duration.is_zero())
            .ok_or(BlueprintError::InvalidLevelDuration {
                seconds: self.level_duration_secs,
            })?;
        let chest_period = duration_from_secs(self.chest_spawn_period_secs)
            .filter(|duration| !duration.is_zero())
            .ok_or(BlueprintError::InvalidChestPeriod {
                seconds: self.chest_spawn_period_secs,
            })?;

        let spawn_table = self.resolve_spawn_table()?;
        let scripted_events = self.resolve_scripted_events()?;

        Ok(LoadedLevel {
            blueprint: self,
            level_duration,
            chest_period,
            spawn_table,
            scripted_events,
        })
    }

    /// Looks up a boss.
    #[must_use]
    pub fn boss(&self, boss: BossId) -> Option<&BossBlueprint> {
        self.bosses.get(boss.get() as usize)
    }

    fn resolve_monster(&self, key: MonsterKey) -> Result<f32, BlueprintError> {
        let pool_index = key.pool().get();
        let pool = self
            .monster_pools
            .get(pool_index as usize)
            .ok_or(BlueprintError::UnknownPool { pool: pool_index })?;
        if pool.variants.is_empty() {
            return Err(BlueprintError::EmptyPool { pool: pool_index });
        }
        let variant = pool.variants.get(key.variant().get() as usize).ok_or(
            BlueprintError::UnknownVariant {
                pool: pool_index,
                variant: key.variant().get(),
            },
        )?;
        checked_hp(&variant.name, variant.hp)
    }

    fn resolve_spawn_table(&self) -> Result<SpawnTableDefinition, BlueprintError> {
        let table = &self.spawn_table;
        check_curve("spawn rate", &table.spawn_rate)?;
        check_curve("hp multiplier", &table.hp_multiplier)?;
        if table.monsters.is_empty() {
            return Err(BlueprintError::EmptySpawnTable);
        }

        let mut monsters = Vec::with_capacity(table.monsters.len());
        for entry in &table.monsters {
            let base_hp = self.resolve_monster(entry.monster)?;
            let label = format!(
                "weight for pool {} variant {}",
                entry.monster.pool().get(),
                entry.monster.variant().get()
            );
            check_curve(&label, &entry.weight)?;
            monsters.push(WeightedMonster {
                monster: entry.monster,
                base_hp,
                weight: entry.weight.clone(),
            });
        }

        Ok(SpawnTableDefinition {
            spawn_rate: table.spawn_rate.clone(),
            hp_multiplier: table.hp_multiplier.clone(),
            monsters,
        })
    }

    fn resolve_scripted_events(&self) -> Result<Vec<ScriptedEvent>, BlueprintError> {
        let mut events = Vec::with_capacity(self.scripted_events.len());
        let mut final_boss: Option<&str> = None;

        for (index, authored) in self.scripted_events.iter().enumerate() {
            let trigger = duration_from_secs(authored.trigger_secs).ok_or_else(|| {
                BlueprintError::InvalidTriggerTime {
                    event: authored.name.clone(),
                    seconds: authored.trigger_secs,
                }
            })?;
            let boss = self
                .boss(authored.boss)
                .ok_or_else(|| BlueprintError::UnknownBoss {
                    event: authored.name.clone(),
                    boss: authored.boss.get(),
                })?;
            let boss_hp = checked_hp(&boss.name, boss.hp)?;

            let mut escorts = Vec::with_capacity(authored.escorts.len());
            for wave in &authored.escorts {
                escorts.push(EscortSpawn {
                    monster: wave.monster,
                    hp: self.resolve_monster(wave.monster)?,
                    count: wave.count,
                });
            }

            if authored.final_boss {
                if let Some(first) = final_boss {
                    return Err(BlueprintError::MultipleFinalBosses {
                        first: first.to_owned(),
                        second: authored.name.clone(),
                    });
                }
                final_boss = Some(&authored.name);
            }

            let id = u32::try_from(index).unwrap_or(u32::MAX);
            events.push(ScriptedEvent {
                id: ScriptedEventId::new(id),
                name: authored.name.clone(),
                trigger,
                boss: authored.boss,
                boss_hp,
                escorts,
                final_boss: authored.final_boss,
            });
        }

        if final_boss.is_none() {
            return Err(BlueprintError::MissingFinalBoss);
        }

        Ok(events)
    }
}

fn checked_hp(name: &str, hp: f32) -> Result<f32, BlueprintError> {
    if hp.is_finite() && hp > 0.0 {
        Ok(hp)
    } else {
        Err(BlueprintError::InvalidHp {
            name: name.to_owned(),
            hp,
        })
    }
}

fn check_curve(label: &str, curve: &Curve) -> Result<(), BlueprintError> {
    curve
        .validate()
        .map_err(|source| BlueprintError::InvalidCurve {
            curve: label.to_owned(),
            source,
        })
}

/// Validated level configuration shared by the director and its systems.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedLevel {
    blueprint: LevelBlueprint,
    level_duration: Duration,
    chest_period: Duration,
    spawn_table: SpawnTableDefinition,
    scripted_events: Vec<ScriptedEvent>,
}

impl LoadedLevel {
    /// Authored blueprint the level was loaded from.
    #[must_use]
    pub fn blueprint(&self) -> &LevelBlueprint {
        &self.blueprint
    }

    /// Display name of the level.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.blueprint.name
    }

    /// Length of the regular spawning phase.
    #[must_use]
    pub const fn level_duration(&self) -> Duration {
        self.level_duration
    }

    /// Period between chest batches.
    #[must_use]
    pub const fn chest_period(&self) -> Duration {
        self.chest_period
    }

    /// Number of chests spawned per batch.
    #[must_use]
    pub const fn chest_batch(&self) -> u32 {
        self.blueprint.chest_spawn_amount
    }

    /// Chest spawned on start and by the cadence.
    #[must_use]
    pub fn chest(&self) -> &ChestBlueprint {
        &self.blueprint.chest
    }

    /// Spawn table with resolved monster references.
    #[must_use]
    pub fn spawn_table(&self) -> &SpawnTableDefinition {
        &self.spawn_table
    }

    /// Scripted events in authoring order.
    #[must_use]
    pub fn scripted_events(&self) -> &[ScriptedEvent] {
        &self.scripted_events
    }

    /// Seed for monster selection draws.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.blueprint.rng_seed
    }
}
