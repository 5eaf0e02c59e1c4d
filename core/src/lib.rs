#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Survivor level director.
//!
//! This crate defines the surface that connects the level director, its pure
//! scheduling systems, and the collaborators living outside the core. Level
//! data enters through [`LevelBlueprint`], which is validated exactly once into
//! a [`LoadedLevel`]. The director converts elapsed time into [`SpawnRequest`]
//! values handed to an [`EntityManager`], reacts to [`LevelSignal`] values
//! delivered by the driver, and reports the [`LevelOutcome`] through a
//! [`LevelReport`] and a [`CurrencyStore`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod blueprint;
pub mod curve;

pub use blueprint::{
    BlueprintError, BossBlueprint, ChestBlueprint, EscortSpawn, EscortWave, LevelBlueprint,
    LoadedLevel, MonsterPool, MonsterVariant, MonsterWeight, ScriptedEvent,
    ScriptedEventBlueprint, SpawnTableBlueprint, SpawnTableDefinition, WeightedMonster,
};
pub use curve::{Curve, CurveError, CurveKey};

/// Identifier of a regular monster pool within a level blueprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(u32);

impl PoolId {
    /// Creates a new pool identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a monster variant inside its pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(u32);

impl VariantId {
    /// Creates a new variant identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a boss within the level's boss roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BossId(u32);

impl BossId {
    /// Creates a new boss identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Position of a scripted event within the authored timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScriptedEventId(u32);

impl ScriptedEventId {
    /// Creates a new scripted event identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Handle returned by the entity collaborator for every spawned monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(u64);

impl EntityHandle {
    /// Creates a new entity handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Typed reference to a regular monster variant, authored as `{ pool, variant }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterKey {
    pool: PoolId,
    variant: VariantId,
}

impl MonsterKey {
    /// Creates a key referencing `variant` inside `pool`.
    #[must_use]
    pub const fn new(pool: PoolId, variant: VariantId) -> Self {
        Self { pool, variant }
    }

    /// Pool that owns the variant.
    #[must_use]
    pub const fn pool(&self) -> PoolId {
        self.pool
    }

    /// Variant inside the pool.
    #[must_use]
    pub const fn variant(&self) -> VariantId {
        self.variant
    }
}

/// Describes which pool a spawned monster is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MonsterKind {
    /// Ordinary monster drawn from one of the regular pools.
    Regular(MonsterKey),
    /// Boss drawn from the dedicated boss pool that follows the regular pools.
    Boss(BossId),
}

/// Request to create a single monster, consumed immediately by the entity collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    /// Pool and variant that should be instantiated.
    pub kind: MonsterKind,
    /// Hit points after applying any progress-based multiplier.
    pub hp: f32,
}

/// Experience gem tiers that can be scattered around the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GemKind {
    /// Lowest value experience gem.
    White,
    /// Second tier experience gem.
    Blue,
    /// Third tier experience gem.
    Green,
    /// Highest value experience gem.
    Red,
}

/// Terminal result of a level attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LevelOutcome {
    /// The final boss was killed.
    Won,
    /// The player died.
    Lost,
}

impl LevelOutcome {
    /// Reports whether the level was passed.
    #[must_use]
    pub const fn is_won(self) -> bool {
        matches!(self, Self::Won)
    }
}

/// Signals delivered synchronously by the driver while entities update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelSignal {
    /// The player character died.
    PlayerDied,
    /// A monster previously returned by the entity collaborator was killed.
    MonsterKilled {
        /// Handle of the monster that died.
        entity: EntityHandle,
    },
    /// The player picked up coins.
    CoinsCollected {
        /// Number of coins gained.
        amount: u32,
    },
}

/// Statistics accumulated over a level attempt and handed to the report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelStats {
    /// Coins collected during the attempt.
    pub coins_gained: u32,
    /// Monsters spawned by the regular spawn table.
    pub regular_spawns: u32,
    /// Bosses spawned by scripted events.
    pub bosses_spawned: u32,
    /// Escort monsters spawned alongside bosses.
    pub escorts_spawned: u32,
    /// Chests spawned, including the starter chest.
    pub chests_spawned: u32,
    /// Monsters reported killed.
    pub monsters_killed: u32,
    /// Level time elapsed when the attempt ended.
    pub time_survived: Duration,
}

/// Entity collaborator that materialises spawn requests.
pub trait EntityManager {
    /// Prepares the collaborator for a new level before anything spawns.
    fn prepare(&mut self, level: &LoadedLevel);

    /// Creates a monster and returns its handle.
    fn spawn_monster(&mut self, request: &SpawnRequest) -> EntityHandle;

    /// Creates a single chest.
    fn spawn_chest(&mut self, chest: &ChestBlueprint);

    /// Scatters `count` experience gems of the given kind around the player.
    fn spawn_gem_cluster(&mut self, count: u32, gem: GemKind);
}

/// End-of-level report collaborator.
pub trait LevelReport {
    /// Presents the outcome of the attempt together with its statistics.
    fn open(&mut self, outcome: LevelOutcome, stats: &LevelStats);
}

/// Persisted coin total shared across level attempts.
pub trait CurrencyStore {
    /// Reads the persisted coin total.
    fn coins(&self) -> Result<u64, CurrencyError>;

    /// Overwrites the persisted coin total.
    fn set_coins(&mut self, total: u64) -> Result<(), CurrencyError>;
}

/// Failures reported by a [`CurrencyStore`].
#[derive(Debug, thiserror::Error)]
pub enum CurrencyError {
    /// The backing storage could not be reached.
    #[error("currency store unavailable: {0}")]
    Unavailable(String),
    /// The stored value could not be interpreted.
    #[error("currency store contents are corrupt: {0}")]
    Corrupt(String),
}

/// Converts authored seconds into a duration, rejecting negative and non-finite values.
#[must_use]
pub fn duration_from_secs(seconds: f32) -> Option<Duration> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Duration::try_from_secs_f32(seconds).ok()
}

/// Converts a per-frame delta into a duration.
///
/// Negative and non-finite deltas, and deltas too large for a [`Duration`],
/// count as zero.
#[must_use]
pub fn clamp_delta_secs(seconds: f32) -> Duration {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f32(seconds).unwrap_or(Duration::ZERO)
}
