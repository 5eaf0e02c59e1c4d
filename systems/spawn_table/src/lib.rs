#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Progress-driven spawn table: how often monsters appear, which ones, and how tough.
//!
//! The rate and the selection are queried separately so pacing and bestiary
//! composition can be tuned independently. Selection draws come from a seeded
//! ChaCha stream, so a given blueprint and tick sequence always replays the same
//! monsters.

use std::time::Duration;

use rand::{distributions::WeightedIndex, prelude::Distribution, SeedableRng};
use rand_chacha::ChaCha8Rng;
use survivor_core::{MonsterKey, SpawnTableDefinition};

/// Shortest delay between regular spawns, whatever the authored rate.
pub const MIN_SPAWN_DELAY: Duration = Duration::from_millis(1);

/// Result of a single weighted draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Selection {
    /// Monster chosen by the draw.
    pub monster: MonsterKey,
    /// Hit points before the multiplier.
    pub base_hp: f32,
    /// Multiplier active at the queried progress.
    pub hp_multiplier: f32,
}

impl Selection {
    /// Hit points after applying the multiplier.
    #[must_use]
    pub fn hp(&self) -> f32 {
        self.base_hp * self.hp_multiplier
    }
}

/// Spawn table evaluated over normalized level progress.
#[derive(Debug)]
pub struct SpawnTable {
    definition: SpawnTableDefinition,
    rng: ChaCha8Rng,
    weights: Vec<f32>,
}

impl SpawnTable {
    /// Creates a table that draws selections from a stream seeded with `seed`.
    #[must_use]
    pub fn new(definition: SpawnTableDefinition, seed: u64) -> Self {
        let weights = Vec::with_capacity(definition.monsters.len());
        Self {
            definition,
            rng: ChaCha8Rng::seed_from_u64(seed),
            weights,
        }
    }

    /// Regular spawns per second at `progress`, never negative.
    #[must_use]
    pub fn rate_at(&self, progress: f32) -> f32 {
        let rate = self.definition.spawn_rate.sample(progress);
        if rate.is_finite() {
            rate.max(0.0)
        } else {
            0.0
        }
    }

    /// Delay between regular spawns at `progress`, or `None` while the rate is zero.
    #[must_use]
    pub fn delay_at(&self, progress: f32) -> Option<Duration> {
        let rate = self.rate_at(progress);
        if rate <= 0.0 {
            return None;
        }
        let delay = Duration::try_from_secs_f64(1.0 / f64::from(rate)).ok()?;
        Some(delay.max(MIN_SPAWN_DELAY))
    }

    /// Hit point multiplier at `progress`.
    #[must_use]
    pub fn hp_multiplier_at(&self, progress: f32) -> f32 {
        self.definition.hp_multiplier.sample(progress).max(0.0)
    }

    /// Draws a monster using the weights active at `progress`.
    ///
    /// Returns `None` when every weight is zero at that progress.
    pub fn select(&mut self, progress: f32) -> Option<Selection> {
        self.weights.clear();
        self.weights.extend(
            self.definition
                .monsters
                .iter()
                .map(|entry| sanitize_weight(entry.weight.sample(progress))),
        );

        let distribution = WeightedIndex::new(self.weights.iter().copied()).ok()?;
        let index = distribution.sample(&mut self.rng);
        let entry = self.definition.monsters.get(index)?;

        Some(Selection {
            monster: entry.monster,
            base_hp: entry.base_hp,
            hp_multiplier: self.hp_multiplier_at(progress),
        })
    }
}

fn sanitize_weight(weight: f32) -> f32 {
    if weight.is_finite() {
        weight.max(0.0)
    } else {
        0.0
    }
}
