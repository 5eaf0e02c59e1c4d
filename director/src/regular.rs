//! Regular-spawn scheduler driven by the spawn table.

use std::time::Duration;

use survivor_core::{MonsterKind, SpawnRequest};
use survivor_system_spawn_table::SpawnTable;

/// Wrap accumulator whose delay is recomputed from the spawn rate once per tick.
#[derive(Debug)]
pub(crate) struct RegularSpawner {
    table: SpawnTable,
    accumulator: Duration,
}

impl RegularSpawner {
    pub(crate) fn new(table: SpawnTable) -> Self {
        Self {
            table,
            accumulator: Duration::ZERO,
        }
    }

    /// Accumulates `in_level` time and emits one request per elapsed delay.
    ///
    /// The delay is taken from the rate at `progress`, the progress once the
    /// tick has been applied, and held for the whole tick, so a tick fires
    /// floor(accumulator / delay) times. While the rate is zero the delay is
    /// infinite: time keeps banking and nothing fires until the rate is positive.
    pub(crate) fn advance(
        &mut self,
        in_level: Duration,
        progress: f32,
        out: &mut Vec<SpawnRequest>,
    ) {
        // Nothing fires once the level time is over, even if the rate changed.
        if in_level.is_zero() {
            return;
        }
        self.accumulator = self.accumulator.saturating_add(in_level);
        let Some(delay) = self.table.delay_at(progress) else {
            return;
        };

        while self.accumulator >= delay {
            self.accumulator -= delay;
            // A slot with no selectable monster is consumed without spawning.
            if let Some(selection) = self.table.select(progress) {
                out.push(SpawnRequest {
                    kind: MonsterKind::Regular(selection.monster),
                    hp: selection.hp(),
                });
            }
        }
    }

    pub(crate) fn accumulator(&self) -> Duration {
        self.accumulator
    }
}
