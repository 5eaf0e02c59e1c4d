#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-period chest drops driven by a wrap accumulator.

use std::time::Duration;

use survivor_core::LoadedLevel;

/// Most batches a single [`ChestCadence::advance`] call releases. Whole periods
/// beyond this stay banked for later calls.
pub const MAX_BATCHES_PER_ADVANCE: u32 = 1_024;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Configuration parameters required to construct the chest cadence.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    period: Duration,
    batch: u32,
}

impl Config {
    /// Creates a configuration that drops `batch` chests every `period`.
    #[must_use]
    pub const fn new(period: Duration, batch: u32) -> Self {
        Self { period, batch }
    }

    /// Reads the cadence from a loaded level.
    #[must_use]
    pub fn from_level(level: &LoadedLevel) -> Self {
        Self::new(level.chest_period(), level.chest_batch())
    }
}

/// Repeating chest trigger that runs for the whole level, including after the level time ends.
#[derive(Debug)]
pub struct ChestCadence {
    period: Duration,
    batch: u32,
    accumulator: Duration,
}

impl ChestCadence {
    /// Creates a new cadence using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            period: config.period,
            batch: config.batch,
            accumulator: Duration::ZERO,
        }
    }

    /// Accumulates `dt` and returns how many batches became due, oldest first.
    ///
    /// The accumulator keeps the remainder so long frames never drift the cadence.
    /// At most [`MAX_BATCHES_PER_ADVANCE`] batches are released per call.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.period.is_zero() {
            return 0;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        if self.accumulator < self.period {
            return 0;
        }

        // Same as subtracting the period until it no longer fits, without looping.
        let period = self.period.as_nanos();
        let banked = self.accumulator.as_nanos();
        let fires = (banked / period).min(u128::from(MAX_BATCHES_PER_ADVANCE));
        self.accumulator = duration_from_nanos(banked - fires * period);
        u32::try_from(fires).unwrap_or(MAX_BATCHES_PER_ADVANCE)
    }

    /// Number of chests spawned per batch.
    #[must_use]
    pub const fn batch(&self) -> u32 {
        self.batch
    }

    /// Time accumulated toward the next batch.
    #[must_use]
    pub const fn accumulator(&self) -> Duration {
        self.accumulator
    }
}

fn duration_from_nanos(nanos: u128) -> Duration {
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    let subsec = u32::try_from(nanos % NANOS_PER_SEC).unwrap_or(0);
    Duration::new(secs, subsec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_remainder_instead_of_resetting() {
        let mut cadence = ChestCadence::new(Config::new(Duration::from_secs(30), 2));
        let mut fires = 0;
        for _ in 0..19 {
            fires += cadence.advance(Duration::from_secs(5));
        }
        assert_eq!(fires, 3);
        assert_eq!(fires * cadence.batch(), 6);
        assert_eq!(cadence.accumulator(), Duration::from_secs(5));
    }

    #[test]
    fn long_frame_fires_every_elapsed_period() {
        let mut cadence = ChestCadence::new(Config::new(Duration::from_secs(30), 1));
        assert_eq!(cadence.advance(Duration::from_secs(95)), 3);
        assert_eq!(cadence.accumulator(), Duration::from_secs(5));
        assert_eq!(cadence.advance(Duration::from_secs(25)), 1);
        assert_eq!(cadence.accumulator(), Duration::ZERO);
    }

    #[test]
    fn zero_period_never_fires() {
        let mut cadence = ChestCadence::new(Config::new(Duration::ZERO, 4));
        assert_eq!(cadence.advance(Duration::from_secs(1_000)), 0);
    }

    #[test]
    fn fire_count_matches_floor_over_irregular_frames() {
        let mut cadence = ChestCadence::new(Config::new(Duration::from_millis(1_500), 1));
        let frames = [7_u64, 16, 33, 250, 16, 1_900, 4, 16, 3_001, 16];
        let mut total = Duration::ZERO;
        let mut fires = 0;
        for _ in 0..40 {
            for frame in frames {
                let dt = Duration::from_millis(frame);
                total += dt;
                fires += cadence.advance(dt);
            }
        }
        let expected = (total.as_millis() / 1_500) as u32;
        assert_eq!(fires, expected);
    }

    #[test]
    fn huge_frame_releases_a_capped_burst_and_banks_the_rest() {
        let mut cadence = ChestCadence::new(Config::new(Duration::from_secs(1), 1));

        assert_eq!(cadence.advance(Duration::MAX), MAX_BATCHES_PER_ADVANCE);
        assert!(cadence.accumulator() > Duration::from_secs(1));
        assert_eq!(cadence.advance(Duration::ZERO), MAX_BATCHES_PER_ADVANCE);
    }

    #[test]
    fn capped_bursts_catch_up_without_losing_periods() {
        let mut cadence = ChestCadence::new(Config::new(Duration::from_millis(10), 1));

        assert_eq!(cadence.advance(Duration::from_millis(15_005)), MAX_BATCHES_PER_ADVANCE);
        let mut fires = MAX_BATCHES_PER_ADVANCE;
        while fires < 1_500 {
            let released = cadence.advance(Duration::ZERO);
            assert!(released > 0, "banked periods must drain");
            fires += released;
        }
        assert_eq!(fires, 1_500);
        assert_eq!(cadence.advance(Duration::ZERO), 0);
        assert_eq!(cadence.accumulator(), Duration::from_millis(5));
    }
}
